//! Mapping of Rust signature types onto metadata type references.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

/// A signature type as the metadata index sees it.
pub enum MappedType {
    Void,
    /// A scalar spelled by its wire name (`string`, `int`, ...).
    Scalar(&'static str),
    /// `list<T>` or `holder<T>`.
    Generic(&'static str, Box<MappedType>),
    /// A user type; its qualified name is only known at run time.
    User(Type),
}

impl MappedType {
    /// Tokens building a `TypeRef` for this type.
    pub fn to_tokens(&self, core: &TokenStream) -> TokenStream {
        match self {
            MappedType::Void => quote!(#core::types::TypeRef::void()),
            MappedType::Scalar(name) => quote!(#core::types::TypeRef::named(#name)),
            MappedType::Generic(base, inner) => {
                let inner = inner.to_tokens(core);
                quote!(#core::types::TypeRef::generic(#base, ::std::vec![#inner]))
            }
            MappedType::User(ty) => quote! {
                #core::types::TypeRef::named(::std::any::type_name::<#ty>().replace("::", "."))
            },
        }
    }

    /// User types reachable from this type, outermost first.
    pub fn user_types<'a>(&'a self, out: &mut Vec<&'a Type>) {
        match self {
            MappedType::Void | MappedType::Scalar(_) => {}
            MappedType::Generic(_, inner) => inner.user_types(out),
            MappedType::User(ty) => out.push(ty),
        }
    }
}

/// Maps a parameter or result type.
pub fn map_type(ty: &Type) -> syn::Result<MappedType> {
    match ty {
        Type::Reference(r) => map_type(&r.elem),
        Type::Paren(p) => map_type(&p.elem),
        Type::Group(g) => map_type(&g.elem),
        Type::Tuple(t) if t.elems.is_empty() => Ok(MappedType::Void),
        Type::Path(tp) if tp.qself.is_none() => {
            let Some(last) = tp.path.segments.last() else {
                return Err(syn::Error::new_spanned(ty, "empty type path"));
            };
            let ident = last.ident.to_string();
            if let Some(scalar) = scalar_name(&ident) {
                return Ok(MappedType::Scalar(scalar));
            }
            match ident.as_str() {
                "Vec" => Ok(MappedType::Generic(
                    "list",
                    Box::new(map_type(single_arg(ty, &last.arguments)?)?),
                )),
                "ElementHolder" => Ok(MappedType::Generic(
                    "holder",
                    Box::new(map_type(single_arg(ty, &last.arguments)?)?),
                )),
                "Option" | "Box" => map_type(single_arg(ty, &last.arguments)?),
                "Result" => Err(syn::Error::new_spanned(
                    ty,
                    "`Result` is only supported as the outermost return type",
                )),
                _ => Ok(MappedType::User(ty.clone())),
            }
        }
        _ => Err(syn::Error::new_spanned(
            ty,
            "unsupported type in #[web_service] signature",
        )),
    }
}

/// Maps a return type, splitting `Result<T, E>` into the result `T` and the
/// declared fault `E`.
pub fn map_return(ty: &Type) -> syn::Result<(MappedType, Option<MappedType>)> {
    if let Type::Path(tp) = ty {
        if let Some(last) = tp.path.segments.last() {
            if last.ident == "Result" {
                let args = type_args(&last.arguments);
                if args.len() != 2 {
                    return Err(syn::Error::new_spanned(
                        ty,
                        "expected `Result<T, E>` with an explicit error type",
                    ));
                }
                return Ok((map_type(args[0])?, Some(map_type(args[1])?)));
            }
        }
    }
    Ok((map_type(ty)?, None))
}

fn scalar_name(ident: &str) -> Option<&'static str> {
    let name = match ident {
        "String" | "str" | "char" => "string",
        "bool" => "boolean",
        "i8" | "u8" => "byte",
        "i16" | "u16" => "short",
        "i32" | "u32" => "int",
        "i64" | "u64" | "isize" | "usize" => "long",
        "f32" => "float",
        "f64" => "double",
        _ => return None,
    };
    Some(name)
}

fn type_args(args: &PathArguments) -> Vec<&Type> {
    match args {
        PathArguments::AngleBracketed(ab) => ab
            .args
            .iter()
            .filter_map(|a| match a {
                GenericArgument::Type(t) => Some(t),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn single_arg<'a>(ty: &Type, args: &'a PathArguments) -> syn::Result<&'a Type> {
    let args = type_args(args);
    match args.as_slice() {
        [one] => Ok(one),
        _ => Err(syn::Error::new_spanned(
            ty,
            "expected exactly one generic type argument",
        )),
    }
}
