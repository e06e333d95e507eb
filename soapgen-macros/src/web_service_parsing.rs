//! Parsing of `#[web_service]` traits and their member attributes.

use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, FnArg, Ident, ItemTrait, Lit, Meta, Pat, ReturnType, Token, TraitItem};

use crate::type_mapping::{map_return, map_type, MappedType};

/// Attributes consumed by `#[web_service]` and stripped from the output.
const MEMBER_ATTRS: &[&str] = &["web_method", "web_result", "web_param", "tag"];

/// Element tag names, matching the core metadata constants.
pub const WEB_SERVICE: &str = "WebService";
pub const WEB_METHOD: &str = "WebMethod";
pub const WEB_RESULT: &str = "WebResult";
pub const WEB_PARAM: &str = "WebParam";

/// An element tag: a name and its string values.
pub struct TagDef {
    pub name: String,
    pub values: Vec<(String, String)>,
}

pub struct ServiceParam {
    pub name: Option<String>,
    pub ty: MappedType,
    pub tags: Vec<TagDef>,
}

pub struct ServiceMethod {
    pub name: String,
    pub params: Vec<ServiceParam>,
    pub returns: MappedType,
    pub throws: Option<MappedType>,
    pub tags: Vec<TagDef>,
}

pub struct ServiceDef {
    pub trait_ident: Ident,
    pub tag: TagDef,
    pub methods: Vec<ServiceMethod>,
}

/// Parses `target_namespace = "..."`, `name = "..."` from the attribute args.
pub fn parse_service_args(args: proc_macro2::TokenStream) -> syn::Result<TagDef> {
    let mut tag = TagDef {
        name: WEB_SERVICE.to_string(),
        values: Vec::new(),
    };
    if args.is_empty() {
        return Ok(tag);
    }
    let metas = syn::parse::Parser::parse2(
        Punctuated::<Meta, Token![,]>::parse_terminated,
        args,
    )?;
    for meta in metas {
        let (key, value) = name_value(&meta)?;
        match key.as_str() {
            "target_namespace" | "name" => tag.values.push((camel_key(&key), value)),
            _ => {
                return Err(syn::Error::new_spanned(
                    meta,
                    "expected `target_namespace = \"...\"` or `name = \"...\"`",
                ))
            }
        }
    }
    Ok(tag)
}

pub fn parse_service(item: &ItemTrait, tag: TagDef) -> syn::Result<ServiceDef> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &item.generics,
            "#[web_service] traits cannot be generic",
        ));
    }
    let mut methods = Vec::new();
    for trait_item in &item.items {
        if let TraitItem::Fn(method) = trait_item {
            methods.push(parse_method(method)?);
        }
    }
    Ok(ServiceDef {
        trait_ident: item.ident.clone(),
        tag,
        methods,
    })
}

fn parse_method(method: &syn::TraitItemFn) -> syn::Result<ServiceMethod> {
    let sig = &method.sig;
    let mut tags = Vec::new();
    for attr in &method.attrs {
        if attr.path().is_ident("web_method") {
            tags.push(parse_keyed_attr(attr, WEB_METHOD, &["operation_name"])?);
        } else if attr.path().is_ident("web_result") {
            tags.push(parse_keyed_attr(attr, WEB_RESULT, &["name", "target_namespace"])?);
        } else if attr.path().is_ident("tag") {
            tags.push(parse_tag_attr(attr)?);
        }
    }

    let mut params = Vec::new();
    for arg in &sig.inputs {
        let FnArg::Typed(pat_type) = arg else {
            continue;
        };
        let name = match &*pat_type.pat {
            Pat::Ident(pi) => Some(pi.ident.to_string().trim_start_matches('_').to_string())
                .filter(|n| !n.is_empty()),
            _ => None,
        };
        let mut param_tags = Vec::new();
        for attr in &pat_type.attrs {
            if attr.path().is_ident("web_param") {
                param_tags.push(parse_keyed_attr(
                    attr,
                    WEB_PARAM,
                    &["name", "target_namespace", "mode", "header"],
                )?);
            } else if attr.path().is_ident("tag") {
                param_tags.push(parse_tag_attr(attr)?);
            }
        }
        params.push(ServiceParam {
            name,
            ty: map_type(&pat_type.ty)?,
            tags: param_tags,
        });
    }

    let (returns, throws) = match &sig.output {
        ReturnType::Default => (MappedType::Void, None),
        ReturnType::Type(_, ty) => map_return(ty)?,
    };

    Ok(ServiceMethod {
        name: sig.ident.to_string(),
        params,
        returns,
        throws,
        tags,
    })
}

/// `#[web_param(name = "x", mode = InOut, header = true)]` and friends.
fn parse_keyed_attr(attr: &Attribute, tag: &str, allowed: &[&str]) -> syn::Result<TagDef> {
    let mut values = Vec::new();
    attr.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .map(|i| i.to_string())
            .unwrap_or_default();
        if !allowed.contains(&key.as_str()) {
            return Err(meta.error(format!(
                "unknown key, expected one of: {}",
                allowed.join(", ")
            )));
        }
        let value = if meta.input.peek(Token![=]) {
            let expr: Expr = meta.value()?.parse()?;
            expr_to_string(&expr)?
        } else {
            // bare flag, e.g. `header`
            "true".to_string()
        };
        values.push((camel_key(&key), value));
        Ok(())
    })?;
    Ok(TagDef {
        name: tag.to_string(),
        values,
    })
}

/// `#[tag(XmlElement, name = "item", nillable = true)]`
fn parse_tag_attr(attr: &Attribute) -> syn::Result<TagDef> {
    let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
    let mut iter = metas.iter();
    let name = match iter.next() {
        Some(Meta::Path(path)) => path
            .get_ident()
            .map(|i| i.to_string())
            .ok_or_else(|| syn::Error::new_spanned(path, "expected a tag name"))?,
        _ => {
            return Err(syn::Error::new_spanned(
                attr,
                "expected #[tag(Name)] or #[tag(Name, key = value, ...)]",
            ))
        }
    };
    let mut values = Vec::new();
    for meta in iter {
        let (key, value) = name_value(meta)?;
        values.push((key, value));
    }
    Ok(TagDef { name, values })
}

fn name_value(meta: &Meta) -> syn::Result<(String, String)> {
    match meta {
        Meta::NameValue(nv) => {
            let key = nv
                .path
                .get_ident()
                .map(|i| i.to_string())
                .ok_or_else(|| syn::Error::new_spanned(&nv.path, "expected a simple key"))?;
            Ok((key, expr_to_string(&nv.value)?))
        }
        _ => Err(syn::Error::new_spanned(meta, "expected `key = value`")),
    }
}

fn expr_to_string(expr: &Expr) -> syn::Result<String> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Str(s) => Ok(s.value()),
            Lit::Bool(b) => Ok(b.value.to_string()),
            Lit::Int(i) => Ok(i.base10_digits().to_string()),
            _ => Err(syn::Error::new_spanned(expr, "unsupported literal")),
        },
        Expr::Path(p) => p
            .path
            .get_ident()
            .map(|i| i.to_string())
            .ok_or_else(|| syn::Error::new_spanned(expr, "expected an identifier")),
        _ => Err(syn::Error::new_spanned(expr, "expected a literal or identifier")),
    }
}

/// `target_namespace` -> `targetNamespace`
fn camel_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// The trait with every member attribute consumed by `#[web_service]` removed.
pub fn strip_member_attrs(item: &ItemTrait) -> ItemTrait {
    let mut cleaned = item.clone();
    for trait_item in &mut cleaned.items {
        if let TraitItem::Fn(method) = trait_item {
            method.attrs.retain(|a| !is_member_attr(a));
            for arg in &mut method.sig.inputs {
                if let FnArg::Typed(pat_type) = arg {
                    pat_type.attrs.retain(|a| !is_member_attr(a));
                }
            }
        }
    }
    cleaned
}

fn is_member_attr(attr: &Attribute) -> bool {
    MEMBER_ATTRS.iter().any(|name| attr.path().is_ident(name))
}

pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let chars: Vec<char> = s.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if i > 0 && (prev_lower || (next_lower && chars[i - 1].is_uppercase())) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(*c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn test_camel_key() {
        assert_eq!(camel_key("target_namespace"), "targetNamespace");
        assert_eq!(camel_key("name"), "name");
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("Greeter"), "greeter");
        assert_eq!(to_snake_case("OrderService"), "order_service");
        assert_eq!(to_snake_case("XMLGateway"), "xml_gateway");
    }

    #[test]
    fn test_parse_trait() {
        let item: ItemTrait = syn::parse2(quote! {
            pub trait Orders {
                #[web_method(operation_name = "PlaceOrder")]
                #[web_result(name = "id")]
                fn place(&self, #[web_param(mode = InOut, header)] item: String, _qty: i32) -> Result<i64, Rejected>;
                fn ping(&self);
            }
        })
        .unwrap();
        let tag = parse_service_args(quote!(target_namespace = "urn:orders")).unwrap();
        let def = parse_service(&item, tag).unwrap();

        assert_eq!(def.tag.values, vec![("targetNamespace".to_string(), "urn:orders".to_string())]);
        let place = &def.methods[0];
        assert_eq!(place.tags[0].values[0], ("operationName".to_string(), "PlaceOrder".to_string()));
        assert_eq!(place.params[1].name.as_deref(), Some("qty"));
        assert_eq!(
            place.params[0].tags[0].values,
            vec![
                ("mode".to_string(), "InOut".to_string()),
                ("header".to_string(), "true".to_string())
            ]
        );
        assert!(place.throws.is_some());
        assert!(matches!(def.methods[1].returns, MappedType::Void));

        let cleaned = strip_member_attrs(&item);
        let rendered = quote!(#cleaned).to_string();
        assert!(!rendered.contains("web_param"));
        assert!(!rendered.contains("web_method"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let item: ItemTrait = syn::parse2(quote! {
            trait Bad {
                fn call(&self, #[web_param(nme = "x")] x: String);
            }
        })
        .unwrap();
        let tag = parse_service_args(proc_macro2::TokenStream::new()).unwrap();
        assert!(parse_service(&item, tag).is_err());
    }
}
