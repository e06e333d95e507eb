use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, ItemTrait};

use crate::crate_path::soapgen_core_path;
use crate::web_service_parsing::{
    parse_service, parse_service_args, strip_member_attrs, to_snake_case, ServiceDef, TagDef,
};

pub fn expand(args: TokenStream, input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as ItemTrait);
    match generate(args.into(), &item) {
        Ok(metadata) => {
            // Emit the trait with member attrs stripped
            let cleaned = strip_member_attrs(&item);
            let output = quote! {
                #cleaned
                #metadata
            };
            output.into()
        }
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate(args: TokenStream2, item: &ItemTrait) -> syn::Result<TokenStream2> {
    let tag = parse_service_args(args)?;
    let def = parse_service(item, tag)?;
    let core = soapgen_core_path();
    let vis = &item.vis;

    let snake = to_snake_case(&def.trait_ident.to_string());
    let info_fn = format_ident!("{}_info", snake);
    let metadata_fn = format_ident!("{}_metadata", snake);

    let info_body = generate_info(&def, &core);
    let referenced = generate_referenced(&def, &core);

    Ok(quote! {
        /// Metadata for this service interface, named after its module path.
        #vis fn #info_fn() -> #core::meta::TypeInfo {
            #info_body
        }

        /// The service interface followed by every user type its signatures
        /// reference: thrown types as exceptions, the rest as classes.
        #vis fn #metadata_fn() -> ::std::vec::Vec<#core::meta::TypeInfo> {
            let mut __types = ::std::vec![#info_fn()];
            #referenced
            __types
        }
    })
}

fn generate_info(def: &ServiceDef, core: &TokenStream2) -> TokenStream2 {
    let trait_name = def.trait_ident.to_string();
    let service_tag = tag_tokens(&def.tag, core);

    let methods = def.methods.iter().map(|m| {
        let name = &m.name;
        let params = m.params.iter().map(|p| {
            let ty = p.ty.to_tokens(core);
            let named = p.name.as_ref().map(|n| quote!(.named(#n)));
            let tags = p.tags.iter().map(|t| tag_tokens(t, core));
            quote! {
                .param(#core::meta::ParamInfo::new(#ty) #named #( .with_tag(#tags) )*)
            }
        });
        let returns = m.returns.to_tokens(core);
        let throws = m.throws.as_ref().map(|t| {
            let t = t.to_tokens(core);
            quote!(.throws(#t))
        });
        let tags = m.tags.iter().map(|t| tag_tokens(t, core));
        quote! {
            .with_method(
                #core::meta::MethodInfo::new(#name)
                    #( #params )*
                    .returns(#returns)
                    #throws
                    #( .with_tag(#tags) )*
            )
        }
    });

    quote! {
        let __name = ::std::format!(
            "{}.{}",
            ::std::module_path!().replace("::", "."),
            #trait_name
        );
        #core::meta::TypeInfo::interface(__name)
            .with_tag(#service_tag)
            #( #methods )*
    }
}

fn generate_referenced(def: &ServiceDef, core: &TokenStream2) -> TokenStream2 {
    let mut faults = Vec::new();
    let mut payloads = Vec::new();
    for m in &def.methods {
        if let Some(t) = &m.throws {
            t.user_types(&mut faults);
        }
        for p in &m.params {
            p.ty.user_types(&mut payloads);
        }
        m.returns.user_types(&mut payloads);
    }

    let push = |ty: &syn::Type, ctor: TokenStream2| {
        quote! {
            {
                let __name = ::std::any::type_name::<#ty>().replace("::", ".");
                if !__types.iter().any(|t| t.name == __name) {
                    __types.push(#core::meta::TypeInfo::#ctor(__name));
                }
            }
        }
    };
    let faults = faults.into_iter().map(|ty| push(ty, quote!(exception)));
    let payloads = payloads.into_iter().map(|ty| push(ty, quote!(class)));
    quote! {
        #( #faults )*
        #( #payloads )*
    }
}

fn tag_tokens(tag: &TagDef, core: &TokenStream2) -> TokenStream2 {
    let name = &tag.name;
    let values = tag.values.iter().map(|(k, v)| quote!(.with(#k, #v)));
    quote!(#core::meta::ElementTag::new(#name) #( #values )*)
}
