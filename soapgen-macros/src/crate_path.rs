//! Crate path resolution for generated code.
//!
//! Detects whether the user depends on `soapgen` (facade) or `soapgen-core`
//! directly, and returns the appropriate path prefix for generated code.

use proc_macro2::TokenStream;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;

/// Returns the token stream for accessing `soapgen_core` types.
///
/// Integration tests of the crate itself see `FoundCrate::Itself`; they link
/// the library by name, so `Itself` resolves to the absolute path as well.
pub fn soapgen_core_path() -> TokenStream {
    if let Ok(found) = crate_name("soapgen") {
        match found {
            FoundCrate::Itself => quote!(::soapgen),
            FoundCrate::Name(name) => {
                let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
                quote!(::#ident)
            }
        }
    } else if let Ok(found) = crate_name("soapgen-core") {
        match found {
            FoundCrate::Itself => quote!(::soapgen_core),
            FoundCrate::Name(name) => {
                let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
                quote!(::#ident)
            }
        }
    } else {
        // Fallback - assume soapgen_core is available (for error messages)
        quote!(::soapgen_core)
    }
}
