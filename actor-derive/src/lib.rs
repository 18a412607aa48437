use proc_macro::TokenStream;
use proc_macro2::Span;
use proc_macro_crate::{crate_name, FoundCrate};
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Ident};

mod message;

pub(crate) const CRATE_ACTOR_CORE: &str = "actor-core";

/// Implements `actor_core::message::Message` for a struct or enum.
#[proc_macro_derive(Message)]
pub fn message_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    message::expand(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

pub(crate) fn with_crate_str(crate_str: &str, path: &str) -> syn::Result<proc_macro2::TokenStream> {
    let found = crate_name(crate_str).map_err(|error| syn::Error::new(Span::call_site(), error))?;
    let krate = match found {
        FoundCrate::Itself => quote!(crate),
        FoundCrate::Name(name) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
    };
    let path: syn::Path = syn::parse_str(path)?;
    Ok(quote!(#krate::#path))
}
