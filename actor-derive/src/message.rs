use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::{with_crate_str, CRATE_ACTOR_CORE};

pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let message_trait = with_crate_str(CRATE_ACTOR_CORE, "message::Message")?;
    let stream = quote! {
        impl #impl_generics #message_trait for #name #ty_generics #where_clause {
            fn signature_sized() -> &'static str where Self: Sized {
                std::any::type_name::<Self>()
            }

            fn signature(&self) -> &'static str {
                std::any::type_name::<Self>()
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn into_any(self: std::boxed::Box<Self>) -> std::boxed::Box<dyn std::any::Any> {
                self
            }
        }
    };
    Ok(stream)
}
