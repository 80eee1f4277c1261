use proc_macro2::TokenStream;

use crate::derive_data::RecordMeta;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &RecordMeta) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = meta.attrs().auto_register else {
        return TokenStream::new();
    };
    // Invalid for generic types.
    if meta.is_generic() {
        return TokenStream::new();
    }

    let vc_record = meta.vc_record_path();
    let exports_ = crate::path::macro_exports_(vc_record);
    let info_ = crate::path::info_(vc_record);
    let ident = meta.ident();

    quote_spanned! { span =>
        #exports_::inventory::submit! {
            #exports_::AutoRegistration::new(#info_::TypeRef::of::<#ident>)
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &RecordMeta) -> TokenStream {
    TokenStream::new()
}
