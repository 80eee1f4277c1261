// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod enum_kind;
mod struct_kind;

// -----------------------------------------------------------------------------
// Internal API

use auto_register::get_auto_register_impl;
use enum_kind::impl_enum;
use struct_kind::impl_struct;

use proc_macro::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::derive_data::RecordDerive;

/// Provided for `#[derive(Record)]`.
pub(crate) fn match_record_impls(ast: DeriveInput) -> TokenStream {
    let record_derive = match RecordDerive::from_input(&ast) {
        Ok(val) => val,
        Err(err) => return err.into_compile_error().into(),
    };

    let record_impls = match record_derive {
        RecordDerive::Struct(info) => impl_struct(&info),
        RecordDerive::Enum(info) => impl_enum(&info),
    };

    TokenStream::from(quote! {
        const _: () = {
            #record_impls
        };
    })
}
