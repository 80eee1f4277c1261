//! Paths into `vc_record` used by the generated code.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `vc_record` crate.
///
/// 1. For crates that depend on `vc_record`, `::vc_record` is returned.
/// 2. For crates that depend on `vc_pdx`, `::vc_pdx::record` is returned.
/// 3. Otherwise `::vc_record` is returned, which may be incorrect.
///
/// This reads the caller's manifest, so it is resolved once per derive and
/// passed around.
pub(crate) fn vc_record() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_record"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn info_(vc_record: &syn::Path) -> TokenStream {
    quote! { #vc_record::info }
}

#[inline(always)]
pub(crate) fn de_(vc_record: &syn::Path) -> TokenStream {
    quote! { #vc_record::de }
}

#[inline(always)]
pub(crate) fn macro_exports_(vc_record: &syn::Path) -> TokenStream {
    quote! { #vc_record::__macro_exports }
}
