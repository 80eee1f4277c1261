//! See [`Record`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static RECORD_ATTRIBUTE_NAME: &str = "record";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Record Derivation
///
/// `#[derive(Record)]` implements the following traits:
///
/// - `Typed`
/// - `Reflect`
/// - `Record` (for `struct T { ... }`)
/// - `FromValue`
///
/// Structs must have named fields. Enums must be field-less; they are
/// encoded by variant name.
///
/// ## Type Path
///
/// The serialized type name defaults to `module_path!()::Ident`. Override it
/// when the type moves or must match data written elsewhere:
///
/// ```rust, ignore
/// #[derive(Record)]
/// #[record(type_path = "pharmacy::Coverage")]
/// struct Coverage { /* ... */ }
/// ```
///
/// Generic types without an override use `core::any::type_name`.
///
/// ## Field Attributes
///
/// - `skip`: the field is neither described nor encoded, and is rebuilt
///   with `Default::default()`.
/// - `default`: a missing or absent field reads as `Default::default()`
///   instead of failing.
/// - `identity`: mark the field as part of the record's identity.
///
/// ```rust, ignore
/// #[derive(Record)]
/// struct Plan {
///     #[record(identity)]
///     plan_id: u64,
///     #[record(default)]
///     window: u16,
///     #[record(skip)]
///     cached_hash: u64,
/// }
/// ```
///
/// ## Auto Register
///
/// `#[record(auto_register)]` submits the type so that
/// `TypeRegistry::auto_register` can describe it at startup. Ignored for
/// generic types and when the `auto_register` feature is disabled.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    impls::match_record_impls(ast)
}
