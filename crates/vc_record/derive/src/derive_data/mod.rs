//! Parsing of the derive input into the shapes the generators consume.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod record_derive;
mod record_meta;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, TypeAttributes};
pub(crate) use record_derive::{RecordDerive, RecordEnum, RecordField, RecordStruct};
pub(crate) use record_meta::RecordMeta;
