//! Decoding: validation, lazy field views and materialization.

// -----------------------------------------------------------------------------
// Modules

mod decoder;
mod json;
mod lazy;
mod materialize;

// -----------------------------------------------------------------------------
// Exports

pub use decoder::decode;
pub use lazy::{EnumTag, FieldValue, LazyList, LazyRecord};
pub use materialize::{FromValue, Materializer, RecordReader};
