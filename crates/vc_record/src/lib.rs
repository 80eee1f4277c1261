#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The derive resolves this crate through the caller's manifest, which gives
// `::vc_record` for doctests and dependents. Inside the crate the same path
// must keep working, so alias ourselves.
extern crate self as vc_record;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod hash;
mod path;
mod reflection;

pub mod codec;
pub mod de;
pub mod filter;
pub mod format;
pub mod impls;
pub mod info;
pub mod registry;
pub mod ser;
pub mod strategy;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use codec::{Codec, CodecBuilder};
pub use de::{FieldValue, FromValue, LazyList, LazyRecord};
pub use error::{
    DescribeError, EncodeError, Error, FieldError, MalformedKind, MalformedRecordError,
    MaterializeError,
};
pub use reflection::{EnumRef, List, ListItemIter, Record, RecordFieldIter};
pub use reflection::{Reflect, ReflectRef, ScalarRef};
pub use ser::EncodedRecord;
pub use vc_record_derive as derive;
