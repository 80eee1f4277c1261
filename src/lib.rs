#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_record as record;

/// The items most callers need.
pub mod prelude {
    pub use vc_record::derive::Record;
    pub use vc_record::filter::{FilterPolicy, NestedAdmission};
    pub use vc_record::strategy::PatternRules;
    pub use vc_record::{Codec, Error, FieldValue, LazyRecord, Record};
}
