//! Encoding.

mod encoder;

pub use encoder::EncodedRecord;

pub(crate) use encoder::Encoder;
