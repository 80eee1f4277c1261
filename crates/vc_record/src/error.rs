use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// DescribeError

/// Failure to build a [`TypeDescriptor`](crate::registry::TypeDescriptor).
///
/// A failed build is never cached; describing the type again retries it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DescribeError {
    /// A field's static type has no record field kind.
    #[error("field `{field}` of `{ty}` has type `{found}`, which has no record field kind")]
    UnsupportedFieldKind {
        ty: &'static str,
        field: &'static str,
        found: &'static str,
    },
    /// Only records can be described.
    #[error("`{ty}` is a {kind}, not a record")]
    NotARecord { ty: &'static str, kind: &'static str },
}

// -----------------------------------------------------------------------------
// EncodeError

/// Failure while encoding a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    #[error(transparent)]
    Describe(#[from] DescribeError),
    /// The filter policy refused a record or enum type.
    #[error("type `{ty}` at `{path}` is rejected by the filter policy")]
    Rejected { ty: &'static str, path: String },
    /// A record was reached again while it was still being encoded.
    #[error("cyclic reference to `{ty}` at `{path}`")]
    Cyclic { ty: &'static str, path: String },
    /// A described field is missing from the runtime value.
    #[error("field `{field}` of `{ty}` is described but cannot be read")]
    Unreadable { ty: &'static str, field: &'static str },
    /// Records and lists are nested deeper than the decoder accepts.
    #[error("nesting deeper than {limit} levels at `{path}`")]
    TooDeep { limit: usize, path: String },
    /// An optional directly wraps another optional.
    #[error("optional `{ty}` at `{path}` wraps another optional")]
    NestedOptional { ty: &'static str, path: String },
    /// A string or sequence does not fit the format's `u32` length prefix.
    #[error("{what} of length {len} exceeds the format limit")]
    TooLarge { what: &'static str, len: usize },
}

// -----------------------------------------------------------------------------
// MalformedRecordError

/// Why a buffer failed to decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MalformedKind {
    #[error("missing `VPDX` header")]
    BadMagic,
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),
    #[error("unexpected tag 0x{0:02x}")]
    UnexpectedTag(u8),
    #[error("truncated buffer: needed {needed} byte(s), {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    #[error("{0} trailing byte(s) after the root record")]
    TrailingBytes(usize),
    #[error("invalid utf-8 in string")]
    InvalidUtf8,
    #[error("invalid boolean byte 0x{0:02x}")]
    InvalidBool(u8),
    #[error("invalid char scalar value 0x{0:x}")]
    InvalidChar(u32),
    #[error("invalid temporal kind {0}")]
    InvalidTemporalKind(u8),
    #[error("invalid temporal literal `{0}`")]
    InvalidTemporal(String),
    #[error("invalid field flags 0x{0:02x}")]
    InvalidFlags(u8),
    #[error("duplicate field `{0}`")]
    DuplicateField(String),
    #[error("root value is not a record")]
    RootNotRecord,
    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}

/// The buffer is not a well-formed encoded record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("malformed record at byte {offset}: {kind}")]
pub struct MalformedRecordError {
    pub offset: usize,
    pub kind: MalformedKind,
}

impl MalformedRecordError {
    #[inline]
    pub(crate) const fn new(offset: usize, kind: MalformedKind) -> Self {
        Self { offset, kind }
    }
}

// -----------------------------------------------------------------------------
// FieldError

/// Failure of a lazy field lookup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FieldError {
    #[error("record `{ty}` has no field `{field}`")]
    Unknown { ty: String, field: String },
    #[error("index {index} is out of bounds for a list of {len} item(s)")]
    OutOfBounds { index: usize, len: usize },
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
}

// -----------------------------------------------------------------------------
// MaterializeError

/// Failure while rebuilding a typed value from a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MaterializeError {
    /// The encoded kind does not fit the target, an enum tag names no
    /// variant, or a number is out of range.
    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },
    /// The field is absent and the target is neither nullable nor defaultable.
    #[error("record `{ty}` is missing field `{field}`")]
    MissingField { ty: &'static str, field: &'static str },
    #[error("type `{ty}` at `{path}` is rejected by the filter policy")]
    Rejected { ty: &'static str, path: String },
    #[error(transparent)]
    Describe(#[from] DescribeError),
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
}

// -----------------------------------------------------------------------------
// Error

/// Any error this crate returns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Describe(#[from] DescribeError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_location() {
        let err = MalformedRecordError::new(7, MalformedKind::Truncated { needed: 8, remaining: 3 });
        assert_eq!(
            err.to_string(),
            "malformed record at byte 7: truncated buffer: needed 8 byte(s), 3 remaining"
        );

        let err = EncodeError::Cyclic { ty: "app::A", path: "b.a".into() };
        assert_eq!(err.to_string(), "cyclic reference to `app::A` at `b.a`");
    }

    #[test]
    fn lower_layers_convert_upwards() {
        let describe = DescribeError::NotARecord { ty: "u8", kind: "scalar" };
        let err: Error = EncodeError::from(describe.clone()).into();
        assert!(matches!(err, Error::Encode(EncodeError::Describe(d)) if d == describe));
    }
}
