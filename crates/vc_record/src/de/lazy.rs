use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;

use bytes::Bytes;

use crate::de::decoder::{read_temporal, skip_value};
use crate::format::{Cursor, FLAG_IDENTITY, Tag};
use crate::info::Temporal;
use crate::{FieldError, MalformedKind, MalformedRecordError};

type Result<T> = core::result::Result<T, MalformedRecordError>;

// -----------------------------------------------------------------------------
// EnumTag

/// An encoded enum value: the enum's type path and the variant name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EnumTag {
    type_path: Box<str>,
    variant: Box<str>,
}

impl EnumTag {
    pub fn new(type_path: &str, variant: &str) -> Self {
        Self {
            type_path: type_path.into(),
            variant: variant.into(),
        }
    }

    #[inline]
    pub fn type_path(&self) -> &str {
        &self.type_path
    }

    #[inline]
    pub fn variant(&self) -> &str {
        &self.variant
    }
}

impl fmt::Display for EnumTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.variant)
    }
}

// -----------------------------------------------------------------------------
// FieldValue

/// One decoded value.
///
/// Terminal values are copied out of the buffer; records and lists stay
/// lazy and share it.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// The explicit absent marker (`None`, empty cell).
    Absent,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Enum(EnumTag),
    Temporal(Temporal),
    Record(LazyRecord),
    List(LazyList),
}

impl FieldValue {
    /// Decode the value whose tag sits at `at`.
    pub(crate) fn read(buf: &Bytes, at: usize) -> Result<Self> {
        let mut cursor = Cursor::new(buf, at);
        Ok(match cursor.tag()? {
            Tag::Absent => Self::Absent,
            Tag::Bool => Self::Bool(cursor.bool()?),
            Tag::Int => Self::Int(cursor.i64()?),
            Tag::UInt => Self::UInt(cursor.u64()?),
            Tag::Float => Self::Float(cursor.f64()?),
            Tag::Char => Self::Char(cursor.char()?),
            Tag::Str => Self::Str(cursor.str()?.to_string()),
            Tag::Enum => {
                let type_path = cursor.str()?;
                Self::Enum(EnumTag::new(type_path, cursor.str()?))
            }
            Tag::Temporal => Self::Temporal(read_temporal(&mut cursor)?),
            Tag::Record => Self::Record(LazyRecord::index(buf.clone(), at)?),
            Tag::List => Self::List(LazyList::index(buf.clone(), at)?),
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed integer",
            Self::UInt(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Char(_) => "char",
            Self::Str(_) => "string",
            Self::Enum(_) => "enum",
            Self::Temporal(t) => t.kind().name(),
            Self::Record(_) => "record",
            Self::List(_) => "list",
        }
    }

    // Used in mismatch messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Enum(tag) => format!("enum tag `{}`", tag.variant()),
            Self::Int(v) => format!("signed integer {v}"),
            Self::UInt(v) => format!("unsigned integer {v}"),
            Self::Record(record) => format!("record `{}`", record.type_path()),
            other => other.kind_name().to_string(),
        }
    }

    #[inline]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Any integer that fits in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Any integer that fits in `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(v) => u64::try_from(*v).ok(),
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumTag> {
        match self {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_temporal(&self) -> Option<&Temporal> {
        match self {
            Self::Temporal(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&LazyRecord> {
        match self {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&LazyList> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// LazyRecord

struct FieldSlot {
    name: Box<str>,
    identity: bool,
    // Offset of the value's tag.
    value: usize,
}

struct RecordIndex {
    type_path: Box<str>,
    span: Range<usize>,
    fields: Box<[FieldSlot]>,
}

/// A read-only, field-indexed view over an encoded record.
///
/// Only this record's own level is indexed; nested records and lists are
/// indexed when looked up. Clones share the buffer and the index.
///
/// # Examples
///
/// ```
/// use vc_record::{Codec, derive::Record, filter::FilterPolicy};
///
/// #[derive(Record)]
/// struct Claim {
///     id: u64,
///     note: Option<String>,
/// }
///
/// let codec = Codec::pattern_matching(FilterPolicy::new(), Default::default());
/// let bytes = codec.encode(&Claim { id: 4, note: None }).unwrap();
/// let view = codec.decode(bytes).unwrap();
///
/// assert_eq!(view.field_names().collect::<Vec<_>>(), ["id", "note"]);
/// assert_eq!(view.field("id").unwrap().as_u64(), Some(4));
/// assert!(view.field("note").unwrap().is_absent());
/// assert!(view.field("missing").is_err());
/// ```
#[derive(Clone)]
pub struct LazyRecord {
    buf: Bytes,
    index: Arc<RecordIndex>,
}

impl LazyRecord {
    /// Index the record whose tag sits at `at`. The buffer is already valid.
    pub(crate) fn index(buf: Bytes, at: usize) -> Result<Self> {
        let mut cursor = Cursor::new(&buf, at);
        if cursor.tag()? != Tag::Record {
            return Err(MalformedRecordError::new(at, MalformedKind::RootNotRecord));
        }
        let type_path = cursor.str()?.into();

        let count = cursor.len()?;
        let mut fields = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            let name = cursor.str()?.into();
            let identity = cursor.u8()? & FLAG_IDENTITY != 0;
            let value = cursor.position();
            skip_value(&mut cursor, 0)?;
            fields.push(FieldSlot {
                name,
                identity,
                value,
            });
        }

        let index = RecordIndex {
            type_path,
            span: at..cursor.position(),
            fields: fields.into_boxed_slice(),
        };
        Ok(Self {
            buf,
            index: Arc::new(index),
        })
    }

    /// The type path written by the encoder.
    #[inline]
    pub fn type_path(&self) -> &str {
        &self.index.type_path
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.fields.is_empty()
    }

    /// Field names in encoded order.
    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.index.fields.iter().map(|slot| &*slot.name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.slot(name).is_some()
    }

    /// Whether the field carries the identity flag.
    pub fn is_identity_field(&self, name: &str) -> bool {
        self.slot(name).is_some_and(|slot| slot.identity)
    }

    /// Names of the identity fields, in encoded order.
    pub fn identity_fields(&self) -> impl Iterator<Item = &str> {
        self.index
            .fields
            .iter()
            .filter(|slot| slot.identity)
            .map(|slot| &*slot.name)
    }

    /// Look up a field, returning `None` if the record has no such field.
    pub fn get(&self, name: &str) -> Result<Option<FieldValue>> {
        match self.slot(name) {
            Some(slot) => FieldValue::read(&self.buf, slot.value).map(Some),
            None => Ok(None),
        }
    }

    /// Look up a field that must exist.
    pub fn field(&self, name: &str) -> core::result::Result<FieldValue, FieldError> {
        self.get(name)?.ok_or_else(|| FieldError::Unknown {
            ty: self.type_path().to_string(),
            field: name.to_string(),
        })
    }

    /// `(name, value)` pairs in encoded order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Result<FieldValue>)> {
        self.index
            .fields
            .iter()
            .map(|slot| (&*slot.name, FieldValue::read(&self.buf, slot.value)))
    }

    /// The encoded bytes of this record, from its tag on.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.index.span.clone()]
    }

    fn slot(&self, name: &str) -> Option<&FieldSlot> {
        self.index.fields.iter().find(|slot| &*slot.name == name)
    }
}

impl PartialEq for LazyRecord {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl fmt::Debug for LazyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.type_path())?;
        let mut map = f.debug_map();
        for (name, value) in self.iter() {
            match value {
                Ok(value) => map.entry(&name, &value),
                Err(err) => map.entry(&name, &err),
            };
        }
        map.finish()
    }
}

// -----------------------------------------------------------------------------
// LazyList

/// A lazy view over an encoded list.
#[derive(Clone)]
pub struct LazyList {
    buf: Bytes,
    span: Range<usize>,
    items: Arc<[usize]>,
}

impl LazyList {
    pub(crate) fn index(buf: Bytes, at: usize) -> Result<Self> {
        let mut cursor = Cursor::new(&buf, at);
        if cursor.tag()? != Tag::List {
            return Err(MalformedRecordError::new(at, MalformedKind::UnexpectedTag(buf[at])));
        }
        let count = cursor.len()?;
        let mut items = Vec::with_capacity(count.min(cursor.remaining()));
        for _ in 0..count {
            items.push(cursor.position());
            skip_value(&mut cursor, 0)?;
        }
        let span = at..cursor.position();
        Ok(Self {
            buf,
            span,
            items: items.into(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> core::result::Result<FieldValue, FieldError> {
        let at = *self.items.get(index).ok_or(FieldError::OutOfBounds {
            index,
            len: self.len(),
        })?;
        Ok(FieldValue::read(&self.buf, at)?)
    }

    /// Items in encoded order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Result<FieldValue>> + '_ {
        self.items.iter().map(|&at| FieldValue::read(&self.buf, at))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.span.clone()]
    }
}

impl PartialEq for LazyList {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl fmt::Debug for LazyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for item in self.iter() {
            match item {
                Ok(value) => list.entry(&value),
                Err(err) => list.entry(&err),
            };
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, LazyRecord};
    use crate::FieldError;
    use crate::de::decode;

    // {"a": 1u, "l": [true, absent]} with `a` flagged as identity.
    fn sample() -> LazyRecord {
        let bytes: &[u8] = &[
            b'V', b'P', b'D', b'X', 1, //
            0x09, 1, 0, 0, 0, b'T', 2, 0, 0, 0, //
            1, 0, 0, 0, b'a', 1, 0x03, 1, 0, 0, 0, 0, 0, 0, 0, //
            1, 0, 0, 0, b'l', 0, 0x0A, 2, 0, 0, 0, 0x01, 1, 0x00,
        ];
        decode(bytes).unwrap()
    }

    #[test]
    fn lookup_by_name() {
        let record = sample();
        assert_eq!(record.field("a").unwrap(), FieldValue::UInt(1));
        assert_eq!(record.field("a").unwrap().as_i64(), Some(1));
        assert!(record.has_field("l"));
        assert_eq!(record.get("zz").unwrap(), None);
        assert!(matches!(
            record.field("zz"),
            Err(FieldError::Unknown { field, .. }) if field == "zz"
        ));
    }

    #[test]
    fn identity_flags_are_exposed() {
        let record = sample();
        assert!(record.is_identity_field("a"));
        assert!(!record.is_identity_field("l"));
        assert_eq!(record.identity_fields().collect::<Vec<_>>(), ["a"]);
    }

    #[test]
    fn lists_are_lazy_and_bounded() {
        let record = sample();
        let value = record.field("l").unwrap();
        let list = value.as_list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).unwrap(), FieldValue::Bool(true));
        assert!(list.get(1).unwrap().is_absent());
        assert!(matches!(list.get(2), Err(FieldError::OutOfBounds { index: 2, len: 2 })));
    }

    #[test]
    fn clones_share_the_buffer() {
        let record = sample();
        let copy = record.clone();
        assert_eq!(record, copy);
        assert_eq!(record.as_bytes().as_ptr(), copy.as_bytes().as_ptr());
    }

    #[test]
    fn lazy_views_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LazyRecord>();
        assert_send_sync::<FieldValue>();
    }
}
