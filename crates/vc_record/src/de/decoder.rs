use alloc::string::ToString;

use bytes::Bytes;

use crate::de::LazyRecord;
use crate::format::{Cursor, FLAG_IDENTITY, MAGIC, MAX_DEPTH, Tag, VERSION};
use crate::hash::HashSet;
use crate::info::{Temporal, TemporalKind};
use crate::{MalformedKind, MalformedRecordError};

type Result<T> = core::result::Result<T, MalformedRecordError>;

/// Validate a whole buffer and return a lazy view of its root record.
///
/// Nothing is returned unless every byte checks out: header, tags, lengths,
/// UTF-8, temporal literals, unique field names, nesting depth and the
/// absence of trailing bytes.
///
/// # Examples
///
/// ```
/// use vc_record::de::decode;
/// use vc_record::MalformedKind;
///
/// let err = decode(&b"VPDX\x01\x09\x00"[..]).unwrap_err();
/// assert!(matches!(err.kind, MalformedKind::Truncated { .. }));
///
/// let err = decode(&b"JSON"[..]).unwrap_err();
/// assert_eq!(err.kind, MalformedKind::BadMagic);
/// ```
pub fn decode(bytes: impl Into<Bytes>) -> Result<LazyRecord> {
    let buf: Bytes = bytes.into();
    let root = match validate(&buf) {
        Ok(root) => root,
        Err(err) => {
            log::debug!("rejecting {} byte buffer: {err}", buf.len());
            return Err(err);
        }
    };
    LazyRecord::index(buf, root)
}

// Returns the offset of the root record's tag.
fn validate(buf: &[u8]) -> Result<usize> {
    let mut cursor = Cursor::new(buf, 0);
    if cursor.take(MAGIC.len()).ok() != Some(&MAGIC[..]) {
        return Err(MalformedRecordError::new(0, MalformedKind::BadMagic));
    }

    let at = cursor.position();
    let version = cursor.u8()?;
    if version != VERSION {
        return Err(MalformedRecordError::new(at, MalformedKind::UnsupportedVersion(version)));
    }

    let root = cursor.position();
    if cursor.tag()? != Tag::Record {
        return Err(MalformedRecordError::new(root, MalformedKind::RootNotRecord));
    }
    skip_record(&mut cursor, 1)?;

    match cursor.remaining() {
        0 => Ok(root),
        extra => Err(cursor.error(MalformedKind::TrailingBytes(extra))),
    }
}

/// Skip one tagged value, validating it.
pub(crate) fn skip_value(cursor: &mut Cursor<'_>, depth: usize) -> Result<()> {
    match cursor.tag()? {
        Tag::Absent => {}
        Tag::Bool => {
            cursor.bool()?;
        }
        Tag::Int | Tag::UInt | Tag::Float => {
            cursor.take(8)?;
        }
        Tag::Char => {
            cursor.char()?;
        }
        Tag::Str => {
            cursor.str()?;
        }
        Tag::Enum => {
            cursor.str()?;
            cursor.str()?;
        }
        Tag::Temporal => {
            read_temporal(cursor)?;
        }
        Tag::Record => skip_record(cursor, depth + 1)?,
        Tag::List => {
            check_depth(cursor, depth + 1)?;
            for _ in 0..cursor.len()? {
                skip_value(cursor, depth + 1)?;
            }
        }
    }
    Ok(())
}

// The cursor sits just after the record tag.
fn skip_record(cursor: &mut Cursor<'_>, depth: usize) -> Result<()> {
    check_depth(cursor, depth)?;
    cursor.str()?;

    let count = cursor.len()?;
    let mut names = HashSet::default();
    for _ in 0..count {
        let at = cursor.position();
        let name = cursor.str()?;
        if !names.insert(name) {
            return Err(MalformedRecordError::new(
                at,
                MalformedKind::DuplicateField(name.to_string()),
            ));
        }

        let at = cursor.position();
        let flags = cursor.u8()?;
        if flags & !FLAG_IDENTITY != 0 {
            return Err(MalformedRecordError::new(at, MalformedKind::InvalidFlags(flags)));
        }

        skip_value(cursor, depth)?;
    }
    Ok(())
}

fn check_depth(cursor: &Cursor<'_>, depth: usize) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(cursor.error(MalformedKind::TooDeep(MAX_DEPTH)));
    }
    Ok(())
}

/// Read a temporal payload (kind byte and text).
pub(crate) fn read_temporal(cursor: &mut Cursor<'_>) -> Result<Temporal> {
    let at = cursor.position();
    let code = cursor.u8()?;
    let kind = TemporalKind::from_code(code)
        .ok_or_else(|| MalformedRecordError::new(at, MalformedKind::InvalidTemporalKind(code)))?;

    let at = cursor.position();
    let text = cursor.str()?;
    Temporal::parse(kind, text).ok_or_else(|| {
        MalformedRecordError::new(at, MalformedKind::InvalidTemporal(text.to_string()))
    })
}
