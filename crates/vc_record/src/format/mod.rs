//! The binary record format.
//!
//! ```text
//! record-file := MAGIC("VPDX") VERSION(u8) record
//! value       := tag(u8) payload
//!   0x00 absent
//!   0x01 bool      u8 (0|1)
//!   0x02 int       i64 LE
//!   0x03 uint      u64 LE
//!   0x04 float     f64 LE
//!   0x05 char      u32 LE
//!   0x06 str       len(u32 LE) utf8
//!   0x07 enum      str(type path) str(variant)
//!   0x08 temporal  kind(u8) str(ISO-8601 text)
//!   0x09 record    str(type path) count(u32 LE) { str(name) flags(u8) value }*
//!   0x0A list      count(u32 LE) value*
//! ```
//!
//! Every value carries its tag, so a buffer parses without a schema.

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

pub(crate) use reader::Cursor;
pub(crate) use writer::RecordWriter;

// -----------------------------------------------------------------------------
// Constants

pub const MAGIC: &[u8; 4] = b"VPDX";

pub const VERSION: u8 = 1;

/// Maximum record/list nesting accepted by the decoder.
pub const MAX_DEPTH: usize = 128;

/// Field flag: the field is part of the record's identity.
pub const FLAG_IDENTITY: u8 = 0b0000_0001;

// -----------------------------------------------------------------------------
// Tag

/// Value tags.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Absent = 0x00,
    Bool = 0x01,
    Int = 0x02,
    UInt = 0x03,
    Float = 0x04,
    Char = 0x05,
    Str = 0x06,
    Enum = 0x07,
    Temporal = 0x08,
    Record = 0x09,
    List = 0x0A,
}

impl Tag {
    pub const fn from_u8(byte: u8) -> Option<Self> {
        Some(match byte {
            0x00 => Self::Absent,
            0x01 => Self::Bool,
            0x02 => Self::Int,
            0x03 => Self::UInt,
            0x04 => Self::Float,
            0x05 => Self::Char,
            0x06 => Self::Str,
            0x07 => Self::Enum,
            0x08 => Self::Temporal,
            0x09 => Self::Record,
            0x0A => Self::List,
            _ => return None,
        })
    }
}
