use bytes::{BufMut, Bytes, BytesMut};

use crate::EncodeError;
use crate::format::{FLAG_IDENTITY, MAGIC, Tag, VERSION};
use crate::info::Temporal;
use crate::reflection::ScalarRef;

/// Appends values to an encoded record buffer.
pub(crate) struct RecordWriter {
    buf: BytesMut,
}

impl RecordWriter {
    pub fn new() -> Self {
        let mut buf = BytesMut::with_capacity(256);
        buf.put_slice(MAGIC);
        buf.put_u8(VERSION);
        Self { buf }
    }

    #[inline]
    pub fn absent(&mut self) {
        self.buf.put_u8(Tag::Absent as u8);
    }

    pub fn scalar(&mut self, scalar: ScalarRef<'_>) -> Result<(), EncodeError> {
        match scalar {
            ScalarRef::Bool(v) => {
                self.buf.put_u8(Tag::Bool as u8);
                self.buf.put_u8(u8::from(v));
            }
            ScalarRef::Int(v) => {
                self.buf.put_u8(Tag::Int as u8);
                self.buf.put_i64_le(v);
            }
            ScalarRef::UInt(v) => {
                self.buf.put_u8(Tag::UInt as u8);
                self.buf.put_u64_le(v);
            }
            ScalarRef::Float(v) => {
                self.buf.put_u8(Tag::Float as u8);
                self.buf.put_f64_le(v);
            }
            ScalarRef::Char(v) => {
                self.buf.put_u8(Tag::Char as u8);
                self.buf.put_u32_le(u32::from(v));
            }
            ScalarRef::Str(v) => {
                self.buf.put_u8(Tag::Str as u8);
                self.str(v)?;
            }
        }
        Ok(())
    }

    pub fn enum_tag(&mut self, type_path: &str, variant: &str) -> Result<(), EncodeError> {
        self.buf.put_u8(Tag::Enum as u8);
        self.str(type_path)?;
        self.str(variant)
    }

    pub fn temporal(&mut self, value: &Temporal) -> Result<(), EncodeError> {
        self.buf.put_u8(Tag::Temporal as u8);
        self.buf.put_u8(value.kind().code());
        self.str(&value.to_canonical())
    }

    /// Start a record; exactly `fields` calls to [`field`](Self::field),
    /// each followed by one value, must follow.
    pub fn begin_record(&mut self, type_path: &str, fields: usize) -> Result<(), EncodeError> {
        self.buf.put_u8(Tag::Record as u8);
        self.str(type_path)?;
        self.len(fields, "record")
    }

    pub fn field(&mut self, name: &str, identity: bool) -> Result<(), EncodeError> {
        self.str(name)?;
        self.buf.put_u8(if identity { FLAG_IDENTITY } else { 0 });
        Ok(())
    }

    /// Start a list of `items` values.
    pub fn begin_list(&mut self, items: usize) -> Result<(), EncodeError> {
        self.buf.put_u8(Tag::List as u8);
        self.len(items, "list")
    }

    #[inline]
    pub fn finish(self) -> Bytes {
        self.buf.freeze()
    }

    fn str(&mut self, value: &str) -> Result<(), EncodeError> {
        self.len(value.len(), "string")?;
        self.buf.put_slice(value.as_bytes());
        Ok(())
    }

    fn len(&mut self, len: usize, what: &'static str) -> Result<(), EncodeError> {
        let len = u32::try_from(len).map_err(|_| EncodeError::TooLarge { what, len })?;
        self.buf.put_u32_le(len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::RecordWriter;
    use crate::reflection::ScalarRef;

    #[test]
    fn layout_is_little_endian_and_tagged() {
        let mut writer = RecordWriter::new();
        writer.begin_record("T", 1).unwrap();
        writer.field("n", true).unwrap();
        writer.scalar(ScalarRef::Int(-2)).unwrap();

        let bytes = writer.finish();
        let expected: &[u8] = &[
            b'V', b'P', b'D', b'X', 1, // header
            0x09, 1, 0, 0, 0, b'T', 1, 0, 0, 0, // record `T`, one field
            1, 0, 0, 0, b'n', 0x01, // name `n`, identity
            0x02, 0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // int -2
        ];
        assert_eq!(&bytes[..], expected);
    }
}
