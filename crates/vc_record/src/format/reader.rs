use crate::format::Tag;
use crate::{MalformedKind, MalformedRecordError};

/// Bounds-checked reads over an encoded buffer.
///
/// Every failure reports the offset where the bad read started.
#[derive(Clone)]
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

type Result<T> = core::result::Result<T, MalformedRecordError>;

impl<'a> Cursor<'a> {
    #[inline]
    pub fn new(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    #[inline]
    pub fn error(&self, kind: MalformedKind) -> MalformedRecordError {
        MalformedRecordError::new(self.pos, kind)
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(self.error(MalformedKind::Truncated { needed: n, remaining }));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32> {
        self.array().map(u32::from_le_bytes)
    }

    #[inline]
    pub fn u64(&mut self) -> Result<u64> {
        self.array().map(u64::from_le_bytes)
    }

    #[inline]
    pub fn i64(&mut self) -> Result<i64> {
        self.array().map(i64::from_le_bytes)
    }

    #[inline]
    pub fn f64(&mut self) -> Result<f64> {
        self.array().map(f64::from_le_bytes)
    }

    pub fn tag(&mut self) -> Result<Tag> {
        let at = self.pos;
        let byte = self.u8()?;
        Tag::from_u8(byte)
            .ok_or_else(|| MalformedRecordError::new(at, MalformedKind::UnexpectedTag(byte)))
    }

    pub fn bool(&mut self) -> Result<bool> {
        let at = self.pos;
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(MalformedRecordError::new(at, MalformedKind::InvalidBool(byte))),
        }
    }

    pub fn char(&mut self) -> Result<char> {
        let at = self.pos;
        let raw = self.u32()?;
        char::from_u32(raw).ok_or_else(|| MalformedRecordError::new(at, MalformedKind::InvalidChar(raw)))
    }

    /// A `u32` length prefix.
    #[inline]
    pub fn len(&mut self) -> Result<usize> {
        // u32 always fits in usize on supported targets.
        self.u32().map(|len| len as usize)
    }

    pub fn str(&mut self) -> Result<&'a str> {
        let len = self.len()?;
        let at = self.pos;
        let bytes = self.take(len)?;
        core::str::from_utf8(bytes).map_err(|_| MalformedRecordError::new(at, MalformedKind::InvalidUtf8))
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::MalformedKind;
    use crate::format::Tag;

    #[test]
    fn truncation_reports_offset_and_need() {
        let mut cursor = Cursor::new(&[7, 0, 0], 1);
        let err = cursor.u32().unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.kind, MalformedKind::Truncated { needed: 4, remaining: 2 });
    }

    #[test]
    fn strings_and_tags_are_validated() {
        let mut cursor = Cursor::new(&[2, 0, 0, 0, 0xC3, 0x28], 0);
        assert_eq!(cursor.str().unwrap_err().kind, MalformedKind::InvalidUtf8);

        let mut cursor = Cursor::new(&[0x0A, 0x0B], 0);
        assert_eq!(cursor.tag().unwrap(), Tag::List);
        let err = cursor.tag().unwrap_err();
        assert_eq!((err.offset, err.kind), (1, MalformedKind::UnexpectedTag(0x0B)));

        assert_eq!(Cursor::new(&[2], 0).bool().unwrap_err().kind, MalformedKind::InvalidBool(2));
    }
}
