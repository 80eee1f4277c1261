use alloc::string::ToString;
use core::any::TypeId;
use core::fmt;
use core::ops::Deref;

use bytes::Bytes;

use crate::filter::Admission;
use crate::format::{MAX_DEPTH, RecordWriter};
use crate::hash::HashSet;
use crate::info::TypeIdentity;
use crate::path::FieldPath;
use crate::strategy::Strategy;
use crate::{EncodeError, Record, Reflect, ReflectRef};

// -----------------------------------------------------------------------------
// EncodedRecord

/// The bytes of one encoded record, header included.
///
/// Cheap to clone. Converts into [`Bytes`] for storage.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct EncodedRecord {
    bytes: Bytes,
}

impl EncodedRecord {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl Deref for EncodedRecord {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for EncodedRecord {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<EncodedRecord> for Bytes {
    #[inline]
    fn from(record: EncodedRecord) -> Self {
        record.bytes
    }
}

impl fmt::Debug for EncodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedRecord")
            .field("len", &self.bytes.len())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Encoder

/// One encode call.
///
/// Cycle detection keys records by address and type, so two distinct
/// records with equal contents are fine while re-entering the same one is
/// not. The set lives only as long as the call.
///
/// Records and lists count toward the same nesting depth the decoder
/// accepts, so anything encoded here decodes.
pub(crate) struct Encoder<'a> {
    strategy: &'a dyn Strategy,
    admission: Admission<'a>,
    writer: RecordWriter,
    on_stack: HashSet<(usize, TypeId)>,
    path: FieldPath,
    depth: usize,
}

impl<'a> Encoder<'a> {
    pub fn new(strategy: &'a dyn Strategy, admission: Admission<'a>) -> Self {
        Self {
            strategy,
            admission,
            writer: RecordWriter::new(),
            on_stack: HashSet::default(),
            path: FieldPath::default(),
            depth: 0,
        }
    }

    pub fn encode(mut self, root: &dyn Record) -> Result<EncodedRecord, EncodeError> {
        self.write_record(root)?;
        Ok(EncodedRecord {
            bytes: self.writer.finish(),
        })
    }

    fn write_value(&mut self, value: &dyn Reflect) -> Result<(), EncodeError> {
        match value.reflect_ref() {
            ReflectRef::Scalar(scalar) => self.writer.scalar(scalar),
            ReflectRef::Enum(tag) => {
                self.admit(&tag.identity())?;
                self.writer.enum_tag(tag.identity().path(), tag.variant())
            }
            ReflectRef::Temporal(temporal) => self.writer.temporal(&temporal),
            ReflectRef::Optional(None) => {
                self.writer.absent();
                Ok(())
            }
            ReflectRef::Optional(Some(inner)) => {
                // A single absent marker cannot tell `None` from `Some(None)`.
                if let ReflectRef::Optional(_) = inner.reflect_ref() {
                    return Err(EncodeError::NestedOptional {
                        ty: value.reflect_identity().path(),
                        path: self.path.to_string(),
                    });
                }
                self.write_value(inner)
            }
            ReflectRef::List(list) => {
                self.enter()?;
                self.writer.begin_list(list.len())?;
                for (index, item) in list.iter().enumerate() {
                    self.path.push_index(index);
                    let written = self.write_value(item);
                    self.path.pop();
                    written?;
                }
                self.depth -= 1;
                Ok(())
            }
            ReflectRef::Record(record) => self.write_record(record),
        }
    }

    fn write_record(&mut self, record: &dyn Record) -> Result<(), EncodeError> {
        let identity = record.reflect_identity();
        self.admit(&identity)?;

        let key = (
            (record as *const dyn Record).cast::<()>() as usize,
            record.type_ref().id(),
        );
        if !self.on_stack.insert(key) {
            log::warn!("cycle through `{identity}` at `{}`", self.path);
            return Err(EncodeError::Cyclic {
                ty: identity.path(),
                path: self.path.to_string(),
            });
        }

        let written = self.enter().and_then(|()| {
            let written = self.write_fields(record);
            self.depth -= 1;
            written
        });
        self.on_stack.remove(&key);
        written
    }

    fn enter(&mut self) -> Result<(), EncodeError> {
        if self.depth == MAX_DEPTH {
            return Err(EncodeError::TooDeep {
                limit: MAX_DEPTH,
                path: self.path.to_string(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn write_fields(&mut self, record: &dyn Record) -> Result<(), EncodeError> {
        let fields = self.strategy.plan(record)?;
        self.writer
            .begin_record(record.reflect_identity().path(), fields.len())?;
        for field in fields {
            self.writer.field(field.name, field.identity)?;
            self.path.push_field(field.name);
            let written = self.write_value(field.value);
            self.path.pop();
            written?;
        }
        Ok(())
    }

    fn admit(&mut self, identity: &TypeIdentity) -> Result<(), EncodeError> {
        if self.admission.admits(identity, self.path.is_root()) {
            return Ok(());
        }
        Err(EncodeError::Rejected {
            ty: identity.path(),
            path: self.path.to_string(),
        })
    }
}
