use alloc::string::{String, ToString};
use alloc::sync::Arc;

use crate::de::{EnumTag, FieldValue, LazyRecord};
use crate::filter::Admission;
use crate::info::{TypeRef, Typed};
use crate::MaterializeError;
use crate::path::FieldPath;
use crate::registry::{FieldKind, TypeDescriptor};
use crate::strategy::Strategy;

// -----------------------------------------------------------------------------
// FromValue

/// Rebuild a value from its decoded form.
///
/// `#[derive(Record)]` implements this for records and enums; see
/// [`Materializer::record`] for the shape of a hand-written impl.
pub trait FromValue: Sized {
    fn from_value(value: FieldValue, cx: &mut Materializer<'_>) -> Result<Self, MaterializeError>;

    /// The value used when the field is absent, if the type has one.
    ///
    /// `Option` and `OnceLock` return their empty state.
    #[inline]
    fn absent() -> Option<Self> {
        None
    }
}

// -----------------------------------------------------------------------------
// Materializer

/// State of one materialize call: active strategy, memoized admission and
/// the current field path for error messages.
pub struct Materializer<'a> {
    strategy: &'a dyn Strategy,
    admission: Admission<'a>,
    path: FieldPath,
}

impl<'a> Materializer<'a> {
    pub(crate) fn new(strategy: &'a dyn Strategy, admission: Admission<'a>) -> Self {
        Self {
            strategy,
            admission,
            path: FieldPath::default(),
        }
    }

    /// Open a record value as `T`.
    ///
    /// The record must carry `T`'s type path. Checks admission and fetches
    /// `T`'s descriptor from the active strategy.
    ///
    /// ```
    /// use vc_record::{FromValue, FieldValue, MaterializeError};
    /// use vc_record::de::Materializer;
    /// use vc_record::info::{FieldShape, RecordShape, TypeShape, Typed};
    ///
    /// struct Point {
    ///     x: i32,
    ///     y: i32,
    /// }
    ///
    /// impl Typed for Point {
    ///     fn type_shape() -> TypeShape {
    ///         TypeShape::Record(RecordShape::new(
    ///             Self::type_identity(),
    ///             vec![FieldShape::new::<i32>("x"), FieldShape::new::<i32>("y")],
    ///         ))
    ///     }
    /// }
    ///
    /// impl FromValue for Point {
    ///     fn from_value(value: FieldValue, cx: &mut Materializer<'_>) -> Result<Self, MaterializeError> {
    ///         let reader = cx.record::<Self>(value)?;
    ///         Ok(Self {
    ///             x: reader.read(cx, "x")?,
    ///             y: reader.read(cx, "y")?,
    ///         })
    ///     }
    /// }
    /// ```
    pub fn record<T: Typed>(&mut self, value: FieldValue) -> Result<RecordReader, MaterializeError> {
        let FieldValue::Record(record) = value else {
            return Err(self.mismatch("record", &value));
        };
        let identity = T::type_identity();
        if record.type_path() != identity.path() {
            return Err(MaterializeError::TypeMismatch {
                path: self.path.to_string(),
                expected: ["record `", identity.path(), "`"].concat(),
                found: ["record `", record.type_path(), "`"].concat(),
            });
        }
        self.admit::<T>()?;
        let descriptor = self.strategy.describe(TypeRef::of::<T>())?;
        Ok(RecordReader { record, descriptor })
    }

    /// Open an enum value as `T`, returning its tag.
    pub fn variant<T: Typed>(&mut self, value: FieldValue) -> Result<EnumTag, MaterializeError> {
        let FieldValue::Enum(tag) = value else {
            return Err(self.mismatch("enum", &value));
        };
        self.admit::<T>()?;
        Ok(tag)
    }

    /// Error for an enum tag naming no variant of `T`.
    pub fn unknown_variant<T: Typed>(&self, tag: &EnumTag) -> MaterializeError {
        MaterializeError::TypeMismatch {
            path: self.path.to_string(),
            expected: ["a variant of `", T::type_identity().path(), "`"].concat(),
            found: ["enum tag `", tag.variant(), "`"].concat(),
        }
    }

    /// Error for a value of the wrong kind at the current path.
    pub fn mismatch(&self, expected: &str, found: &FieldValue) -> MaterializeError {
        MaterializeError::TypeMismatch {
            path: self.path.to_string(),
            expected: expected.to_string(),
            found: found.describe(),
        }
    }

    pub(crate) fn out_of_range(&self, target: &str, value: i128) -> MaterializeError {
        MaterializeError::TypeMismatch {
            path: self.path.to_string(),
            expected: ["a value in range of `", target, "`"].concat(),
            found: value.to_string(),
        }
    }

    pub(crate) fn at_index<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push_index(index);
        let out = f(self);
        self.path.pop();
        out
    }

    fn at_field<R>(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push_field(name);
        let out = f(self);
        self.path.pop();
        out
    }

    fn admit<T: Typed>(&mut self) -> Result<(), MaterializeError> {
        let identity = T::type_identity();
        if self.admission.admits(&identity, self.path.is_root()) {
            return Ok(());
        }
        Err(MaterializeError::Rejected {
            ty: identity.path(),
            path: self.path.to_string(),
        })
    }
}

// -----------------------------------------------------------------------------
// RecordReader

/// Field access for one record being materialized.
///
/// Fields are looked up by name, so encoded field order does not matter.
pub struct RecordReader {
    record: LazyRecord,
    descriptor: Arc<TypeDescriptor>,
}

impl RecordReader {
    /// Read a field that must be present unless `T` has an absent value.
    #[inline]
    pub fn read<T: FromValue>(
        &self,
        cx: &mut Materializer<'_>,
        name: &'static str,
    ) -> Result<T, MaterializeError> {
        self.read_with(cx, name, || None)
    }

    /// Read a field, falling back to `T::default()` when it is absent.
    #[inline]
    pub fn read_or_default<T: FromValue + Default>(
        &self,
        cx: &mut Materializer<'_>,
        name: &'static str,
    ) -> Result<T, MaterializeError> {
        self.read_with(cx, name, || Some(T::default()))
    }

    fn read_with<T: FromValue>(
        &self,
        cx: &mut Materializer<'_>,
        name: &'static str,
        fallback: impl FnOnce() -> Option<T>,
    ) -> Result<T, MaterializeError> {
        let or_missing = |fallback: Option<T>| {
            T::absent()
                .or(fallback)
                .ok_or(MaterializeError::MissingField {
                    ty: self.descriptor.identity().path(),
                    field: name,
                })
        };

        // Fields the active strategy leaves out take the absent path.
        let Some(field) = self.descriptor.field(name) else {
            return or_missing(fallback());
        };
        let value = match self.record.get(name)? {
            Some(value) if !value.is_absent() => value,
            _ => return or_missing(fallback()),
        };

        if !field.kind().accepts(&value) {
            return Err(MaterializeError::TypeMismatch {
                path: cx.path.child(name),
                expected: expected_kind(field.kind()),
                found: value.describe(),
            });
        }
        cx.at_field(name, |cx| T::from_value(value, cx))
    }
}

fn expected_kind(kind: &FieldKind) -> String {
    match kind {
        FieldKind::Enum(shape) => ["a variant of `", shape.identity().path(), "`"].concat(),
        FieldKind::Record(identity) => ["record `", identity.path(), "`"].concat(),
        other => other.name().to_string(),
    }
}
