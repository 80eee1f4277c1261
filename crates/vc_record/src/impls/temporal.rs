use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::de::{FieldValue, FromValue, Materializer};
use crate::info::{Temporal, TemporalKind, TypeIdentity, TypeShape, Typed};
use crate::{MaterializeError, Reflect, ReflectRef};

macro_rules! impl_temporal {
    ($($ty:ty => $variant:ident),+ $(,)?) => {$(
        impl Typed for $ty {
            #[inline]
            fn type_shape() -> TypeShape {
                TypeShape::Temporal(TemporalKind::$variant)
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                ReflectRef::Temporal(Temporal::$variant(*self))
            }

            #[inline]
            fn reflect_identity(&self) -> TypeIdentity {
                <Self as Typed>::type_identity()
            }
        }

        impl FromValue for $ty {
            fn from_value(
                value: FieldValue,
                cx: &mut Materializer<'_>,
            ) -> Result<Self, MaterializeError> {
                match value {
                    FieldValue::Temporal(Temporal::$variant(v)) => Ok(v),
                    other => Err(cx.mismatch(TemporalKind::$variant.name(), &other)),
                }
            }
        }
    )+};
}

impl_temporal! {
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => DateTime,
    DateTime<Utc> => Instant,
}
