use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;
use std::sync::OnceLock;

use crate::de::{FieldValue, FromValue, Materializer};
use crate::info::{TypeIdentity, TypeRef, TypeShape, Typed};
use crate::{MaterializeError, Reflect, ReflectRef};

// -----------------------------------------------------------------------------
// Optional

impl<T: Typed> Typed for Option<T> {
    #[inline]
    fn type_shape() -> TypeShape {
        TypeShape::Optional(TypeRef::of::<T>())
    }
}

impl<T: Reflect> Reflect for Option<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self.as_ref().map(|v| v as &dyn Reflect))
    }

    #[inline]
    fn reflect_identity(&self) -> TypeIdentity {
        TypeIdentity::of::<Self>()
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: FieldValue, cx: &mut Materializer<'_>) -> Result<Self, MaterializeError> {
        match value {
            FieldValue::Absent => Ok(None),
            value => T::from_value(value, cx).map(Some),
        }
    }

    #[inline]
    fn absent() -> Option<Self> {
        Some(None)
    }
}

// A write-once cell is the usual way to close a reference cycle, so it reflects
// like `Option`.
impl<T: Typed> Typed for OnceLock<T> {
    #[inline]
    fn type_shape() -> TypeShape {
        TypeShape::Optional(TypeRef::of::<T>())
    }
}

impl<T: Reflect> Reflect for OnceLock<T> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        ReflectRef::Optional(self.get().map(|v| v as &dyn Reflect))
    }

    #[inline]
    fn reflect_identity(&self) -> TypeIdentity {
        TypeIdentity::of::<Self>()
    }
}

impl<T: FromValue> FromValue for OnceLock<T> {
    fn from_value(value: FieldValue, cx: &mut Materializer<'_>) -> Result<Self, MaterializeError> {
        match value {
            FieldValue::Absent => Ok(OnceLock::new()),
            value => T::from_value(value, cx).map(OnceLock::from),
        }
    }

    #[inline]
    fn absent() -> Option<Self> {
        Some(OnceLock::new())
    }
}

// -----------------------------------------------------------------------------
// Transparent

macro_rules! impl_transparent {
    ($($ptr:ident),+) => {$(
        impl<T: Typed> Typed for $ptr<T> {
            #[inline]
            fn type_shape() -> TypeShape {
                T::type_shape()
            }

            #[inline]
            fn type_identity() -> TypeIdentity {
                T::type_identity()
            }
        }

        impl<T: Reflect> Reflect for $ptr<T> {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                (**self).reflect_ref()
            }

            #[inline]
            fn reflect_identity(&self) -> TypeIdentity {
                (**self).reflect_identity()
            }
        }

        impl<T: FromValue> FromValue for $ptr<T> {
            #[inline]
            fn from_value(
                value: FieldValue,
                cx: &mut Materializer<'_>,
            ) -> Result<Self, MaterializeError> {
                T::from_value(value, cx).map($ptr::new)
            }

            #[inline]
            fn absent() -> Option<Self> {
                T::absent().map($ptr::new)
            }
        }
    )+};
}

impl_transparent!(Box, Arc, Rc);

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use std::sync::OnceLock;

    use crate::info::{ScalarKind, TypeShape, Typed};
    use crate::{Reflect, ReflectRef};

    #[test]
    fn pointers_are_transparent() {
        assert!(matches!(<Arc<i32>>::type_shape(), TypeShape::Scalar(ScalarKind::Int)));
        assert_eq!(<Box<i32>>::type_identity(), i32::type_identity());
        assert!(matches!(Arc::new(5_i32).reflect_ref(), ReflectRef::Scalar(_)));
    }

    #[test]
    fn empty_cells_are_absent() {
        let cell = OnceLock::<u8>::new();
        assert!(matches!(cell.reflect_ref(), ReflectRef::Optional(None)));
        let _ = cell.set(1);
        assert!(matches!(cell.reflect_ref(), ReflectRef::Optional(Some(_))));
    }
}
