use alloc::string::String;

use crate::de::{FieldValue, FromValue, Materializer};
use crate::info::{ScalarKind, TypeShape, Typed};
use crate::{MaterializeError, Reflect, ReflectRef, ScalarRef};

macro_rules! impl_reflect_scalar {
    ($ty:ty, $kind:ident, |$this:ident| $to_ref:expr) => {
        impl Typed for $ty {
            #[inline]
            fn type_shape() -> TypeShape {
                TypeShape::Scalar(ScalarKind::$kind)
            }
        }

        impl Reflect for $ty {
            #[inline]
            fn reflect_ref(&self) -> ReflectRef<'_> {
                let $this = self;
                ReflectRef::Scalar($to_ref)
            }

            #[inline]
            fn reflect_identity(&self) -> crate::info::TypeIdentity {
                <Self as Typed>::type_identity()
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Integers

macro_rules! impl_integer {
    (signed: $($ty:ty),+) => {$(
        impl_reflect_scalar!($ty, Int, |v| ScalarRef::Int(*v as i64));
        impl_integer!(@from $ty);
    )+};
    (unsigned: $($ty:ty),+) => {$(
        impl_reflect_scalar!($ty, UInt, |v| ScalarRef::UInt(*v as u64));
        impl_integer!(@from $ty);
    )+};
    (@from $ty:ty) => {
        impl FromValue for $ty {
            fn from_value(
                value: FieldValue,
                cx: &mut Materializer<'_>,
            ) -> Result<Self, MaterializeError> {
                let wide = match value {
                    FieldValue::Int(v) => i128::from(v),
                    FieldValue::UInt(v) => i128::from(v),
                    other => return Err(cx.mismatch("integer", &other)),
                };
                <$ty>::try_from(wide).map_err(|_| cx.out_of_range(stringify!($ty), wide))
            }
        }
    };
}

impl_integer!(signed: i8, i16, i32, i64, isize);
impl_integer!(unsigned: u8, u16, u32, u64, usize);

// -----------------------------------------------------------------------------
// Floats

macro_rules! impl_float {
    ($($ty:ty),+) => {$(
        impl_reflect_scalar!($ty, Float, |v| ScalarRef::Float(f64::from(*v)));

        impl FromValue for $ty {
            fn from_value(
                value: FieldValue,
                cx: &mut Materializer<'_>,
            ) -> Result<Self, MaterializeError> {
                match value {
                    FieldValue::Float(v) => Ok(v as $ty),
                    other => Err(cx.mismatch("float", &other)),
                }
            }
        }
    )+};
}

impl_float!(f32, f64);

// -----------------------------------------------------------------------------
// Others

impl_reflect_scalar!(bool, Bool, |v| ScalarRef::Bool(*v));
impl_reflect_scalar!(char, Char, |v| ScalarRef::Char(*v));
impl_reflect_scalar!(String, Str, |v| ScalarRef::Str(v.as_str()));

impl FromValue for bool {
    fn from_value(value: FieldValue, cx: &mut Materializer<'_>) -> Result<Self, MaterializeError> {
        match value {
            FieldValue::Bool(v) => Ok(v),
            other => Err(cx.mismatch("bool", &other)),
        }
    }
}

impl FromValue for char {
    fn from_value(value: FieldValue, cx: &mut Materializer<'_>) -> Result<Self, MaterializeError> {
        match value {
            FieldValue::Char(v) => Ok(v),
            other => Err(cx.mismatch("char", &other)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: FieldValue, cx: &mut Materializer<'_>) -> Result<Self, MaterializeError> {
        match value {
            FieldValue::Str(v) => Ok(v),
            other => Err(cx.mismatch("string", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::info::{ScalarKind, TypeShape, Typed};
    use crate::{Reflect, ReflectRef, ScalarRef};

    #[test]
    fn integers_widen() {
        assert!(matches!((-3_i8).reflect_ref(), ReflectRef::Scalar(ScalarRef::Int(-3))));
        assert!(matches!(
            u64::MAX.reflect_ref(),
            ReflectRef::Scalar(ScalarRef::UInt(u64::MAX))
        ));
        assert!(matches!(usize::type_shape(), TypeShape::Scalar(ScalarKind::UInt)));
        assert!(matches!(1.5_f32.reflect_ref(), ReflectRef::Scalar(ScalarRef::Float(v)) if v == 1.5));
    }
}
