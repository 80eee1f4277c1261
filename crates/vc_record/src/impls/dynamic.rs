use alloc::boxed::Box;

use crate::de::{FieldValue, FromValue, Materializer};
use crate::info::{TypeIdentity, TypeShape, Typed};
use crate::{MaterializeError, Reflect, ReflectRef};

// A placeholder whose structure is only known at runtime. The descriptor
// strategy refuses to describe it; the pattern strategy encodes whatever it
// holds.
impl Typed for Box<dyn Reflect> {
    #[inline]
    fn type_shape() -> TypeShape {
        TypeShape::Dynamic
    }
}

impl Reflect for Box<dyn Reflect> {
    #[inline]
    fn reflect_ref(&self) -> ReflectRef<'_> {
        (**self).reflect_ref()
    }

    #[inline]
    fn reflect_identity(&self) -> TypeIdentity {
        (**self).reflect_identity()
    }
}

impl FromValue for Box<dyn Reflect> {
    fn from_value(value: FieldValue, cx: &mut Materializer<'_>) -> Result<Self, MaterializeError> {
        Err(cx.mismatch("a concrete type (dynamic placeholders cannot be materialized)", &value))
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use crate::info::{TypeShape, Typed};
    use crate::{Reflect, ReflectRef, ScalarRef};

    #[test]
    fn delegates_to_the_boxed_value() {
        let value: Box<dyn Reflect> = Box::new(String::from("x"));
        assert!(matches!(value.reflect_ref(), ReflectRef::Scalar(ScalarRef::Str("x"))));
        assert_eq!(value.reflect_identity().path(), "alloc::string::String");
        assert!(matches!(<Box<dyn Reflect>>::type_shape(), TypeShape::Dynamic));
    }
}
