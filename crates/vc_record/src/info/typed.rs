use crate::info::{TypeIdentity, TypeShape};

/// A type that can describe its own shape.
///
/// Implemented by `#[derive(Record)]` and by the built-in impls in
/// [`crate::impls`].
///
/// # Examples
///
/// ```
/// use vc_record::info::{ScalarKind, TypeShape, Typed};
///
/// assert!(matches!(u16::type_shape(), TypeShape::Scalar(ScalarKind::UInt)));
/// assert!(matches!(<Vec<u16>>::type_shape(), TypeShape::List(_)));
/// ```
pub trait Typed: 'static {
    fn type_shape() -> TypeShape;

    fn type_identity() -> TypeIdentity {
        TypeIdentity::of::<Self>()
    }
}
