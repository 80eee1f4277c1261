use core::any::Any;

use crate::info::{ScalarKind, Temporal, TypeIdentity};
use crate::{List, Record};

// -----------------------------------------------------------------------------
// ScalarRef

/// A borrowed primitive literal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarRef<'a> {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
}

impl ScalarRef<'_> {
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Bool(_) => ScalarKind::Bool,
            Self::Int(_) => ScalarKind::Int,
            Self::UInt(_) => ScalarKind::UInt,
            Self::Float(_) => ScalarKind::Float,
            Self::Char(_) => ScalarKind::Char,
            Self::Str(_) => ScalarKind::Str,
        }
    }
}

// -----------------------------------------------------------------------------
// EnumRef

/// The selected variant of a unit-only enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumRef {
    identity: TypeIdentity,
    variant: &'static str,
}

impl EnumRef {
    #[inline]
    pub const fn new(identity: TypeIdentity, variant: &'static str) -> Self {
        Self { identity, variant }
    }

    #[inline]
    pub fn identity(&self) -> TypeIdentity {
        self.identity
    }

    #[inline]
    pub fn variant(&self) -> &'static str {
        self.variant
    }
}

// -----------------------------------------------------------------------------
// ReflectRef

/// A borrowed view of a value, split by kind.
pub enum ReflectRef<'a> {
    Scalar(ScalarRef<'a>),
    Enum(EnumRef),
    Temporal(Temporal),
    Record(&'a dyn Record),
    List(&'a dyn List),
    /// `None` is encoded as the absent marker.
    Optional(Option<&'a dyn Reflect>),
}

impl ReflectRef<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(scalar) => scalar.kind().name(),
            Self::Enum(_) => "enum",
            Self::Temporal(t) => t.kind().name(),
            Self::Record(_) => "record",
            Self::List(_) => "list",
            Self::Optional(_) => "optional",
        }
    }
}

// -----------------------------------------------------------------------------
// Reflect

/// Runtime access to a value's structure.
///
/// This is what the encoder walks. Implemented by `#[derive(Record)]` and
/// the impls in [`crate::impls`].
///
/// # Examples
///
/// ```
/// use vc_record::{Reflect, ReflectRef, ScalarRef};
///
/// let value: &dyn Reflect = &7_u8;
/// assert!(matches!(value.reflect_ref(), ReflectRef::Scalar(ScalarRef::UInt(7))));
/// assert_eq!(value.reflect_identity().path(), "u8");
/// ```
pub trait Reflect: Any {
    fn reflect_ref(&self) -> ReflectRef<'_>;

    /// Identity of the concrete runtime type.
    fn reflect_identity(&self) -> TypeIdentity;
}

impl dyn Reflect {
    /// Downcast to the concrete type.
    #[inline]
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}
