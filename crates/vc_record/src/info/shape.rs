use alloc::vec::Vec;

use crate::info::{TemporalKind, TypeIdentity, TypeRef, Typed};

// -----------------------------------------------------------------------------
// ScalarKind

/// Primitive literal kinds. Integers are widened on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    /// Any signed integer, carried as `i64`.
    Int,
    /// Any unsigned integer, carried as `u64`.
    UInt,
    /// `f32` or `f64`, carried as `f64`.
    Float,
    Char,
    Str,
}

impl ScalarKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "signed integer",
            Self::UInt => "unsigned integer",
            Self::Float => "float",
            Self::Char => "char",
            Self::Str => "string",
        }
    }
}

// -----------------------------------------------------------------------------
// EnumShape

/// A unit-only enumeration, encoded by variant name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumShape {
    identity: TypeIdentity,
    variants: &'static [&'static str],
}

impl EnumShape {
    #[inline]
    pub const fn new(identity: TypeIdentity, variants: &'static [&'static str]) -> Self {
        Self { identity, variants }
    }

    #[inline]
    pub fn identity(&self) -> TypeIdentity {
        self.identity
    }

    /// Variant names in declaration order.
    #[inline]
    pub fn variants(&self) -> &'static [&'static str] {
        self.variants
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.variants.contains(&variant)
    }
}

// -----------------------------------------------------------------------------
// FieldShape

/// One named field of a [`RecordShape`].
#[derive(Clone, Debug)]
pub struct FieldShape {
    name: &'static str,
    ty: TypeRef,
    defaultable: bool,
    identity: bool,
}

impl FieldShape {
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: TypeRef::of::<T>(),
            defaultable: false,
            identity: false,
        }
    }

    /// The field falls back to `Default::default()` when absent.
    #[inline]
    pub fn with_default(mut self) -> Self {
        self.defaultable = true;
        self
    }

    /// The field is part of the record's identity.
    #[inline]
    pub fn with_identity(mut self) -> Self {
        self.identity = true;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub fn is_defaultable(&self) -> bool {
        self.defaultable
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        self.identity
    }
}

// -----------------------------------------------------------------------------
// RecordShape

/// A composite type with named fields in declaration order.
#[derive(Clone, Debug)]
pub struct RecordShape {
    identity: TypeIdentity,
    fields: Vec<FieldShape>,
}

impl RecordShape {
    pub fn new(identity: TypeIdentity, fields: Vec<FieldShape>) -> Self {
        Self { identity, fields }
    }

    #[inline]
    pub fn identity(&self) -> TypeIdentity {
        self.identity
    }

    #[inline]
    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }
}

// -----------------------------------------------------------------------------
// TypeShape

/// What a type looks like to the serializer.
#[derive(Clone, Debug)]
pub enum TypeShape {
    Scalar(ScalarKind),
    Enum(EnumShape),
    Temporal(TemporalKind),
    Record(RecordShape),
    /// An ordered collection of the referenced element type.
    List(TypeRef),
    /// `Option`-like: the value may be absent.
    Optional(TypeRef),
    /// Only known from the runtime value, e.g. `Box<dyn Reflect>`.
    Dynamic,
}

impl TypeShape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Enum(_) => "enum",
            Self::Temporal(_) => "temporal",
            Self::Record(_) => "record",
            Self::List(_) => "list",
            Self::Optional(_) => "optional",
            Self::Dynamic => "dynamic",
        }
    }

    #[inline]
    pub fn as_record(&self) -> Option<&RecordShape> {
        match self {
            Self::Record(shape) => Some(shape),
            _ => None,
        }
    }
}
