use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::DescribeError;
use crate::de::FieldValue;
use crate::info::{EnumShape, ScalarKind, TemporalKind, TypeIdentity, TypeRef, TypeShape};

// -----------------------------------------------------------------------------
// FieldKind

/// The declared kind of a field, classified from its static type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Enum(EnumShape),
    Temporal(TemporalKind),
    /// A nested record of the given type.
    Record(TypeIdentity),
    /// An ordered collection; the element kind is classified recursively.
    List(Box<FieldKind>),
    /// Only produced by the pattern-matching strategy.
    Dynamic,
}

impl FieldKind {
    /// Classify `ty`, returning the kind and whether the field is nullable.
    ///
    /// `None` when the type has no kind: it is dynamic and dynamic fields
    /// are not allowed, or it is an optional of an optional, whose inner
    /// absence the wire cannot express.
    pub(crate) fn classify(ty: TypeRef, allow_dynamic: bool) -> Option<(Self, bool)> {
        let kind = match ty.shape() {
            TypeShape::Scalar(kind) => Self::Scalar(kind),
            TypeShape::Enum(shape) => Self::Enum(shape),
            TypeShape::Temporal(kind) => Self::Temporal(kind),
            TypeShape::Record(shape) => Self::Record(shape.identity()),
            TypeShape::List(element) => {
                let (element, _) = Self::classify(element, allow_dynamic)?;
                Self::List(Box::new(element))
            }
            TypeShape::Optional(inner) => {
                let (inner, nullable) = Self::classify(inner, allow_dynamic)?;
                return (!nullable).then_some((inner, true));
            }
            TypeShape::Dynamic if allow_dynamic => Self::Dynamic,
            TypeShape::Dynamic => return None,
        };
        Some((kind, false))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar(kind) => kind.name(),
            Self::Enum(_) => "enum",
            Self::Temporal(kind) => kind.name(),
            Self::Record(_) => "record",
            Self::List(_) => "list",
            Self::Dynamic => "dynamic",
        }
    }

    /// Whether a present encoded value may be converted into this kind.
    ///
    /// Signed and unsigned integers accept each other; range is checked on
    /// conversion. Enum tags must name a declared variant and nested records
    /// must carry the declared type path.
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (Self::Dynamic, _) => true,
            (Self::Scalar(ScalarKind::Int | ScalarKind::UInt), FieldValue::Int(_) | FieldValue::UInt(_)) => {
                true
            }
            (Self::Record(identity), FieldValue::Record(record)) => {
                record.type_path() == identity.path()
            }
            (Self::Scalar(ScalarKind::Bool), FieldValue::Bool(_))
            | (Self::Scalar(ScalarKind::Float), FieldValue::Float(_))
            | (Self::Scalar(ScalarKind::Char), FieldValue::Char(_))
            | (Self::Scalar(ScalarKind::Str), FieldValue::Str(_))
            | (Self::List(_), FieldValue::List(_)) => true,
            (Self::Enum(shape), FieldValue::Enum(tag)) => shape.contains(tag.variant()),
            (Self::Temporal(kind), FieldValue::Temporal(value)) => value.kind() == *kind,
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// FieldDescriptor

/// One field of a [`TypeDescriptor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: FieldKind,
    type_path: &'static str,
    nullable: bool,
    defaultable: bool,
    identity: bool,
}

impl FieldDescriptor {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Path of the declared field type.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Declared as `Option<T>` or `OnceLock<T>`.
    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Marked `#[record(default)]`.
    #[inline]
    pub fn is_defaultable(&self) -> bool {
        self.defaultable
    }

    /// Part of the record's identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.identity
    }
}

// -----------------------------------------------------------------------------
// DescribeRules

/// Adjustments a strategy makes while describing a type.
pub(crate) struct DescribeRules<'a> {
    pub allow_dynamic: bool,
    /// Return `false` to leave the field out.
    pub include: &'a dyn Fn(&str) -> bool,
    /// Return `true` to force the identity flag.
    pub identity: &'a dyn Fn(&str) -> bool,
}

impl DescribeRules<'static> {
    pub const STRICT: Self = Self {
        allow_dynamic: false,
        include: &keep_all,
        identity: &no_identity,
    };
}

fn keep_all(_: &str) -> bool {
    true
}

fn no_identity(_: &str) -> bool {
    false
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// Ordered field layout of a record type.
///
/// Immutable once built. Field order is declaration order and is used both
/// for encoding and for materializing.
///
/// # Examples
///
/// ```
/// use vc_record::{derive::Record, registry::{FieldKind, TypeRegistry}};
///
/// #[derive(Record)]
/// struct Step {
///     #[record(identity)]
///     step_id: u32,
///     note: Option<String>,
/// }
///
/// let registry = TypeRegistry::new();
/// let descriptor = registry.describe::<Step>().unwrap();
///
/// assert_eq!(descriptor.field_names().collect::<Vec<_>>(), ["step_id", "note"]);
/// assert!(descriptor.field("step_id").unwrap().is_identity());
/// assert!(descriptor.field("note").unwrap().is_nullable());
/// assert!(matches!(descriptor.field_at(1).unwrap().kind(), FieldKind::Scalar(_)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    identity: TypeIdentity,
    fields: Box<[FieldDescriptor]>,
}

impl TypeDescriptor {
    /// Reflect over `ty` and classify every field.
    pub(crate) fn build(ty: TypeRef, rules: &DescribeRules<'_>) -> Result<Self, DescribeError> {
        let identity = ty.identity();
        let shape = ty.shape();
        let Some(record) = shape.as_record() else {
            return Err(DescribeError::NotARecord {
                ty: identity.path(),
                kind: shape.kind_name(),
            });
        };

        let mut fields = Vec::with_capacity(record.fields().len());
        for field in record.fields() {
            if !(rules.include)(field.name()) {
                continue;
            }
            let field_ty = field.ty();
            let Some((kind, nullable)) = FieldKind::classify(field_ty, rules.allow_dynamic) else {
                return Err(DescribeError::UnsupportedFieldKind {
                    ty: identity.path(),
                    field: field.name(),
                    found: field_ty.identity().path(),
                });
            };
            fields.push(FieldDescriptor {
                name: field.name(),
                kind,
                type_path: field_ty.identity().path(),
                nullable,
                defaultable: field.is_defaultable(),
                identity: field.is_identity() || (rules.identity)(field.name()),
            });
        }

        Ok(Self {
            identity,
            fields: fields.into_boxed_slice(),
        })
    }

    #[inline]
    pub fn identity(&self) -> TypeIdentity {
        self.identity
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    /// Fields in declaration order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
