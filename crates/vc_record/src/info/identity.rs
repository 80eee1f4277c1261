use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::info::{TypeShape, Typed};

// -----------------------------------------------------------------------------
// TypeIdentity

/// The identity of a reflected type.
///
/// Equality and hashing only look at the [`TypeId`]; `path` is what filter
/// patterns and the wire format see.
///
/// # Examples
///
/// ```
/// use vc_record::info::TypeIdentity;
///
/// let id = TypeIdentity::of::<Vec<u8>>();
/// assert_eq!(id.path(), "alloc::vec::Vec<u8>");
/// assert_eq!(id.name(), "Vec<u8>");
/// assert!(id.is::<Vec<u8>>());
/// ```
#[derive(Clone, Copy)]
pub struct TypeIdentity {
    id: TypeId,
    path: &'static str,
    name: &'static str,
}

impl TypeIdentity {
    /// Create an identity with an explicit path and short name.
    #[inline]
    pub fn new<T: ?Sized + 'static>(path: &'static str, name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            path,
            name,
        }
    }

    /// Create an identity from [`type_name`].
    pub fn of<T: ?Sized + 'static>() -> Self {
        let path = type_name::<T>();
        Self {
            id: TypeId::of::<T>(),
            path,
            name: short_name(path),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full path, e.g. `app::model::Coverage`.
    #[inline]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Last path segment, e.g. `Coverage`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

// `alloc::vec::Vec<app::Step>` -> `Vec<app::Step>`
fn short_name(path: &'static str) -> &'static str {
    let head_end = path.find('<').unwrap_or(path.len());
    let start = path[..head_end].rfind("::").map_or(0, |at| at + 2);
    &path[start..]
}

impl PartialEq for TypeIdentity {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeIdentity {}

impl Hash for TypeIdentity {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for TypeIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

// -----------------------------------------------------------------------------
// TypeRef

/// A lazily evaluated handle to a [`Typed`] type.
///
/// Shapes refer to each other through `TypeRef`, so describing a type never
/// walks into the types of its fields until someone asks for them.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    identity: fn() -> TypeIdentity,
    shape: fn() -> TypeShape,
}

impl TypeRef {
    #[inline]
    pub fn of<T: Typed + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            identity: T::type_identity,
            shape: T::type_shape,
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn identity(&self) -> TypeIdentity {
        (self.identity)()
    }

    #[inline]
    pub fn shape(&self) -> TypeShape {
        (self.shape)()
    }
}

impl PartialEq for TypeRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeRef").field(&self.identity()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{TypeIdentity, short_name};

    #[test]
    fn short_names_keep_generic_arguments() {
        assert_eq!(short_name("u8"), "u8");
        assert_eq!(short_name("app::model::Coverage"), "Coverage");
        assert_eq!(
            short_name("alloc::vec::Vec<app::model::Step>"),
            "Vec<app::model::Step>"
        );
    }

    #[test]
    fn equality_ignores_paths() {
        let a = TypeIdentity::new::<u32>("custom::U32", "U32");
        let b = TypeIdentity::of::<u32>();
        assert_eq!(a, b);
        assert_ne!(a.path(), b.path());
        assert_ne!(a, TypeIdentity::of::<i32>());
    }
}
