//! Items referenced by `#[derive(Record)]` output. Not public API.

pub use alloc::vec;

#[cfg(feature = "auto_register")]
pub use inventory;

#[cfg(feature = "auto_register")]
pub use auto_register::AutoRegistration;

#[cfg(feature = "auto_register")]
mod auto_register {
    use crate::info::TypeRef;

    /// A type submitted by `#[record(auto_register)]`.
    pub struct AutoRegistration {
        type_ref: fn() -> TypeRef,
    }

    impl AutoRegistration {
        #[inline]
        pub const fn new(type_ref: fn() -> TypeRef) -> Self {
            Self { type_ref }
        }

        #[inline]
        pub(crate) fn type_ref(&self) -> TypeRef {
            (self.type_ref)()
        }
    }

    inventory::collect!(AutoRegistration);
}
