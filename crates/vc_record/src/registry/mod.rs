//! Type descriptors and the registry that caches them.

// -----------------------------------------------------------------------------
// Modules

mod descriptor;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor::{FieldDescriptor, FieldKind, TypeDescriptor};
pub use type_registry::TypeRegistry;

pub(crate) use descriptor::DescribeRules;
