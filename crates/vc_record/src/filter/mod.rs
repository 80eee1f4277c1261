//! Type admission.
//!
//! A [`FilterPolicy`] decides which record and enum types may take part in
//! encoding or materializing. Scalars, temporals and collections are never
//! filtered; a collection is checked through its element types.

// -----------------------------------------------------------------------------
// Modules

mod admission;
mod pattern;
mod policy;

// -----------------------------------------------------------------------------
// Exports

pub use admission::NestedAdmission;
pub use pattern::Pattern;
pub use policy::{FilterPolicy, TypeFilter, Verdict};

pub(crate) use admission::Admission;
