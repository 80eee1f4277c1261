//! Static type information.
//!
//! Every reflected type describes itself through [`Typed::type_shape`]. The
//! registry turns those shapes into cached descriptors; nothing here is
//! computed more than once per call.

// -----------------------------------------------------------------------------
// Modules

mod identity;
mod shape;
mod temporal;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use identity::{TypeIdentity, TypeRef};
pub use shape::{EnumShape, FieldShape, RecordShape, ScalarKind, TypeShape};
pub use temporal::{Temporal, TemporalKind};
pub use typed::Typed;
