// -----------------------------------------------------------------------------
// Modules

mod list;
mod record;
mod reflect;

// -----------------------------------------------------------------------------
// Exports

pub use list::{List, ListItemIter};
pub use record::{Record, RecordFieldIter};
pub use reflect::{EnumRef, Reflect, ReflectRef, ScalarRef};
