//! How record structure is discovered.
//!
//! A [`Codec`](crate::Codec) holds exactly one [`Strategy`], chosen when it is
//! built. Both strategies write the same format and read each other's
//! output.

// -----------------------------------------------------------------------------
// Modules

mod descriptor_driven;
mod pattern_matching;
mod rules;

// -----------------------------------------------------------------------------
// Exports

pub use descriptor_driven::DescriptorDriven;
pub use pattern_matching::PatternMatching;
pub use rules::{FieldRule, PatternRules, RuleParseError};

// -----------------------------------------------------------------------------
// Strategy

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::info::TypeRef;
use crate::registry::TypeDescriptor;
use crate::{DescribeError, EncodeError, Record, Reflect};

/// The two built-in strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Structure comes from cached [`TypeDescriptor`]s.
    DescriptorDriven,
    /// Structure comes from the runtime value and field name patterns.
    PatternMatching,
}

impl StrategyKind {
    /// Whether a type no policy rule mentions is admitted.
    #[inline]
    pub const fn admits_unspecified(self) -> bool {
        match self {
            Self::DescriptorDriven => false,
            Self::PatternMatching => true,
        }
    }
}

/// A field chosen for encoding.
pub struct PlannedField<'v> {
    pub name: &'static str,
    pub identity: bool,
    pub value: &'v dyn Reflect,
}

/// Discovers which fields of a record are written and read.
pub trait Strategy: Send + Sync + fmt::Debug {
    fn kind(&self) -> StrategyKind;

    /// The descriptor used to materialize `ty`.
    fn describe(&self, ty: TypeRef) -> Result<Arc<TypeDescriptor>, DescribeError>;

    /// The fields of `record` to encode, in order.
    fn plan<'v>(&self, record: &'v dyn Record) -> Result<Vec<PlannedField<'v>>, EncodeError>;
}
