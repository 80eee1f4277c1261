use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::info::TypeRef;
use crate::registry::{TypeDescriptor, TypeRegistry};
use crate::strategy::{PlannedField, Strategy, StrategyKind};
use crate::{DescribeError, EncodeError, Record};

/// Uses the [`TypeRegistry`] for every record: fields are written in
/// descriptor order, and types the registry cannot describe are refused.
#[derive(Debug, Clone)]
pub struct DescriptorDriven {
    registry: Arc<TypeRegistry>,
}

impl DescriptorDriven {
    #[inline]
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    #[inline]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }
}

impl Default for DescriptorDriven {
    /// Backed by [`TypeRegistry::shared`].
    fn default() -> Self {
        Self::new(TypeRegistry::shared())
    }
}

impl Strategy for DescriptorDriven {
    #[inline]
    fn kind(&self) -> StrategyKind {
        StrategyKind::DescriptorDriven
    }

    #[inline]
    fn describe(&self, ty: TypeRef) -> Result<Arc<TypeDescriptor>, DescribeError> {
        self.registry.describe_ref(ty)
    }

    fn plan<'v>(&self, record: &'v dyn Record) -> Result<Vec<PlannedField<'v>>, EncodeError> {
        let descriptor = self.describe(record.type_ref())?;
        descriptor
            .iter()
            .map(|field| {
                let value = record.field(field.name()).ok_or(EncodeError::Unreadable {
                    ty: descriptor.identity().path(),
                    field: field.name(),
                })?;
                Ok(PlannedField {
                    name: field.name(),
                    identity: field.is_identity(),
                    value,
                })
            })
            .collect()
    }
}
