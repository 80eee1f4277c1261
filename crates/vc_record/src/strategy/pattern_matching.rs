use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::info::TypeRef;
use crate::registry::{DescribeRules, TypeDescriptor};
use crate::strategy::{PatternRules, PlannedField, Strategy, StrategyKind};
use crate::{DescribeError, EncodeError, Record};

/// Reads structure straight from the runtime value.
///
/// Every field the value exposes is written unless a [`PatternRules`] entry
/// for its type excludes it; identity flags come from the rules too. The
/// registry cache is never consulted, and dynamic placeholders are accepted.
#[derive(Debug, Clone, Default)]
pub struct PatternMatching {
    rules: PatternRules,
}

impl PatternMatching {
    #[inline]
    pub fn new(rules: PatternRules) -> Self {
        Self { rules }
    }

    #[inline]
    pub fn rules(&self) -> &PatternRules {
        &self.rules
    }
}

impl Strategy for PatternMatching {
    #[inline]
    fn kind(&self) -> StrategyKind {
        StrategyKind::PatternMatching
    }

    fn describe(&self, ty: TypeRef) -> Result<Arc<TypeDescriptor>, DescribeError> {
        let path = ty.identity().path();
        let include = |field: &str| !self.rules.excludes(path, field);
        let identity = |field: &str| self.rules.is_identity(path, field);
        let rules = DescribeRules {
            allow_dynamic: true,
            include: &include,
            identity: &identity,
        };
        TypeDescriptor::build(ty, &rules).map(Arc::new)
    }

    fn plan<'v>(&self, record: &'v dyn Record) -> Result<Vec<PlannedField<'v>>, EncodeError> {
        let path = record.reflect_identity().path();
        Ok(record
            .iter_fields()
            .filter(|(name, _)| !self.rules.excludes(path, name))
            .map(|(name, value)| PlannedField {
                name,
                identity: self.rules.is_identity(path, name),
                value,
            })
            .collect())
    }
}
