use alloc::sync::Arc;

use crate::Codec;
use crate::filter::{FilterPolicy, NestedAdmission};
use crate::registry::TypeRegistry;
use crate::strategy::{DescriptorDriven, FieldRule, PatternMatching, PatternRules, StrategyKind};

/// Step-by-step [`Codec`] configuration.
///
/// Defaults: descriptor-driven strategy on [`TypeRegistry::shared`], an
/// empty policy, [`NestedAdmission::Enforce`] and no pattern rules.
///
/// ```
/// use vc_record::{Codec, strategy::StrategyKind};
///
/// let codec = Codec::builder()
///     .strategy(StrategyKind::PatternMatching)
///     .rules("app::*#identity=id".parse().unwrap())
///     .build();
/// assert_eq!(codec.strategy(), StrategyKind::PatternMatching);
/// ```
#[derive(Debug, Clone)]
pub struct CodecBuilder {
    kind: StrategyKind,
    policy: FilterPolicy,
    nested: NestedAdmission,
    registry: Option<Arc<TypeRegistry>>,
    rules: PatternRules,
}

impl Default for CodecBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl CodecBuilder {
    pub fn new() -> Self {
        Self {
            kind: StrategyKind::DescriptorDriven,
            policy: FilterPolicy::new(),
            nested: NestedAdmission::Enforce,
            registry: None,
            rules: PatternRules::new(),
        }
    }

    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn policy(mut self, policy: FilterPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn nested_admission(mut self, nested: NestedAdmission) -> Self {
        self.nested = nested;
        self
    }

    /// The registry a descriptor-driven codec describes types with.
    pub fn registry(mut self, registry: Arc<TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the pattern rules.
    pub fn rules(mut self, rules: PatternRules) -> Self {
        self.rules = rules;
        self
    }

    /// Add one pattern rule.
    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules = self.rules.with(rule);
        self
    }

    pub fn build(self) -> Codec {
        match self.kind {
            StrategyKind::DescriptorDriven => {
                if !self.rules.is_empty() {
                    log::warn!("pattern rules are ignored by the descriptor-driven strategy");
                }
                let registry = self.registry.unwrap_or_else(TypeRegistry::shared);
                Codec::new(DescriptorDriven::new(registry), self.policy, self.nested)
            }
            StrategyKind::PatternMatching => {
                Codec::new(PatternMatching::new(self.rules), self.policy, self.nested)
            }
        }
    }
}
