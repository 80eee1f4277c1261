use core::any::TypeId;

use crate::filter::FilterPolicy;
use crate::hash::HashMap;
use crate::info::TypeIdentity;
use crate::strategy::StrategyKind;

/// Which types met during a walk are checked against the policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NestedAdmission {
    /// Every record and enum type is checked.
    #[default]
    Enforce,
    /// Only the root type is checked; everything reachable from an admitted
    /// root is admitted.
    Inherit,
}

/// Per-operation admission check with memoized verdicts.
pub(crate) struct Admission<'a> {
    policy: &'a FilterPolicy,
    strategy: StrategyKind,
    nested: NestedAdmission,
    memo: HashMap<TypeId, bool>,
}

impl<'a> Admission<'a> {
    pub fn new(policy: &'a FilterPolicy, strategy: StrategyKind, nested: NestedAdmission) -> Self {
        Self {
            policy,
            strategy,
            nested,
            memo: HashMap::default(),
        }
    }

    pub fn admits(&mut self, ty: &TypeIdentity, is_root: bool) -> bool {
        if !is_root && self.nested == NestedAdmission::Inherit {
            return true;
        }
        let (policy, strategy) = (self.policy, self.strategy);
        let admitted = *self
            .memo
            .entry(ty.id())
            .or_insert_with(|| policy.permits(ty, strategy));
        if !admitted {
            log::debug!("filter policy rejects `{ty}`");
        }
        admitted
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::{Admission, NestedAdmission};
    use crate::filter::{FilterPolicy, Verdict};
    use crate::info::{TypeIdentity, Typed};
    use crate::strategy::StrategyKind;

    #[test]
    fn verdicts_are_memoized_per_operation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let policy = FilterPolicy::new().with_rule(move |_: &TypeIdentity| {
            counter.fetch_add(1, Ordering::Relaxed);
            Verdict::Include
        });

        let mut admission = Admission::new(&policy, StrategyKind::DescriptorDriven, NestedAdmission::Enforce);
        for _ in 0..3 {
            assert!(admission.admits(&u8::type_identity(), false));
        }
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn inherit_only_checks_the_root() {
        let policy = FilterPolicy::new();
        let mut admission = Admission::new(&policy, StrategyKind::DescriptorDriven, NestedAdmission::Inherit);
        assert!(!admission.admits(&u8::type_identity(), true));
        assert!(admission.admits(&u8::type_identity(), false));
    }
}
