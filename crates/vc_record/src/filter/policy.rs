use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use crate::filter::Pattern;
use crate::hash::HashSet;
use crate::info::{TypeIdentity, Typed};
use crate::strategy::StrategyKind;

// -----------------------------------------------------------------------------
// Verdict

/// One rule's opinion about a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Include,
    Exclude,
    /// The rule does not mention the type.
    Unspecified,
}

// -----------------------------------------------------------------------------
// TypeFilter

/// A custom admission rule.
///
/// Implemented for every `Fn(&TypeIdentity) -> Verdict + Send + Sync`.
pub trait TypeFilter: Send + Sync {
    fn verdict(&self, ty: &TypeIdentity) -> Verdict;
}

impl<F> TypeFilter for F
where
    F: Fn(&TypeIdentity) -> Verdict + Send + Sync,
{
    #[inline]
    fn verdict(&self, ty: &TypeIdentity) -> Verdict {
        self(ty)
    }
}

// -----------------------------------------------------------------------------
// FilterPolicy

/// Decides which types may be serialized.
///
/// Evaluation is deterministic: any rule voting [`Verdict::Exclude`] wins,
/// then any [`Verdict::Include`]. A type no rule mentions falls back to
/// [`with_fallback`](Self::with_fallback) if set, otherwise to the strategy
/// default (excluded under descriptor-driven, included under
/// pattern-matching).
///
/// # Examples
///
/// ```
/// use vc_record::filter::{FilterPolicy, Verdict};
/// use vc_record::info::TypeIdentity;
/// use vc_record::strategy::StrategyKind;
///
/// struct Coverage;
/// struct CoverageDao;
///
/// let policy = FilterPolicy::new()
///     .include_pattern("*::Coverage*")
///     .exclude_pattern("*Dao");
///
/// let coverage = TypeIdentity::new::<Coverage>("app::Coverage", "Coverage");
/// let dao = TypeIdentity::new::<CoverageDao>("app::CoverageDao", "CoverageDao");
///
/// assert_eq!(policy.verdict(&coverage), Verdict::Include);
/// assert_eq!(policy.verdict(&dao), Verdict::Exclude);
/// assert!(!policy.permits(&dao, StrategyKind::PatternMatching));
/// ```
#[derive(Clone, Default)]
pub struct FilterPolicy {
    allowed: HashSet<TypeId>,
    denied: HashSet<TypeId>,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    custom: Vec<Arc<dyn TypeFilter>>,
    fallback: Option<bool>,
}

impl FilterPolicy {
    /// A policy with no rules; every type is unspecified.
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy admitting exactly the given types.
    pub fn allow_only(types: impl IntoIterator<Item = TypeIdentity>) -> Self {
        types
            .into_iter()
            .fold(Self::new(), Self::allow_type)
            .with_fallback(false)
    }

    #[inline]
    pub fn allow<T: Typed>(self) -> Self {
        self.allow_type(T::type_identity())
    }

    pub fn allow_type(mut self, ty: TypeIdentity) -> Self {
        self.allowed.insert(ty.id());
        self
    }

    #[inline]
    pub fn deny<T: Typed>(self) -> Self {
        self.deny_type(T::type_identity())
    }

    pub fn deny_type(mut self, ty: TypeIdentity) -> Self {
        self.denied.insert(ty.id());
        self
    }

    /// Include types whose path matches the glob.
    pub fn include_pattern(mut self, glob: &str) -> Self {
        self.include.push(Pattern::new(glob));
        self
    }

    /// Exclude types whose path matches the glob.
    pub fn exclude_pattern(mut self, glob: &str) -> Self {
        self.exclude.push(Pattern::new(glob));
        self
    }

    pub fn with_rule(mut self, rule: impl TypeFilter + 'static) -> Self {
        self.custom.push(Arc::new(rule));
        self
    }

    /// Override the strategy default for unspecified types.
    pub fn with_fallback(mut self, admit: bool) -> Self {
        self.fallback = Some(admit);
        self
    }

    /// The combined verdict of every rule.
    pub fn verdict(&self, ty: &TypeIdentity) -> Verdict {
        let path = ty.path();
        if self.denied.contains(&ty.id()) || self.exclude.iter().any(|p| p.matches(path)) {
            return Verdict::Exclude;
        }

        let mut included =
            self.allowed.contains(&ty.id()) || self.include.iter().any(|p| p.matches(path));
        for rule in &self.custom {
            match rule.verdict(ty) {
                Verdict::Exclude => return Verdict::Exclude,
                Verdict::Include => included = true,
                Verdict::Unspecified => {}
            }
        }

        if included {
            Verdict::Include
        } else {
            Verdict::Unspecified
        }
    }

    /// Whether `ty` may be serialized under `strategy`.
    pub fn permits(&self, ty: &TypeIdentity, strategy: StrategyKind) -> bool {
        match self.verdict(ty) {
            Verdict::Include => true,
            Verdict::Exclude => false,
            Verdict::Unspecified => self.fallback.unwrap_or(strategy.admits_unspecified()),
        }
    }
}

impl fmt::Debug for FilterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPolicy")
            .field("allowed", &self.allowed.len())
            .field("denied", &self.denied.len())
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("custom", &self.custom.len())
            .field("fallback", &self.fallback)
            .finish()
    }
}
