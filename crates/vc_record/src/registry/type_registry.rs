use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{LazyLock, Mutex, OnceLock, PoisonError, RwLock};

use crate::DescribeError;
use crate::hash::HashMap;
use crate::info::{TypeRef, Typed};
use crate::registry::{DescribeRules, TypeDescriptor};

// -----------------------------------------------------------------------------
// DescriptorSlot

/// One cache entry. The mutex serializes builds of this type only.
#[derive(Default)]
struct DescriptorSlot {
    descriptor: OnceLock<Arc<TypeDescriptor>>,
    building: Mutex<()>,
}

// -----------------------------------------------------------------------------
// TypeRegistry

/// Build-once cache of [`TypeDescriptor`]s keyed by [`TypeId`].
///
/// The first `describe` of a type reflects over it; later calls return the
/// same `Arc`. Concurrent first calls run a single build and all receive its
/// result. Descriptors are never evicted.
///
/// A failed build stores nothing, so the next call simply tries again.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vc_record::{derive::Record, registry::TypeRegistry};
///
/// #[derive(Record)]
/// struct Coverage {
///     id: i64,
/// }
///
/// let registry = TypeRegistry::new();
/// let first = registry.describe::<Coverage>().unwrap();
/// let again = registry.describe::<Coverage>().unwrap();
///
/// assert!(Arc::ptr_eq(&first, &again));
/// assert_eq!(registry.builds(), 1);
/// assert!(registry.contains::<Coverage>());
/// ```
pub struct TypeRegistry {
    slots: RwLock<HashMap<TypeId, Arc<DescriptorSlot>>>,
    builds: AtomicUsize,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::default()),
            builds: AtomicUsize::new(0),
        }
    }

    /// The process-wide registry, shared by codecs that are not given one.
    pub fn shared() -> Arc<TypeRegistry> {
        static SHARED: LazyLock<Arc<TypeRegistry>> = LazyLock::new(|| Arc::new(TypeRegistry::new()));
        Arc::clone(&SHARED)
    }

    /// Describe `T`, building its descriptor on first use.
    #[inline]
    pub fn describe<T: Typed>(&self) -> Result<Arc<TypeDescriptor>, DescribeError> {
        self.describe_ref(TypeRef::of::<T>())
    }

    /// Describe the type behind `ty`, building its descriptor on first use.
    pub fn describe_ref(&self, ty: TypeRef) -> Result<Arc<TypeDescriptor>, DescribeError> {
        let slot = self.slot(ty.id());
        if let Some(found) = slot.descriptor.get() {
            return Ok(Arc::clone(found));
        }

        let _building = slot.building.lock().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished while we waited.
        if let Some(found) = slot.descriptor.get() {
            return Ok(Arc::clone(found));
        }

        let built = match TypeDescriptor::build(ty, &DescribeRules::STRICT) {
            Ok(built) => Arc::new(built),
            Err(err) => {
                log::debug!("cannot describe `{}`: {err}", ty.identity());
                return Err(err);
            }
        };
        self.builds.fetch_add(1, Ordering::Relaxed);
        log::debug!("described `{}` with {} field(s)", built.identity(), built.len());

        Ok(Arc::clone(slot.descriptor.get_or_init(|| built)))
    }

    /// The cached descriptor for `id`, without building.
    pub fn get(&self, id: TypeId) -> Option<Arc<TypeDescriptor>> {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.get(&id)?.descriptor.get().cloned()
    }

    /// Whether a descriptor for `T` has been built.
    #[inline]
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.get(TypeId::of::<T>()).is_some()
    }

    /// Number of cached descriptors.
    pub fn len(&self) -> usize {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.descriptor.get().is_some()).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of successful builds. Never exceeds the number of
    /// distinct described types.
    #[inline]
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Describe every type derived with `#[record(auto_register)]`.
    ///
    /// Returns how many types were visited. Without the `auto_register`
    /// feature this does nothing.
    pub fn auto_register(&self) -> Result<usize, DescribeError> {
        #[cfg(feature = "auto_register")]
        {
            let mut count = 0;
            for entry in inventory::iter::<crate::__macro_exports::AutoRegistration> {
                self.describe_ref(entry.type_ref())?;
                count += 1;
            }
            log::debug!("auto registered {count} record type(s)");
            Ok(count)
        }

        #[cfg(not(feature = "auto_register"))]
        {
            Ok(0)
        }
    }

    fn slot(&self, id: TypeId) -> Arc<DescriptorSlot> {
        if let Some(slot) = self.slots.read().unwrap_or_else(PoisonError::into_inner).get(&id) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(id).or_default())
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("len", &self.len())
            .field("builds", &self.builds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use std::sync::Barrier;
    use std::thread;

    use super::TypeRegistry;
    use crate::derive::Record;
    use crate::{DescribeError, Reflect};

    #[derive(Record)]
    struct Step {
        step_id: u32,
    }

    #[derive(Record)]
    struct Tier {
        steps: Vec<Step>,
        name: String,
    }

    #[derive(Record)]
    #[record(auto_register)]
    struct Registered {
        id: u32,
        steps: Vec<Step>,
    }

    #[derive(Record)]
    struct Broken {
        ok: u8,
        placeholder: Box<dyn Reflect>,
    }

    #[test]
    fn concurrent_first_describe_builds_once() {
        const CALLERS: usize = 8;

        let registry = Arc::new(TypeRegistry::new());
        let barrier = Arc::new(Barrier::new(CALLERS));

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.describe::<Tier>().unwrap()
                })
            })
            .collect();

        let seen: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(registry.builds(), 1);
        assert!(seen.iter().all(|d| Arc::ptr_eq(d, &seen[0])));
        assert_eq!(seen[0].field_names().collect::<Vec<_>>(), ["steps", "name"]);
    }

    #[test]
    fn nested_types_are_described_on_demand() {
        let registry = TypeRegistry::new();
        registry.describe::<Tier>().unwrap();

        assert!(registry.contains::<Tier>());
        assert!(!registry.contains::<Step>());
        assert_eq!(registry.len(), 1);

        registry.describe::<Step>().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.builds(), 2);
    }

    #[test]
    fn failures_do_not_poison_the_cache() {
        let registry = TypeRegistry::new();
        for _ in 0..2 {
            let err = registry.describe::<Broken>().unwrap_err();
            assert!(matches!(err, DescribeError::UnsupportedFieldKind { field: "placeholder", .. }));
        }
        assert!(!registry.contains::<Broken>());
        assert_eq!(registry.builds(), 0);

        // Other types are unaffected.
        assert!(registry.describe::<Step>().is_ok());
    }

    #[test]
    fn shared_registry_is_one_instance() {
        assert!(Arc::ptr_eq(&TypeRegistry::shared(), &TypeRegistry::shared()));
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register_describes_submitted_types() {
        let registry = TypeRegistry::new();
        let visited = registry.auto_register().unwrap();

        assert!(visited >= 1);
        assert!(registry.contains::<Registered>());
        // Only the submitted type itself, not its nested records.
        assert!(!registry.contains::<Step>());
    }
}
