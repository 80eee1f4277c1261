//! Hash containers with a fixed `foldhash` state.

pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, foldhash::fast::FixedState>;
pub(crate) type HashSet<T> = hashbrown::HashSet<T, foldhash::fast::FixedState>;
