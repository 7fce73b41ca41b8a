//! Internal implementation details.

pub(crate) mod chain;
pub(crate) mod sync;

pub(crate) use chain::CallSiteChain;

/// Remaining native stack below which recursive walks move to a new segment.
pub(crate) const STACK_RED_ZONE: usize = 128 * 1024;
/// Size of each additional stack segment.
pub(crate) const STACK_SEGMENT: usize = 2 * 1024 * 1024;

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

#[cfg(feature = "ahash")]
pub(crate) type Set<T> = ahash::AHashSet<T>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Set<T> = std::collections::HashSet<T>;
