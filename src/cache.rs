//! Shared cache of completed call sites.

use std::sync::Arc;

use crate::call_site::CallSite;
use crate::internal::sync::{self, RwLock};
use crate::internal::Map;
use crate::service_type::ServiceType;

/// Cache key: service type plus optional registration name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub service_type: ServiceType,
    pub name: Option<Arc<str>>,
}

impl CacheKey {
    pub fn new(service_type: ServiceType, name: Option<&str>) -> Self {
        Self {
            service_type,
            name: name.map(Arc::from),
        }
    }

    pub fn unnamed(service_type: ServiceType) -> Self {
        Self {
            service_type,
            name: None,
        }
    }
}

/// Thread-safe memo of call sites keyed by `(service type, name)`.
///
/// Reads take a shared lock. Inserts are insert-if-absent under the write
/// lock: when two threads race to build the same entry, the first insert
/// wins and both callers get that same `Arc`.
///
/// # Examples
///
/// ```rust
/// use ferrous_callsite::{ServiceCollection, ServiceType, ImplementationType};
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::new();
/// services.add_transient(ServiceType::named("Clock"), ImplementationType::named("SystemClock"));
/// let factory = services.build();
///
/// let first = factory.resolve_call_site(&ServiceType::named("Clock"), None).unwrap();
/// let second = factory.resolve_call_site(&ServiceType::named("Clock"), None).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(factory.cache().len(), 1);
/// ```
#[derive(Default)]
pub struct CallSiteCache {
    entries: RwLock<Map<CacheKey, Arc<CallSite>>>,
}

impl CallSiteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached call site for `key`.
    #[inline]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CallSite>> {
        sync::read(&self.entries).get(key).cloned()
    }

    /// Inserts `call_site` unless `key` is already present and returns the
    /// authoritative entry.
    pub fn get_or_insert(&self, key: CacheKey, call_site: Arc<CallSite>) -> Arc<CallSite> {
        let mut entries = sync::write(&self.entries);
        entries.entry(key).or_insert(call_site).clone()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        sync::read(&self.entries).contains_key(key)
    }

    pub fn len(&self) -> usize {
        sync::read(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
