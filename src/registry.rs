//! The service registry read by the resolution engine.

use std::sync::Arc;

use crate::descriptors::{OpenGenericDescriptor, ServiceDescriptor};
use crate::internal::{Map, Set};
use crate::service_type::{GenericType, ServiceType};

/// Read-only view of registered services.
///
/// This is the seam between the resolution engine and whatever owns the
/// registrations. The engine treats the registry as immutable for its whole
/// lifetime.
pub trait ServiceRegistry: Send + Sync {
    /// Descriptors registered for exactly `service_type` under `name`, in
    /// registration order.
    fn descriptors(&self, service_type: &ServiceType, name: Option<&str>) -> Vec<Arc<ServiceDescriptor>>;

    /// Open generic descriptors for `definition` under `name`, in
    /// registration order.
    fn open_generic_descriptors(&self, definition: &GenericType, name: Option<&str>) -> Vec<Arc<OpenGenericDescriptor>>;

    /// Every distinct `(service type, name)` with at least one closed
    /// descriptor, in first-registration order.
    fn service_keys(&self) -> Vec<(ServiceType, Option<Arc<str>>)>;
}

/// Registry built by [`ServiceCollection`](crate::ServiceCollection).
#[derive(Default)]
pub struct Registry {
    closed: Map<ServiceType, Vec<Arc<ServiceDescriptor>>>,
    open: Map<GenericType, Vec<Arc<OpenGenericDescriptor>>>,
    keys: Vec<(ServiceType, Option<Arc<str>>)>,
    seen: Set<(ServiceType, Option<Arc<str>>)>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, descriptor: ServiceDescriptor) {
        let key = (descriptor.service_type.clone(), descriptor.name.clone());
        if self.seen.insert(key.clone()) {
            self.keys.push(key);
        }
        self.closed
            .entry(descriptor.service_type.clone())
            .or_default()
            .push(Arc::new(descriptor));
    }

    pub(crate) fn insert_open(&mut self, descriptor: OpenGenericDescriptor) {
        self.open
            .entry(descriptor.service.clone())
            .or_default()
            .push(Arc::new(descriptor));
    }

    /// Number of closed and open descriptors.
    pub fn len(&self) -> usize {
        self.closed.values().map(Vec::len).sum::<usize>() + self.open.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ServiceRegistry for Registry {
    fn descriptors(&self, service_type: &ServiceType, name: Option<&str>) -> Vec<Arc<ServiceDescriptor>> {
        self.closed
            .get(service_type)
            .map(|all| {
                all.iter()
                    .filter(|d| d.service_name() == name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn open_generic_descriptors(&self, definition: &GenericType, name: Option<&str>) -> Vec<Arc<OpenGenericDescriptor>> {
        self.open
            .get(definition)
            .map(|all| {
                all.iter()
                    .filter(|d| d.name.as_deref() == name)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn service_keys(&self) -> Vec<(ServiceType, Option<Arc<str>>)> {
        self.keys.clone()
    }
}
