//! Diagnostic observers for call-site resolution.
//!
//! Observers receive an event when a top-level resolution starts, completes
//! or fails, and whenever a request is served from the call-site cache.

use std::sync::Arc;
use std::time::Duration;

use crate::call_site::CallSite;
use crate::error::DiError;
use crate::service_type::ServiceType;

/// Observer trait for resolution events.
///
/// Observer calls are made synchronously on the resolving thread. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use ferrous_callsite::{CallSite, CallSiteObserver, DiError, ServiceCollection, ServiceType};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// struct PrintObserver;
///
/// impl CallSiteObserver for PrintObserver {
///     fn resolving(&self, service_type: &ServiceType) {
///         println!("Resolving: {}", service_type);
///     }
///
///     fn resolved(&self, service_type: &ServiceType, duration: Duration, call_site: &CallSite) {
///         println!("Resolved: {} in {:?} ({} deps)", service_type, duration, call_site.dependency_count());
///     }
///
///     fn failed(&self, service_type: &ServiceType, error: &DiError) {
///         println!("Failed: {}: {}", service_type, error);
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(PrintObserver));
/// let factory = services.build();
/// ```
pub trait CallSiteObserver: Send + Sync {
    /// Called before a top-level resolution walks the registry.
    fn resolving(&self, service_type: &ServiceType);

    /// Called after a top-level resolution produced a call site.
    fn resolved(&self, service_type: &ServiceType, duration: Duration, call_site: &CallSite);

    /// Called when a top-level resolution fails. The error is still returned
    /// to the caller afterwards.
    fn failed(&self, service_type: &ServiceType, error: &DiError);

    /// Called when a request is answered from the cache.
    fn cache_hit(&self, _service_type: &ServiceType) {}
}

/// Registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn CallSiteObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn CallSiteObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, service_type: &ServiceType) {
        for observer in &self.observers {
            observer.resolving(service_type);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, service_type: &ServiceType, duration: Duration, call_site: &CallSite) {
        for observer in &self.observers {
            observer.resolved(service_type, duration, call_site);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, service_type: &ServiceType, error: &DiError) {
        for observer in &self.observers {
            observer.failed(service_type, error);
        }
    }

    #[inline]
    pub(crate) fn cache_hit(&self, service_type: &ServiceType) {
        for observer in &self.observers {
            observer.cache_hit(service_type);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Successful resolutions are logged at `debug`, cache hits at `trace` and
/// failures at `warn`, all under the `ferrous_callsite` target.
///
/// # Examples
///
/// ```
/// use ferrous_callsite::{ServiceCollection, TracingObserver};
/// use std::sync::Arc;
///
/// let mut services = ServiceCollection::new();
/// services.add_observer(Arc::new(TracingObserver::new()));
/// let factory = services.build();
/// ```
pub struct TracingObserver {
    prefix: String,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-callsite".to_string(),
        }
    }

    /// Observer whose events carry a custom `container` field.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl CallSiteObserver for TracingObserver {
    fn resolving(&self, service_type: &ServiceType) {
        tracing::debug!(
            target: "ferrous_callsite",
            container = %self.prefix,
            service = %service_type,
            "resolving call site"
        );
    }

    fn resolved(&self, service_type: &ServiceType, duration: Duration, call_site: &CallSite) {
        tracing::debug!(
            target: "ferrous_callsite",
            container = %self.prefix,
            service = %service_type,
            elapsed_us = duration.as_micros() as u64,
            dependencies = call_site.dependency_count(),
            "resolved call site"
        );
    }

    fn failed(&self, service_type: &ServiceType, error: &DiError) {
        tracing::warn!(
            target: "ferrous_callsite",
            container = %self.prefix,
            service = %service_type,
            error = %error,
            "call site resolution failed"
        );
    }

    fn cache_hit(&self, service_type: &ServiceType) {
        tracing::trace!(
            target: "ferrous_callsite",
            container = %self.prefix,
            service = %service_type,
            "call site cache hit"
        );
    }
}
