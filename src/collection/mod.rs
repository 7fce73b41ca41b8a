//! Service collection module.
//!
//! This module contains the ServiceCollection type used to register service
//! descriptors and build a [`CallSiteFactory`] over them.

use std::any::Any;
use std::sync::Arc;

use crate::activation::{ImplementationType, Value};
use crate::descriptors::{Factory, OpenGenericDescriptor, ServiceDescriptor};
use crate::error::DiResult;
use crate::factory::CallSiteFactory;
use crate::lifetime::Lifetime;
use crate::observer::{CallSiteObserver, Observers};
use crate::options::ResolverOptions;
use crate::registry::Registry;
use crate::service_type::ServiceType;

pub mod module_system;
pub use module_system::*;

/// Ordered list of service registrations.
///
/// Registration order matters: a single-service request uses the last
/// registration for its type, and a collection request lists them all in the
/// order they were added.
///
/// # Examples
///
/// ```rust
/// use ferrous_callsite::{ServiceCollection, ServiceType, ImplementationType, Constructor, Parameter};
///
/// let mut services = ServiceCollection::new();
/// services
///     .add_singleton(ServiceType::named("IClock"), ImplementationType::named("SystemClock"))
///     .add_transient(
///         ServiceType::named("Scheduler"),
///         ImplementationType::named("Scheduler").constructor(Constructor::new([Parameter::new("IClock")])),
///     );
///
/// let factory = services.build();
/// assert!(factory.resolve_call_site(&ServiceType::named("Scheduler"), None).is_ok());
/// ```
#[derive(Default)]
pub struct ServiceCollection {
    registry: Registry,
    observers: Observers,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            observers: Observers::new(),
        }
    }

    /// Adds a descriptor as-is.
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.registry.insert(descriptor);
        self
    }

    /// Adds an open generic registration.
    pub fn add_open_generic(&mut self, descriptor: OpenGenericDescriptor) -> &mut Self {
        self.registry.insert_open(descriptor);
        self
    }

    // ----- Implementation registrations -----

    /// Registers `implementation` as a singleton for `service_type`.
    pub fn add_singleton(&mut self, service_type: ServiceType, implementation: ImplementationType) -> &mut Self {
        self.add(ServiceDescriptor::implementation(service_type, implementation, Lifetime::Singleton))
    }

    /// Registers `implementation` as a scoped service for `service_type`.
    pub fn add_scoped(&mut self, service_type: ServiceType, implementation: ImplementationType) -> &mut Self {
        self.add(ServiceDescriptor::implementation(service_type, implementation, Lifetime::Scoped))
    }

    /// Registers `implementation` as a transient service for `service_type`.
    pub fn add_transient(&mut self, service_type: ServiceType, implementation: ImplementationType) -> &mut Self {
        self.add(ServiceDescriptor::implementation(service_type, implementation, Lifetime::Transient))
    }

    /// Registers an implementation under a registration name.
    pub fn add_named(
        &mut self,
        name: &str,
        service_type: ServiceType,
        implementation: ImplementationType,
        lifetime: Lifetime,
    ) -> &mut Self {
        self.add(ServiceDescriptor::implementation(service_type, implementation, lifetime).named(name))
    }

    // ----- Instance and factory registrations -----

    /// Registers a fixed instance.
    ///
    /// ```rust
    /// use ferrous_callsite::{ServiceCollection, ServiceType, CallSiteKind};
    ///
    /// struct Config { url: String }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_instance(ServiceType::of::<Config>(), Config { url: "postgres://localhost".into() });
    ///
    /// let site = services.build().resolve::<Config>().unwrap();
    /// match site.kind() {
    ///     CallSiteKind::Constant { value } => {
    ///         assert_eq!(value.downcast_ref::<Config>().unwrap().url, "postgres://localhost");
    ///     }
    ///     other => panic!("unexpected {:?}", other),
    /// }
    /// ```
    pub fn add_instance<T: Any + Send + Sync>(&mut self, service_type: ServiceType, value: T) -> &mut Self {
        self.add(ServiceDescriptor::instance(service_type, Value::new(value)))
    }

    /// Registers a factory delegate; the engine plans the call and the
    /// activation layer invokes it.
    pub fn add_factory<F: Any + Send + Sync>(&mut self, service_type: ServiceType, lifetime: Lifetime, factory: F) -> &mut Self {
        self.add(ServiceDescriptor::factory(service_type, Factory::new(factory), lifetime))
    }

    // ----- Diagnostics -----

    /// Registers an observer notified of resolution events.
    pub fn add_observer(&mut self, observer: Arc<dyn CallSiteObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Number of registered descriptors, open generics included.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ----- Build -----

    /// Builds a factory with default options.
    pub fn build(self) -> CallSiteFactory {
        CallSiteFactory::from_parts(Arc::new(self.registry), ResolverOptions::default(), self.observers)
    }

    /// Builds a factory with `options`.
    ///
    /// With `validate_on_build` every registration is pre-built and any
    /// failure aborts the build with [`DiError::Validation`](crate::DiError::Validation).
    pub fn build_with(self, options: ResolverOptions) -> DiResult<CallSiteFactory> {
        let validate = options.validate_on_build;
        let factory = CallSiteFactory::from_parts(Arc::new(self.registry), options, self.observers);
        if validate {
            factory.validate().into_result()?;
        }
        Ok(factory)
    }
}
