//! Service descriptors: the entries of the service registry.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::activation::{ImplementationType, Value};
use crate::error::DiResult;
use crate::lifetime::Lifetime;
use crate::service_type::{GenericType, ServiceType};

/// Opaque factory delegate.
///
/// The engine never invokes factories; it only plans that the activation
/// layer should. The payload is whatever callable type that layer expects,
/// recovered with [`Factory::downcast_ref`].
#[derive(Clone)]
pub struct Factory {
    payload: Value,
}

impl Factory {
    /// Wraps a delegate of any type.
    pub fn new<F: Any + Send + Sync>(delegate: F) -> Self {
        Self {
            payload: Value::new(delegate),
        }
    }

    /// Recovers the delegate if it has type `F`.
    pub fn downcast_ref<F: Any>(&self) -> Option<&F> {
        self.payload.downcast_ref::<F>()
    }

    pub fn type_name(&self) -> &'static str {
        self.payload.type_name()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factory({})", self.payload.type_name())
    }
}

/// How a descriptor produces its service.
#[derive(Debug, Clone)]
pub enum ServiceSource {
    /// Construct the implementation through one of its constructors
    Implementation(Arc<ImplementationType>),
    /// Invoke a delegate
    Factory(Factory),
    /// Return a fixed instance
    Instance(Value),
}

/// Registry entry mapping a service type to how it is produced.
///
/// # Examples
///
/// ```rust
/// use ferrous_callsite::{ServiceDescriptor, ServiceType, ImplementationType, Lifetime};
///
/// let descriptor = ServiceDescriptor::implementation(
///     ServiceType::named("ILogger"),
///     ImplementationType::named("ConsoleLogger"),
///     Lifetime::Singleton,
/// )
/// .named("console");
///
/// assert_eq!(descriptor.service_name(), Some("console"));
/// assert_eq!(descriptor.lifetime, Lifetime::Singleton);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// The service type this entry satisfies
    pub service_type: ServiceType,
    /// Registration name, `None` for the default registration
    pub name: Option<Arc<str>>,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Implementation, factory or instance
    pub source: ServiceSource,
}

impl ServiceDescriptor {
    /// Descriptor constructed through `implementation`'s constructors.
    pub fn implementation(
        service_type: ServiceType,
        implementation: ImplementationType,
        lifetime: Lifetime,
    ) -> Self {
        Self {
            service_type,
            name: None,
            lifetime,
            source: ServiceSource::Implementation(Arc::new(implementation)),
        }
    }

    /// Descriptor produced by a factory delegate.
    pub fn factory(service_type: ServiceType, factory: Factory, lifetime: Lifetime) -> Self {
        Self {
            service_type,
            name: None,
            lifetime,
            source: ServiceSource::Factory(factory),
        }
    }

    /// Descriptor for a fixed instance; always a singleton.
    pub fn instance(service_type: ServiceType, value: Value) -> Self {
        Self {
            service_type,
            name: None,
            lifetime: Lifetime::Singleton,
            source: ServiceSource::Instance(value),
        }
    }

    /// Sets the registration name.
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn service_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// Implementation type, if this descriptor is constructor-based.
    pub fn implementation_type(&self) -> Option<&ImplementationType> {
        match &self.source {
            ServiceSource::Implementation(implementation) => Some(implementation),
            _ => None,
        }
    }
}

type CloseFn = Arc<dyn Fn(&[ServiceType]) -> ImplementationType + Send + Sync>;

/// Registry entry for an open generic service such as
/// `IRepository<>` → `Repository<>`.
///
/// The `close` closure plays the part of runtime generic instantiation: given
/// the type arguments of a closed request it returns the closed
/// implementation type with its constructors.
///
/// # Examples
///
/// ```rust
/// use ferrous_callsite::{
///     OpenGenericDescriptor, GenericType, ServiceType, ImplementationType, Constructor, Lifetime,
/// };
///
/// let open = OpenGenericDescriptor::new(
///     GenericType::new("IRepository", 1),
///     GenericType::new("Repository", 1),
///     Lifetime::Scoped,
///     |args| {
///         let closed = GenericType::new("Repository", 1).close(args.to_vec()).unwrap();
///         ImplementationType::new(closed).constructor(Constructor::new([]))
///     },
/// );
///
/// let request = GenericType::new("IRepository", 1).close([ServiceType::named("User")]).unwrap();
/// let closed = open.close_for(&request).unwrap();
/// assert_eq!(closed.service_type, request);
/// assert_eq!(
///     closed.implementation_type().unwrap().service_type().to_string(),
///     "Repository<User>",
/// );
/// ```
#[derive(Clone)]
pub struct OpenGenericDescriptor {
    pub service: GenericType,
    pub implementation: GenericType,
    pub name: Option<Arc<str>>,
    pub lifetime: Lifetime,
    close: CloseFn,
}

impl OpenGenericDescriptor {
    pub fn new<F>(service: GenericType, implementation: GenericType, lifetime: Lifetime, close: F) -> Self
    where
        F: Fn(&[ServiceType]) -> ImplementationType + Send + Sync + 'static,
    {
        Self {
            service,
            implementation,
            name: None,
            lifetime,
            close: Arc::new(close),
        }
    }

    /// Sets the registration name.
    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Closes this definition for a concrete request.
    ///
    /// The request's arguments are checked against the definition arity
    /// before the close closure runs.
    pub fn close_for(&self, closed: &ServiceType) -> DiResult<ServiceDescriptor> {
        let service_type = self.service.close(closed.type_args().iter().cloned())?;
        let implementation = (self.close)(service_type.type_args());
        Ok(ServiceDescriptor {
            service_type,
            name: self.name.clone(),
            lifetime: self.lifetime,
            source: ServiceSource::Implementation(Arc::new(implementation)),
        })
    }
}

impl fmt::Debug for OpenGenericDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenGenericDescriptor")
            .field("service", &self.service)
            .field("implementation", &self.implementation)
            .field("name", &self.name)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
