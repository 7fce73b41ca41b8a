//! Service module system for modular registration.
//!
//! This module provides traits for organizing service registrations into
//! reusable modules.

use crate::{DiResult, ServiceCollection};

/// A module that can register services with a ServiceCollection.
///
/// # Example
///
/// ```rust
/// use ferrous_callsite::{
///     ServiceCollection, ServiceModule, ServiceCollectionExt, DiResult,
///     ServiceType, ImplementationType, Constructor, Parameter,
/// };
///
/// struct StorageModule;
///
/// impl ServiceModule for StorageModule {
///     fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.add_singleton(ServiceType::named("IBlobStore"), ImplementationType::named("DiskStore"));
///         services.add_scoped(
///             ServiceType::named("IUploader"),
///             ImplementationType::named("Uploader")
///                 .constructor(Constructor::new([Parameter::new("IBlobStore")])),
///         );
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let factory = ServiceCollection::new().add_module(StorageModule)?.build();
/// assert!(factory.resolve_call_site(&ServiceType::named("IUploader"), None).is_ok());
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Register this module's services with the ServiceCollection.
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()>;
}

/// Extension trait for chaining module registration by value.
pub trait ServiceCollectionExt {
    /// Add a module to the service collection using extension method syntax.
    fn add_module<M: ServiceModule>(self, module: M) -> DiResult<Self>
    where
        Self: Sized;
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_module<M: ServiceModule>(mut self, module: M) -> DiResult<Self> {
        module.register_services(&mut self)?;
        Ok(self)
    }
}

/// Extension trait for in-place module registration matching the
/// `&mut Self` registration methods.
pub trait ServiceCollectionModuleExt {
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self>;
}

impl ServiceCollectionModuleExt for ServiceCollection {
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register_services(self)?;
        Ok(self)
    }
}
