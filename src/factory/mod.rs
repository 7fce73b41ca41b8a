//! The resolution orchestrator.
//!
//! [`CallSiteFactory`] turns a service request into a cached [`CallSite`].
//! Constructor selection lives in [`select`] and per-parameter resolution in
//! [`parameter`]; both recurse back through [`CallSiteFactory::resolve_in_chain`]
//! for nested services so every distinct service type is planned once.

use std::sync::Arc;
use std::time::Instant;

use crate::cache::{CacheKey, CallSiteCache};
use crate::call_site::CallSite;
use crate::descriptors::{ServiceDescriptor, ServiceSource};
use crate::error::{DiError, DiResult};
use crate::internal::{CallSiteChain, STACK_RED_ZONE, STACK_SEGMENT};
use crate::observer::Observers;
use crate::options::ResolverOptions;
use crate::registry::ServiceRegistry;
use crate::service_type::ServiceType;

mod parameter;
mod select;

/// Builds and caches call sites for registered services.
///
/// `CallSiteFactory` is `Send + Sync`; share it behind an `Arc` to resolve
/// different services from several threads. The call-site cache is the only
/// shared mutable state; the in-progress stack used for cycle detection is
/// local to each top-level request.
///
/// # Examples
///
/// ```
/// use ferrous_callsite::{
///     ServiceCollection, ServiceType, ImplementationType, Constructor, Parameter, CallSiteKind,
/// };
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(ServiceType::named("IFoo"), ImplementationType::named("Foo"));
/// services.add_singleton(ServiceType::named("IBar"), ImplementationType::named("Bar"));
/// services.add_transient(
///     ServiceType::named("Widget"),
///     ImplementationType::named("Widget")
///         .constructor(Constructor::new([Parameter::new("IFoo")]))
///         .constructor(Constructor::new([Parameter::new("IFoo"), Parameter::new("IBar")])),
/// );
///
/// let factory = services.build();
/// let site = factory.resolve_call_site(&ServiceType::named("Widget"), None).unwrap();
///
/// // The two-parameter constructor satisfies a strict superset of services
/// match site.kind() {
///     CallSiteKind::Constructor { constructor, .. } => assert_eq!(constructor.arity(), 2),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
pub struct CallSiteFactory {
    registry: Arc<dyn ServiceRegistry>,
    cache: CallSiteCache,
    observers: Observers,
    options: ResolverOptions,
}

impl CallSiteFactory {
    /// Factory over `registry` with default options.
    pub fn new(registry: Arc<dyn ServiceRegistry>) -> Self {
        Self::with_options(registry, ResolverOptions::default())
    }

    pub fn with_options(registry: Arc<dyn ServiceRegistry>, options: ResolverOptions) -> Self {
        Self::from_parts(registry, options, Observers::new())
    }

    pub(crate) fn from_parts(
        registry: Arc<dyn ServiceRegistry>,
        options: ResolverOptions,
        observers: Observers,
    ) -> Self {
        Self {
            registry,
            cache: CallSiteCache::new(),
            observers,
            options,
        }
    }

    /// Resolves the call site for `service_type`, optionally under a
    /// registration `name`.
    ///
    /// Fails with [`DiError::NotFound`] when nothing is registered, or with
    /// the selection errors (`UnresolvableParameter`,
    /// `NoConstructorResolvable`, `AmbiguousConstructors`,
    /// `CircularDependency`, `DepthExceeded`) raised anywhere in the
    /// dependency graph.
    pub fn resolve_call_site(&self, service_type: &ServiceType, name: Option<&str>) -> DiResult<Arc<CallSite>> {
        match self.try_resolve_call_site(service_type, name)? {
            Some(site) => Ok(site),
            None => {
                let error = DiError::NotFound {
                    service: service_type.clone(),
                    name: name.map(Arc::from),
                };
                self.observers.failed(service_type, &error);
                Err(error)
            }
        }
    }

    /// Like [`resolve_call_site`](Self::resolve_call_site) but returns
    /// `Ok(None)` when the service is not registered.
    pub fn try_resolve_call_site(
        &self,
        service_type: &ServiceType,
        name: Option<&str>,
    ) -> DiResult<Option<Arc<CallSite>>> {
        let key = CacheKey::new(service_type.clone(), name);
        let observing = self.observers.has_observers();
        if observing {
            self.observers.resolving(service_type);
        }
        let started = Instant::now();

        let mut chain = CallSiteChain::new(self.options.max_depth);
        let result = self.resolve_in_chain(&key, &mut chain);

        if observing {
            match &result {
                Ok(Some(site)) => self.observers.resolved(service_type, started.elapsed(), site),
                Ok(None) => {}
                Err(error) => self.observers.failed(service_type, error),
            }
        }
        result
    }

    /// Resolves the unnamed call site for the Rust type `T`.
    pub fn resolve<T: ?Sized + 'static>(&self) -> DiResult<Arc<CallSite>> {
        self.resolve_call_site(&ServiceType::of::<T>(), None)
    }

    pub fn cache(&self) -> &CallSiteCache {
        &self.cache
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<dyn ServiceRegistry> {
        &self.registry
    }

    /// Cache lookup, then build and insert. `Ok(None)` means nothing is
    /// registered for the key.
    pub(crate) fn resolve_in_chain(
        &self,
        key: &CacheKey,
        chain: &mut CallSiteChain,
    ) -> DiResult<Option<Arc<CallSite>>> {
        if self.options.cache_enabled {
            if let Some(site) = self.cache.get(key) {
                self.observers.cache_hit(&key.service_type);
                return Ok(Some(site));
            }
        }

        let site = match stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.build_call_site(key, chain))? {
            Some(site) => site,
            None => return Ok(None),
        };

        if self.options.cache_enabled {
            Ok(Some(self.cache.get_or_insert(key.clone(), site)))
        } else {
            Ok(Some(site))
        }
    }

    /// Builds the call site for `key` without consulting the cache.
    fn build_call_site(&self, key: &CacheKey, chain: &mut CallSiteChain) -> DiResult<Option<Arc<CallSite>>> {
        if let Some(item) = key.service_type.collection_item() {
            return self.create_enumerable(item, key.name.as_deref(), chain).map(Some);
        }
        let Some(descriptor) = self.last_descriptor(&key.service_type, key.name.as_deref())? else {
            return Ok(None);
        };
        let mut guard = chain.enter(&key.service_type)?;
        self.create_from_descriptor(&descriptor, &mut guard).map(Some)
    }

    /// The descriptor a single-service request uses: the last exact
    /// registration, else the last open generic closed over the request.
    fn last_descriptor(&self, service_type: &ServiceType, name: Option<&str>) -> DiResult<Option<Arc<ServiceDescriptor>>> {
        if let Some(descriptor) = self.registry.descriptors(service_type, name).pop() {
            return Ok(Some(descriptor));
        }
        let Some(definition) = service_type.generic_definition() else {
            return Ok(None);
        };
        match self.registry.open_generic_descriptors(&definition, name).last() {
            Some(open) => Ok(Some(Arc::new(open.close_for(service_type)?))),
            None => Ok(None),
        }
    }

    /// Every descriptor for `item` under `name` in registry order: exact
    /// registrations first, then open generics closed over `item`. Also
    /// returns the index of the descriptor a single-service request would pick.
    fn item_descriptors(
        &self,
        item: &ServiceType,
        name: Option<&str>,
    ) -> DiResult<(Vec<Arc<ServiceDescriptor>>, Option<usize>)> {
        let mut descriptors = self.registry.descriptors(item, name);
        let exact = descriptors.len();
        if let Some(definition) = item.generic_definition() {
            for open in self.registry.open_generic_descriptors(&definition, name) {
                descriptors.push(Arc::new(open.close_for(item)?));
            }
        }
        let primary = match (exact, descriptors.len()) {
            (0, 0) => None,
            (0, total) => Some(total - 1),
            (exact, _) => Some(exact - 1),
        };
        Ok((descriptors, primary))
    }

    /// Collection of every `item` registered under `name`; unnamed
    /// collections never include named registrations.
    fn create_enumerable(
        &self,
        item: &ServiceType,
        name: Option<&str>,
        chain: &mut CallSiteChain,
    ) -> DiResult<Arc<CallSite>> {
        let (descriptors, primary) = self.item_descriptors(item, name)?;
        let mut items = Vec::with_capacity(descriptors.len());
        for (index, descriptor) in descriptors.iter().enumerate() {
            // The primary registration shares its call site with direct requests
            let site = if Some(index) == primary {
                self.resolve_in_chain(&CacheKey::new(item.clone(), name), chain)?
                    .ok_or_else(|| DiError::NotFound {
                        service: item.clone(),
                        name: name.map(Arc::from),
                    })?
            } else {
                let mut guard = chain.enter(item)?;
                self.create_from_descriptor(descriptor, &mut guard)?
            };
            items.push(site);
        }
        tracing::trace!(
            target: "ferrous_callsite",
            item = %item,
            count = items.len(),
            "built enumerable call site"
        );
        Ok(Arc::new(CallSite::enumerable(item.clone(), items)))
    }

    fn create_from_descriptor(
        &self,
        descriptor: &ServiceDescriptor,
        chain: &mut CallSiteChain,
    ) -> DiResult<Arc<CallSite>> {
        let service_type = descriptor.service_type.clone();
        let site = match &descriptor.source {
            ServiceSource::Instance(value) => CallSite::constant(service_type, value.clone()),
            ServiceSource::Factory(factory) => CallSite::factory(service_type, descriptor.lifetime, factory.clone()),
            ServiceSource::Implementation(implementation) => {
                select::select_constructor(self, service_type, descriptor.lifetime, implementation, chain)?
            }
        };
        Ok(Arc::new(site))
    }
}

impl std::fmt::Debug for CallSiteFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallSiteFactory")
            .field("cached", &self.cache.len())
            .field("options", &self.options)
            .finish()
    }
}
