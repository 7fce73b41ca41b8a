//! The call-site model: immutable resolution plans.

use std::sync::Arc;

use crate::activation::{Constructor, ImplementationType, Value};
use crate::descriptors::Factory;
use crate::internal::{Map, STACK_RED_ZONE, STACK_SEGMENT};
use crate::lifetime::Lifetime;
use crate::service_type::ServiceType;

/// How one constructor argument is supplied.
#[derive(Debug, Clone)]
pub enum ParameterCallSite {
    /// Resolved from the container
    Service(Arc<CallSite>),
    /// The parameter's declared default value
    Default(Value),
}

impl ParameterCallSite {
    /// Nested call site, if the argument comes from the container.
    pub fn as_service(&self) -> Option<&Arc<CallSite>> {
        match self {
            ParameterCallSite::Service(site) => Some(site),
            ParameterCallSite::Default(_) => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ParameterCallSite::Default(_))
    }
}

/// Kind-specific payload of a [`CallSite`].
#[derive(Debug, Clone)]
pub enum CallSiteKind {
    /// Invoke `constructor` with one argument per parameter, in declaration order
    Constructor {
        implementation: Arc<ImplementationType>,
        constructor: Constructor,
        parameters: Vec<ParameterCallSite>,
    },
    /// Construct `implementation` without arguments
    CreateInstance { implementation: Arc<ImplementationType> },
    /// Every registration of `item_type`, in registration order
    Enumerable {
        item_type: ServiceType,
        items: Vec<Arc<CallSite>>,
    },
    /// A registered instance
    Constant { value: Value },
    /// A registered factory delegate
    Factory { factory: Factory },
}

/// A cached, immutable plan for producing one service and its dependencies.
///
/// The activation layer walks this tree to build instances and applies the
/// recorded [`Lifetime`] when deciding what to reuse. Nothing mutates a call
/// site after it has been built.
///
/// # Examples
///
/// ```rust
/// use ferrous_callsite::{
///     ServiceCollection, ServiceType, ImplementationType, Constructor, Parameter, CallSiteKind,
/// };
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(ServiceType::named("IFoo"), ImplementationType::named("Foo"));
/// services.add_transient(
///     ServiceType::named("Widget"),
///     ImplementationType::named("Widget").constructor(Constructor::new([Parameter::new("IFoo")])),
/// );
///
/// let site = services.build().resolve_call_site(&ServiceType::named("Widget"), None).unwrap();
/// match site.kind() {
///     CallSiteKind::Constructor { parameters, .. } => assert_eq!(parameters.len(), 1),
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CallSite {
    service_type: ServiceType,
    lifetime: Option<Lifetime>,
    kind: CallSiteKind,
}

impl CallSite {
    pub(crate) fn constructor(
        service_type: ServiceType,
        lifetime: Lifetime,
        implementation: Arc<ImplementationType>,
        constructor: Constructor,
        parameters: Vec<ParameterCallSite>,
    ) -> Self {
        debug_assert_eq!(constructor.arity(), parameters.len());
        Self {
            service_type,
            lifetime: Some(lifetime),
            kind: CallSiteKind::Constructor {
                implementation,
                constructor,
                parameters,
            },
        }
    }

    pub(crate) fn create_instance(
        service_type: ServiceType,
        lifetime: Lifetime,
        implementation: Arc<ImplementationType>,
    ) -> Self {
        Self {
            service_type,
            lifetime: Some(lifetime),
            kind: CallSiteKind::CreateInstance { implementation },
        }
    }

    pub(crate) fn enumerable(item_type: ServiceType, items: Vec<Arc<CallSite>>) -> Self {
        Self {
            service_type: ServiceType::collection(item_type.clone()),
            lifetime: None,
            kind: CallSiteKind::Enumerable { item_type, items },
        }
    }

    pub(crate) fn constant(service_type: ServiceType, value: Value) -> Self {
        Self {
            service_type,
            lifetime: Some(Lifetime::Singleton),
            kind: CallSiteKind::Constant { value },
        }
    }

    pub(crate) fn factory(service_type: ServiceType, lifetime: Lifetime, factory: Factory) -> Self {
        Self {
            service_type,
            lifetime: Some(lifetime),
            kind: CallSiteKind::Factory { factory },
        }
    }

    /// Service type this call site satisfies.
    pub fn service_type(&self) -> &ServiceType {
        &self.service_type
    }

    /// Lifetime of the descriptor behind this call site; `None` for collections.
    pub fn lifetime(&self) -> Option<Lifetime> {
        self.lifetime
    }

    pub fn kind(&self) -> &CallSiteKind {
        &self.kind
    }

    /// Implementation type for constructor and create-instance call sites.
    pub fn implementation_type(&self) -> Option<&ServiceType> {
        match &self.kind {
            CallSiteKind::Constructor { implementation, .. }
            | CallSiteKind::CreateInstance { implementation } => Some(implementation.service_type()),
            _ => None,
        }
    }

    /// Direct child call sites, in argument or item order.
    pub fn children(&self) -> Vec<&Arc<CallSite>> {
        match &self.kind {
            CallSiteKind::Constructor { parameters, .. } => {
                parameters.iter().filter_map(ParameterCallSite::as_service).collect()
            }
            CallSiteKind::Enumerable { items, .. } => items.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Number of call sites below this one (shared nodes are counted once per use).
    ///
    /// Shared subtrees are evaluated once, so this stays linear in the number
    /// of distinct call sites.
    pub fn dependency_count(&self) -> usize {
        fn count(site: &CallSite, memo: &mut Map<*const CallSite, usize>) -> usize {
            if let Some(&known) = memo.get(&(site as *const CallSite)) {
                return known;
            }
            let total = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
                site.children()
                    .into_iter()
                    .fold(0usize, |acc, child| acc.saturating_add(count(child, memo).saturating_add(1)))
            });
            memo.insert(site as *const CallSite, total);
            total
        }
        count(self, &mut Map::default())
    }

    /// Length of the longest path to a leaf; a leaf has depth 0.
    pub fn depth(&self) -> usize {
        fn longest(site: &CallSite, memo: &mut Map<*const CallSite, usize>) -> usize {
            if let Some(&known) = memo.get(&(site as *const CallSite)) {
                return known;
            }
            let depth = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
                site.children()
                    .into_iter()
                    .map(|child| 1 + longest(child, memo))
                    .max()
                    .unwrap_or(0)
            });
            memo.insert(site as *const CallSite, depth);
            depth
        }
        longest(self, &mut Map::default())
    }
}
