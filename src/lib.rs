//! # ferrous-callsite
//!
//! The call-site resolution engine of a dependency injection container,
//! inspired by Microsoft.Extensions.DependencyInjection.
//!
//! Given a registry of service descriptors and a requested service type, the
//! engine decides which constructor (or factory, or instance) produces the
//! service and how each constructor parameter is satisfied, and caches the
//! result as an immutable [`CallSite`] tree. Instantiating objects from that
//! tree and caching instances per lifetime belong to the activation layer.
//!
//! ## Features
//!
//! - **Constructor selection**: the constructor whose satisfied services
//!   strictly contain every other candidate's wins; incomparable candidates
//!   are reported as ambiguous
//! - **Collection parameters**: `IEnumerable<T>`-shaped parameters resolve to
//!   every registration of `T`, in registration order
//! - **Default values**: parameters with defaults never block a constructor
//! - **Open generics**: `IRepository<>` registrations close on demand
//! - **Circular dependency detection**: with the full dependency path
//! - **Thread-safe caching**: one authoritative call site per service type
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_callsite::{
//!     ServiceCollection, ServiceType, ImplementationType, Constructor, Parameter, CallSiteKind, DiError,
//! };
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton(ServiceType::named("IFoo"), ImplementationType::named("Foo"));
//! services.add_transient(
//!     ServiceType::named("Widget"),
//!     ImplementationType::named("Widget")
//!         .constructor(Constructor::new([Parameter::new("IFoo")]))
//!         .constructor(Constructor::new([Parameter::new("IFoo"), Parameter::new("IBar")])),
//! );
//!
//! let factory = services.build();
//!
//! // IBar is not registered, so only Widget(IFoo) is a candidate
//! let site = factory.resolve_call_site(&ServiceType::named("Widget"), None).unwrap();
//! match site.kind() {
//!     CallSiteKind::Constructor { constructor, .. } => assert_eq!(constructor.arity(), 1),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! ## Collections
//!
//! ```rust
//! use ferrous_callsite::{ServiceCollection, ServiceType, ImplementationType, CallSiteKind};
//!
//! let mut services = ServiceCollection::new();
//! for plugin in ["P1", "P2", "P3"] {
//!     services.add_transient(ServiceType::named("IPlugin"), ImplementationType::named(plugin));
//! }
//!
//! let factory = services.build();
//! let site = factory
//!     .resolve_call_site(&ServiceType::collection(ServiceType::named("IPlugin")), None)
//!     .unwrap();
//!
//! let order: Vec<String> = site
//!     .children()
//!     .iter()
//!     .map(|item| item.implementation_type().unwrap().to_string())
//!     .collect();
//! assert_eq!(order, ["P1", "P2", "P3"]);
//! ```

// Module declarations
pub mod activation;
pub mod cache;
pub mod call_site;
pub mod collection;
pub mod descriptors;
pub mod error;
pub mod factory;
pub mod graph_export;
pub mod lifetime;
pub mod observer;
pub mod options;
pub mod registry;
pub mod service_type;
pub mod validation;
pub mod visitor;

// Internal modules
mod internal;

// Re-export core types
pub use activation::{Activator, AnyArc, Constructor, ConstructorSignature, ImplementationType, Parameter, Value, Visibility};
pub use cache::{CacheKey, CallSiteCache};
pub use call_site::{CallSite, CallSiteKind, ParameterCallSite};
pub use collection::{ServiceCollection, ServiceCollectionExt, ServiceCollectionModuleExt, ServiceModule};
pub use descriptors::{Factory, OpenGenericDescriptor, ServiceDescriptor, ServiceSource};
pub use error::{DiError, DiResult};
pub use factory::CallSiteFactory;
pub use graph_export::{CallSiteGraph, GraphEdge, GraphNode, NodeKind};
pub use lifetime::Lifetime;
pub use observer::{CallSiteObserver, TracingObserver};
pub use options::ResolverOptions;
pub use registry::{Registry, ServiceRegistry};
pub use service_type::{GenericType, ServiceType};
pub use validation::{ValidationFailure, ValidationReport};
pub use visitor::CallSiteVisitor;
