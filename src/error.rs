//! Error types for call-site resolution.

use std::sync::Arc;

use crate::activation::ConstructorSignature;
use crate::service_type::{GenericType, ServiceType};
use crate::validation::ValidationFailure;

/// Call-site resolution errors
///
/// Every variant carries the structured facts behind the failure rather than
/// a pre-rendered message. All of them are terminal: a resolution failure is
/// a registration defect, so nothing here is retried and failures are never
/// cached.
///
/// # Examples
///
/// ```rust
/// use ferrous_callsite::{DiError, ServiceCollection, ServiceType};
///
/// let factory = ServiceCollection::new().build();
/// match factory.resolve_call_site(&ServiceType::named("ILogger"), None) {
///     Err(DiError::NotFound { service, .. }) => assert_eq!(service.to_string(), "ILogger"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_callsite::{DiError, ServiceType};
///
/// let circular = DiError::CircularDependency(vec![
///     ServiceType::named("A"),
///     ServiceType::named("B"),
///     ServiceType::named("A"),
/// ]);
/// assert_eq!(circular.to_string(), "Circular dependency: A -> B -> A");
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// The only public constructor has a parameter nothing can satisfy
    #[error("Unable to resolve service for type '{parameter}' while attempting to activate '{implementation}'")]
    UnresolvableParameter {
        parameter: ServiceType,
        implementation: ServiceType,
    },
    /// Several public constructors exist and none is fully resolvable
    #[error("No constructor for type '{implementation}' can be instantiated using services from the service container and default values")]
    NoConstructorResolvable { implementation: ServiceType },
    /// Two or more fully resolvable constructors, none dominating the others
    #[error(
        "Unable to activate type '{implementation}'. The following constructors are ambiguous: {}",
        join_signatures(.candidates)
    )]
    AmbiguousConstructors {
        implementation: ServiceType,
        /// Conflicting signatures in declaration order
        candidates: Vec<ConstructorSignature>,
    },
    /// Circular dependency detected (includes path, first and last entries match)
    #[error("Circular dependency: {}", join_path(.0))]
    CircularDependency(Vec<ServiceType>),
    /// Requested service has no registration
    #[error("Service not found: {service}{}", render_name(.name))]
    NotFound {
        service: ServiceType,
        name: Option<Arc<str>>,
    },
    /// Maximum resolution depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// Open generic closed with the wrong number of type arguments
    #[error("Generic definition '{definition}' expects {expected} type argument(s), got {actual}")]
    GenericArity {
        definition: GenericType,
        expected: usize,
        actual: usize,
    },
    /// Resolver option could not be parsed
    #[error("Invalid value '{value}' for option {key}")]
    InvalidOption { key: &'static str, value: String },
    /// Eager pre-build found failing registrations
    #[error("{} service registration(s) failed validation", count_failures(.0))]
    Validation(Vec<ValidationFailure>),
}

fn join_signatures(candidates: &[ConstructorSignature]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_path(path: &[ServiceType]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn count_failures(failures: &[ValidationFailure]) -> usize {
    failures.len()
}

fn render_name(name: &Option<Arc<str>>) -> String {
    match name {
        Some(name) => format!(" (named '{}')", name),
        None => String::new(),
    }
}

/// Result type for resolution operations
///
/// A convenience alias for `Result<T, DiError>` used throughout the crate.
pub type DiResult<T> = Result<T, DiError>;
