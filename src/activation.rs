//! Activation metadata: implementation types, constructors and parameters.
//!
//! Rust has no runtime constructor reflection, so each implementation type
//! declares its constructors up front. A [`Constructor`] lists its parameter
//! types in declaration order and optionally carries the activator closure
//! the activation layer calls with the resolved arguments.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::service_type::ServiceType;

/// Type-erased shared value.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Closure building an instance from resolved constructor arguments.
pub type Activator = Arc<dyn Fn(&[AnyArc]) -> AnyArc + Send + Sync>;

/// A type-erased value: a parameter default, a registered instance, or a
/// factory payload.
#[derive(Clone)]
pub struct Value {
    value: AnyArc,
    type_name: &'static str,
}

impl Value {
    /// Wraps `value`.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Wraps an already shared value.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The erased value.
    pub fn as_any(&self) -> &AnyArc {
        &self.value
    }

    /// Borrows the value as `T` if it has that type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Name of the wrapped Rust type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.type_name)
    }
}

/// A constructor parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    service_type: ServiceType,
    name: Option<&'static str>,
    default: Option<Value>,
}

impl Parameter {
    /// Parameter of the given service type.
    pub fn new(service_type: impl Into<ServiceType>) -> Self {
        Self {
            service_type: service_type.into(),
            name: None,
            default: None,
        }
    }

    /// Parameter typed by a Rust type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::new(ServiceType::of::<T>())
    }

    /// Parameter requesting every registration of `item`.
    pub fn collection(item: impl Into<ServiceType>) -> Self {
        Self::new(ServiceType::collection(item.into()))
    }

    /// Sets the parameter name shown in diagnostics.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Declares a default used when no registration satisfies the parameter.
    pub fn with_default<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.default = Some(Value::new(value));
        self
    }

    pub fn service_type(&self) -> &ServiceType {
        &self.service_type
    }

    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Constructor accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    NonPublic,
}

/// A declared constructor of an implementation type.
#[derive(Clone)]
pub struct Constructor {
    visibility: Visibility,
    parameters: Vec<Parameter>,
    activator: Option<Activator>,
}

impl Constructor {
    /// Public constructor with the given parameters in declaration order.
    pub fn new(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self {
            visibility: Visibility::Public,
            parameters: parameters.into_iter().collect(),
            activator: None,
        }
    }

    /// Constructor the container may not call.
    pub fn non_public(parameters: impl IntoIterator<Item = Parameter>) -> Self {
        Self {
            visibility: Visibility::NonPublic,
            ..Self::new(parameters)
        }
    }

    /// Attaches the closure that builds an instance from resolved arguments.
    pub fn with_activator<F>(mut self, activator: F) -> Self
    where
        F: Fn(&[AnyArc]) -> AnyArc + Send + Sync + 'static,
    {
        self.activator = Some(Arc::new(activator));
        self
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn activator(&self) -> Option<&Activator> {
        self.activator.as_ref()
    }

    /// Signature of this constructor on `implementation`, for diagnostics.
    pub fn signature(&self, implementation: &ServiceType) -> ConstructorSignature {
        ConstructorSignature {
            implementation: implementation.clone(),
            parameters: self
                .parameters
                .iter()
                .map(|p| p.service_type.clone())
                .collect(),
        }
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("visibility", &self.visibility)
            .field("parameters", &self.parameters)
            .field("activator", &self.activator.is_some())
            .finish()
    }
}

/// Implementation type plus ordered parameter types of one constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorSignature {
    pub implementation: ServiceType,
    pub parameters: Vec<ServiceType>,
}

impl fmt::Display for ConstructorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.implementation)?;
        for (index, parameter) in self.parameters.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", parameter)?;
        }
        f.write_str(")")
    }
}

/// A concrete implementation type and its declared constructors.
///
/// A type with no declared constructors behaves like a type with an implicit
/// public parameterless one: the engine plans a direct instance creation.
///
/// # Examples
///
/// ```rust
/// use ferrous_callsite::{ImplementationType, Constructor, Parameter};
///
/// let widget = ImplementationType::named("Widget")
///     .constructor(Constructor::new([Parameter::new("IFoo")]))
///     .constructor(Constructor::new([Parameter::new("IFoo"), Parameter::new("IBar")]));
///
/// assert_eq!(widget.public_constructors().count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ImplementationType {
    service_type: ServiceType,
    constructors: Vec<Constructor>,
}

impl ImplementationType {
    /// Implementation identified by `service_type`, with no constructors yet.
    pub fn new(service_type: ServiceType) -> Self {
        Self {
            service_type,
            constructors: Vec::new(),
        }
    }

    /// Implementation for a Rust type.
    pub fn of<T: 'static>() -> Self {
        Self::new(ServiceType::of::<T>())
    }

    /// Implementation with an explicit name.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self::new(ServiceType::named(name))
    }

    /// Declares another constructor. Declaration order is preserved.
    pub fn constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn service_type(&self) -> &ServiceType {
        &self.service_type
    }

    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Public constructors in declaration order.
    pub fn public_constructors(&self) -> impl Iterator<Item = &Constructor> {
        self.constructors.iter().filter(|c| c.is_public())
    }
}
