//! Service type identities used as registry and cache keys.

use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};

/// Name of the generic definition recognised as "collection of T".
const COLLECTION_NAME: &str = "IEnumerable";

/// Identity of a closed service type.
///
/// A service type is a name plus an ordered list of type arguments. Plain
/// Rust types use [`ServiceType::of`], which takes its name from
/// `std::any::type_name`. Abstract services that have no Rust type of their
/// own (an interface-like contract, a closed generic built at runtime) use
/// [`ServiceType::named`] and [`GenericType::close`].
///
/// Two service types are equal when their names and arguments are equal.
///
/// # Examples
///
/// ```rust
/// use ferrous_callsite::{ServiceType, GenericType};
///
/// let repo = GenericType::new("IRepository", 1);
/// let user_repo = repo.close([ServiceType::named("User")]).unwrap();
/// assert_eq!(user_repo.to_string(), "IRepository<User>");
/// assert_eq!(user_repo.generic_definition(), Some(repo));
///
/// let plugins = ServiceType::collection(ServiceType::named("IPlugin"));
/// assert_eq!(plugins.collection_item(), Some(&ServiceType::named("IPlugin")));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceType {
    name: Arc<str>,
    args: Arc<[ServiceType]>,
}

impl ServiceType {
    /// Service type for a Rust type, named by `std::any::type_name`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    /// Non-generic service type with an explicit name.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            args: Arc::from(Vec::new()),
        }
    }

    /// The "collection of `item`" shape resolved to every registration of `item`.
    pub fn collection(item: ServiceType) -> Self {
        Self {
            name: Arc::from(COLLECTION_NAME),
            args: Arc::from(vec![item]),
        }
    }

    /// Name without type arguments.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type arguments in declaration order (empty for non-generic types).
    pub fn type_args(&self) -> &[ServiceType] {
        &self.args
    }

    /// Whether this is a closed generic type.
    pub fn is_generic(&self) -> bool {
        !self.args.is_empty()
    }

    /// The open definition this type was closed from, if it is generic.
    pub fn generic_definition(&self) -> Option<GenericType> {
        if self.is_generic() {
            Some(GenericType {
                name: self.name.clone(),
                arity: self.args.len(),
            })
        } else {
            None
        }
    }

    /// Item type when this is the collection shape.
    pub fn collection_item(&self) -> Option<&ServiceType> {
        match &*self.args {
            [item] if &*self.name == COLLECTION_NAME => Some(item),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some((first, rest)) = self.args.split_first() {
            write!(f, "<{}", first)?;
            for arg in rest {
                write!(f, ", {}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceType({})", self)
    }
}

impl From<&'static str> for ServiceType {
    fn from(name: &'static str) -> Self {
        ServiceType::named(name)
    }
}

/// An open generic definition such as `IRepository<>`.
///
/// Open definitions are never resolved directly; a request for a closed type
/// whose [`ServiceType::generic_definition`] matches is served by closing the
/// registered open implementation over the request's type arguments.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenericType {
    name: Arc<str>,
    arity: usize,
}

impl GenericType {
    /// Creates an open definition with `arity` type parameters.
    pub fn new(name: impl Into<Arc<str>>, arity: usize) -> Self {
        Self {
            name: name.into(),
            arity,
        }
    }

    /// Definition name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of type parameters.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Closes the definition over `args`.
    ///
    /// Fails with [`DiError::GenericArity`] when the number of arguments
    /// does not match the definition.
    pub fn close(&self, args: impl IntoIterator<Item = ServiceType>) -> DiResult<ServiceType> {
        let args: Vec<ServiceType> = args.into_iter().collect();
        if args.len() != self.arity {
            return Err(DiError::GenericArity {
                definition: self.clone(),
                expected: self.arity,
                actual: args.len(),
            });
        }
        Ok(ServiceType {
            name: self.name.clone(),
            args: Arc::from(args),
        })
    }
}

impl fmt::Display for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.name, ",".repeat(self.arity.saturating_sub(1)))
    }
}

impl fmt::Debug for GenericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenericType({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_type_arguments() {
        let map = GenericType::new("IMap", 2)
            .close([ServiceType::named("K"), ServiceType::named("V")])
            .unwrap();
        assert_eq!(map.to_string(), "IMap<K, V>");
        assert_eq!(GenericType::new("IMap", 2).to_string(), "IMap<,>");
        assert_eq!(GenericType::new("IList", 1).to_string(), "IList<>");
    }

    #[test]
    fn close_checks_arity() {
        let err = GenericType::new("IRepository", 1)
            .close([ServiceType::named("A"), ServiceType::named("B")])
            .unwrap_err();
        assert!(matches!(err, DiError::GenericArity { expected: 1, actual: 2, .. }));
    }

    #[test]
    fn collection_shape_is_recognised_only_for_single_argument() {
        let item = ServiceType::named("IPlugin");
        assert_eq!(ServiceType::collection(item.clone()).collection_item(), Some(&item));
        assert_eq!(item.collection_item(), None);

        let two = GenericType::new(COLLECTION_NAME, 2)
            .close([item.clone(), item.clone()])
            .unwrap();
        assert_eq!(two.collection_item(), None);
    }

    #[test]
    fn rust_types_use_type_name() {
        struct Widget;
        let ty = ServiceType::of::<Widget>();
        assert!(ty.name().ends_with("Widget"));
        assert!(!ty.is_generic());
        assert_eq!(ty, ServiceType::of::<Widget>());
        assert_ne!(ty, ServiceType::of::<String>());
    }
}
