//! Service lifetime definitions.

/// Service lifetimes carried by descriptors and recorded on call sites.
///
/// The resolution engine never caches instances itself. It copies the
/// lifetime of the winning descriptor onto the call site so the activation
/// layer can decide whether to reuse an instance (singleton, scoped) or
/// build a fresh one on every walk (transient).
///
/// # Examples
///
/// ```rust
/// use ferrous_callsite::{ServiceCollection, ServiceType, ImplementationType, Lifetime};
///
/// struct Database;
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(ServiceType::of::<Database>(), ImplementationType::of::<Database>());
///
/// let factory = services.build();
/// let site = factory.resolve::<Database>().unwrap();
/// assert_eq!(site.lifetime(), Some(Lifetime::Singleton));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// Single instance per root container
    Singleton,
    /// Single instance per scope
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}

impl Lifetime {
    /// Short lowercase label used in diagnostics and graph exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
            Lifetime::Transient => "transient",
        }
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
