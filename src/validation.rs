//! Eager pre-build of every registration.
//!
//! Resolution is lazy by default, so a broken registration surfaces only when
//! something first asks for it. Validation walks every registered
//! `(service, name)` up front and reports all failures at once, which is
//! what `validate_on_build` uses.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::factory::CallSiteFactory;
use crate::service_type::ServiceType;

/// One registration that failed to resolve.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    pub service_type: ServiceType,
    pub name: Option<Arc<str>>,
    pub error: DiError,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} (named '{}'): {}", self.service_type, name, self.error),
            None => write!(f, "{}: {}", self.service_type, self.error),
        }
    }
}

/// Outcome of [`CallSiteFactory::validate`].
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Registrations whose call site was built (or already cached)
    pub built: usize,
    /// Registrations that failed, in registration order
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Ok(())` when every registration resolved, otherwise
    /// [`DiError::Validation`] carrying all failures.
    pub fn into_result(self) -> DiResult<()> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(DiError::Validation(self.failures))
        }
    }
}

impl CallSiteFactory {
    /// Pre-builds the call site of every closed registration.
    ///
    /// Open generic registrations are skipped; they only exist once closed
    /// by a request.
    ///
    /// # Examples
    ///
    /// ```
    /// use ferrous_callsite::{ServiceCollection, ServiceType, ImplementationType, Constructor, Parameter};
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(ServiceType::named("IFoo"), ImplementationType::named("Foo"));
    /// services.add_transient(
    ///     ServiceType::named("Broken"),
    ///     ImplementationType::named("Broken").constructor(Constructor::new([Parameter::new("IMissing")])),
    /// );
    ///
    /// let report = services.build().validate();
    /// assert_eq!(report.built, 1);
    /// assert_eq!(report.failures.len(), 1);
    /// assert_eq!(report.failures[0].service_type, ServiceType::named("Broken"));
    /// ```
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        for (service_type, name) in self.registry().service_keys() {
            match self.resolve_call_site(&service_type, name.as_deref()) {
                Ok(_) => report.built += 1,
                Err(error) => report.failures.push(ValidationFailure {
                    service_type,
                    name,
                    error,
                }),
            }
        }
        tracing::debug!(
            target: "ferrous_callsite",
            built = report.built,
            failed = report.failures.len(),
            "validated registrations"
        );
        report
    }
}
