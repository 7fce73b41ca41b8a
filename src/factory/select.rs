//! Constructor candidate selection.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::parameter::{self, ParameterOutcome};
use super::CallSiteFactory;
use crate::activation::{Constructor, ImplementationType};
use crate::call_site::{CallSite, ParameterCallSite};
use crate::error::{DiError, DiResult};
use crate::internal::CallSiteChain;
use crate::lifetime::Lifetime;
use crate::service_type::ServiceType;

/// A public constructor whose every parameter resolved.
struct Candidate<'a> {
    constructor: &'a Constructor,
    parameters: Vec<ParameterCallSite>,
    /// Parameter types satisfied by the container, defaults excluded
    satisfied: BTreeSet<ServiceType>,
}

impl Candidate<'_> {
    fn dominates(&self, other: &Candidate<'_>) -> bool {
        self.satisfied.len() > other.satisfied.len() && self.satisfied.is_superset(&other.satisfied)
    }
}

/// Picks the constructor that drives activation of `implementation`.
///
/// No public constructor means direct instance creation. Otherwise every
/// public constructor whose parameters all resolve is a candidate, and the
/// candidate whose satisfied-service set strictly contains every other
/// candidate's wins.
pub(super) fn select_constructor(
    factory: &CallSiteFactory,
    service_type: ServiceType,
    lifetime: Lifetime,
    implementation: &Arc<ImplementationType>,
    chain: &mut CallSiteChain,
) -> DiResult<CallSite> {
    let public: Vec<&Constructor> = implementation.public_constructors().collect();
    if public.is_empty() {
        return Ok(CallSite::create_instance(service_type, lifetime, implementation.clone()));
    }

    let mut candidates = Vec::with_capacity(public.len());
    let mut first_unresolved = None;
    for &constructor in &public {
        match parameter::resolve_parameters(factory, constructor, chain)? {
            ParameterOutcome::Resolved { parameters, satisfied } => candidates.push(Candidate {
                constructor,
                parameters,
                satisfied,
            }),
            ParameterOutcome::Unresolved(parameter) => {
                first_unresolved.get_or_insert(parameter);
            }
        }
    }

    let implementation_type = implementation.service_type();
    let winner = match candidates.len() {
        0 => {
            return Err(match (public.len(), first_unresolved) {
                (1, Some(parameter)) => DiError::UnresolvableParameter {
                    parameter,
                    implementation: implementation_type.clone(),
                },
                _ => DiError::NoConstructorResolvable {
                    implementation: implementation_type.clone(),
                },
            });
        }
        1 => candidates.remove(0),
        _ => pick_dominant(implementation_type, candidates)?,
    };

    tracing::trace!(
        target: "ferrous_callsite",
        service = %service_type,
        constructor = %winner.constructor.signature(implementation_type),
        depth = chain.depth(),
        "selected constructor"
    );

    if winner.parameters.is_empty() {
        Ok(CallSite::create_instance(service_type, lifetime, implementation.clone()))
    } else {
        Ok(CallSite::constructor(
            service_type,
            lifetime,
            implementation.clone(),
            winner.constructor.clone(),
            winner.parameters,
        ))
    }
}

/// Returns the candidate dominating all others, or an ambiguity error
/// listing every undominated candidate in declaration order.
fn pick_dominant<'a>(implementation: &ServiceType, mut candidates: Vec<Candidate<'a>>) -> DiResult<Candidate<'a>> {
    let undominated: Vec<usize> = (0..candidates.len())
        .filter(|&i| !candidates.iter().any(|other| other.dominates(&candidates[i])))
        .collect();

    // A unique undominated candidate strictly contains every other set
    if let [winner] = undominated.as_slice() {
        return Ok(candidates.swap_remove(*winner));
    }

    Err(DiError::AmbiguousConstructors {
        implementation: implementation.clone(),
        candidates: undominated
            .into_iter()
            .map(|i| candidates[i].constructor.signature(implementation))
            .collect(),
    })
}
