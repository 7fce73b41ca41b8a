//! Per-parameter resolution.

use std::collections::BTreeSet;

use super::CallSiteFactory;
use crate::activation::{Constructor, Parameter};
use crate::cache::CacheKey;
use crate::call_site::ParameterCallSite;
use crate::error::DiResult;
use crate::internal::CallSiteChain;
use crate::service_type::ServiceType;

/// Result of resolving every parameter of one constructor.
pub(super) enum ParameterOutcome {
    Resolved {
        parameters: Vec<ParameterCallSite>,
        satisfied: BTreeSet<ServiceType>,
    },
    /// First parameter type that could not be satisfied
    Unresolved(ServiceType),
}

/// Resolves the parameters of `constructor` in declaration order, stopping
/// at the first one that cannot be satisfied.
///
/// Errors from resolving a registered dependency propagate; only a missing
/// registration without a default value yields [`ParameterOutcome::Unresolved`].
pub(super) fn resolve_parameters(
    factory: &CallSiteFactory,
    constructor: &Constructor,
    chain: &mut CallSiteChain,
) -> DiResult<ParameterOutcome> {
    let mut parameters = Vec::with_capacity(constructor.arity());
    let mut satisfied = BTreeSet::new();

    for parameter in constructor.parameters() {
        match resolve_parameter(factory, parameter, chain)? {
            Some(site) => {
                if let ParameterCallSite::Service(_) = site {
                    satisfied.insert(parameter.service_type().clone());
                }
                parameters.push(site);
            }
            None => return Ok(ParameterOutcome::Unresolved(parameter.service_type().clone())),
        }
    }

    Ok(ParameterOutcome::Resolved { parameters, satisfied })
}

/// Resolution order: collection shape, registered service (exact or closed
/// open generic, last registration wins), declared default, unresolvable.
fn resolve_parameter(
    factory: &CallSiteFactory,
    parameter: &Parameter,
    chain: &mut CallSiteChain,
) -> DiResult<Option<ParameterCallSite>> {
    let key = CacheKey::unnamed(parameter.service_type().clone());

    // Collections always resolve, possibly to zero items
    if let Some(site) = factory.resolve_in_chain(&key, chain)? {
        return Ok(Some(ParameterCallSite::Service(site)));
    }

    Ok(parameter.default_value().cloned().map(ParameterCallSite::Default))
}
