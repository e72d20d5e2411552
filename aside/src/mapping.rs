//! Total mappings from transport-specific outcomes onto the use-case taxonomy.
//!
//! Every match below is exhaustive with no wildcard arm, so adding a status to
//! an endpoint enum fails to compile until it is mapped here.

use crate::domain::{FailureReason, UseCaseResult};
use crate::endpoint::{ContactsFailReason, EndpointResult, NetworkError, ReputationEndpointResult};

/// Success keeps its payload; general, auth and server errors become `Failure`.
pub fn endpoint_outcome<P>(result: EndpointResult<P>) -> UseCaseResult<P> {
    match result {
        EndpointResult::Success(payload) => UseCaseResult::Success(payload),
        EndpointResult::GeneralError | EndpointResult::AuthError | EndpointResult::ServerError => {
            UseCaseResult::Failure
        }
    }
}

/// Like [`endpoint_outcome`], with connectivity loss surfaced as `NetworkError`.
pub fn transport_outcome<P>(result: Result<EndpointResult<P>, NetworkError>) -> UseCaseResult<P> {
    match result {
        Ok(result) => endpoint_outcome(result),
        Err(NetworkError) => UseCaseResult::NetworkError,
    }
}

/// The reputation transport folds connectivity loss into its status codes, so
/// it collapses to `Failure` together with the general error.
pub fn reputation_outcome(result: ReputationEndpointResult) -> UseCaseResult<u32> {
    match result {
        ReputationEndpointResult::Success { reputation } => UseCaseResult::Success(reputation),
        ReputationEndpointResult::GeneralError | ReputationEndpointResult::NetworkError => {
            UseCaseResult::Failure
        }
    }
}

pub fn contacts_failure_reason(reason: ContactsFailReason) -> FailureReason {
    match reason {
        ContactsFailReason::GeneralError => FailureReason::GeneralError,
        ContactsFailReason::NetworkError => FailureReason::NetworkError,
    }
}
