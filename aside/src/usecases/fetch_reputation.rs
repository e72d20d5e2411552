use crate::domain::UseCaseResult;
use crate::mapping::reputation_outcome;
use crate::ports::GetReputationEndpoint;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetches the current user's reputation. Nothing is cached.
///
/// The reputation endpoint reports lost connectivity as a status, so both of
/// its error statuses come back as `Failure` (use
/// [`UseCaseResult::payload_or_default`] for a zero reputation on failure).
#[derive(Clone)]
pub struct FetchReputationUseCase {
    endpoint: Arc<dyn GetReputationEndpoint>,
}

impl FetchReputationUseCase {
    pub fn new(endpoint: Arc<dyn GetReputationEndpoint>) -> Self {
        Self { endpoint }
    }

    pub async fn fetch_reputation_sync(&self) -> UseCaseResult<u32> {
        let result = self.endpoint.get_reputation_sync().await;
        let outcome = reputation_outcome(result);
        match &outcome {
            UseCaseResult::Success(reputation) => debug!("Fetched reputation {}", reputation),
            _ => warn!("Reputation fetch failed with {:?}", result),
        }
        outcome
    }
}

impl std::fmt::Debug for FetchReputationUseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchReputationUseCase").finish_non_exhaustive()
    }
}
