use crate::domain::{UseCaseResult, User};
use crate::endpoint::EndpointResult;
use crate::events::{DomainEvent, UserDetailsChangedEvent};
use crate::mapping::transport_outcome;
use crate::ports::{EntityCache, EventBusPoster, UpdateUsernameEndpoint};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Write-through username update.
///
/// On success the cache is updated first and only then a
/// `UserDetailsChanged` event is posted, so subscribers reading the cache see
/// the new value. Any other outcome touches neither the cache nor the bus.
#[derive(Clone)]
pub struct UpdateUsernameUseCase {
    endpoint: Arc<dyn UpdateUsernameEndpoint>,
    cache: Arc<dyn EntityCache<User>>,
    event_bus: Arc<dyn EventBusPoster>,
}

impl UpdateUsernameUseCase {
    pub fn new(
        endpoint: Arc<dyn UpdateUsernameEndpoint>,
        cache: Arc<dyn EntityCache<User>>,
        event_bus: Arc<dyn EventBusPoster>,
    ) -> Self {
        Self {
            endpoint,
            cache,
            event_bus,
        }
    }

    pub async fn update_username_sync(&self, user_id: &str, username: &str) -> UseCaseResult<()> {
        let result = self.endpoint.update_username(user_id, username).await;
        let status = result.as_ref().ok().map(EndpointResult::status);

        match transport_outcome(result) {
            UseCaseResult::Success(_) => {
                let user = User::new(user_id, username);
                self.cache.put(user.clone()).await;
                debug!("Cached updated user '{}'", user_id);

                self.event_bus
                    .post_event(DomainEvent::UserDetailsChanged(UserDetailsChangedEvent::new(user)));
                info!("Username of '{}' updated", user_id);
                UseCaseResult::Success(())
            }
            UseCaseResult::Failure => {
                warn!("Endpoint rejected username update of '{}' with {:?}", user_id, status);
                UseCaseResult::Failure
            }
            UseCaseResult::NetworkError => {
                warn!("Updating username of '{}' failed: network error", user_id);
                UseCaseResult::NetworkError
            }
        }
    }
}

impl std::fmt::Debug for UpdateUsernameUseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUsernameUseCase").finish_non_exhaustive()
    }
}
