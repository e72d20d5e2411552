use crate::domain::{CachedEntity, UseCaseResult, User, UserProfile};
use crate::endpoint::EndpointResult;
use crate::mapping::transport_outcome;
use crate::ports::{EntityCache, FetchEndpoint};
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache-aside read of a single entity.
///
/// A cached entity is returned as-is and the endpoint is not consulted;
/// entries never expire. On a miss the endpoint is called and a successful
/// payload is cached before being returned. Failures leave the cache alone.
pub struct FetchUseCase<E: CachedEntity> {
    endpoint: Arc<dyn FetchEndpoint<E::Payload>>,
    cache: Arc<dyn EntityCache<E>>,
}

pub type FetchUserUseCase = FetchUseCase<User>;
pub type FetchUserProfileUseCase = FetchUseCase<UserProfile>;

impl<E: CachedEntity> FetchUseCase<E> {
    pub fn new(endpoint: Arc<dyn FetchEndpoint<E::Payload>>, cache: Arc<dyn EntityCache<E>>) -> Self {
        Self { endpoint, cache }
    }

    pub async fn fetch_sync(&self, id: &str) -> UseCaseResult<E> {
        if let Some(cached) = self.cache.get(id).await {
            debug!("Cache hit for '{}', endpoint not consulted", id);
            return UseCaseResult::Success(cached);
        }

        debug!("Cache miss for '{}', calling endpoint", id);
        let result = self.endpoint.fetch_sync(id).await;
        let status = result.as_ref().ok().map(EndpointResult::status);

        match transport_outcome(result) {
            UseCaseResult::Success(payload) => {
                let entity = E::from_payload(payload);
                self.cache.put(entity.clone()).await;
                debug!("Cached '{}' after successful fetch", entity.key());
                UseCaseResult::Success(entity)
            }
            UseCaseResult::Failure => {
                warn!("Endpoint rejected fetch of '{}' with {:?}", id, status);
                UseCaseResult::Failure
            }
            UseCaseResult::NetworkError => {
                warn!("Fetching '{}' failed: network error", id);
                UseCaseResult::NetworkError
            }
        }
    }
}

impl<E: CachedEntity> Clone for FetchUseCase<E> {
    fn clone(&self) -> Self {
        Self {
            endpoint: Arc::clone(&self.endpoint),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<E: CachedEntity> std::fmt::Debug for FetchUseCase<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchUseCase")
            .field("entity", &std::any::type_name::<E>())
            .finish()
    }
}
