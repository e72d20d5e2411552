// Ports are the pluggable collaborators the use cases are composed from

use crate::domain::CachedEntity;
use crate::endpoint::{
    Completion, ContactSchema, ContactsFailReason, EndpointResult, NetworkError,
    QuestionDetailsFetchFailed, QuestionSchema, ReputationEndpointResult, UserSchema,
};
use crate::events::DomainEvent;
use async_trait::async_trait;

/// Process-local entity cache keyed by entity id. No expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityCache<E: CachedEntity>: Send + Sync + 'static {
    async fn get(&self, id: &str) -> Option<E>;

    /// Insert or replace the entry under `entity.key()`
    async fn put(&self, entity: E);
}

/// Request/response endpoint fetching one entity payload by id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FetchEndpoint<P: Send + Sync + 'static>: Send + Sync + 'static {
    async fn fetch_sync(&self, id: &str) -> Result<EndpointResult<P>, NetworkError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpdateUsernameEndpoint: Send + Sync + 'static {
    async fn update_username(
        &self,
        user_id: &str,
        username: &str,
    ) -> Result<EndpointResult<UserSchema>, NetworkError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GetReputationEndpoint: Send + Sync + 'static {
    async fn get_reputation_sync(&self) -> ReputationEndpointResult;
}

/// Callback endpoint; must fire `completion` exactly once, on any thread.
#[cfg_attr(test, mockall::automock)]
pub trait GetContactsEndpoint: Send + Sync + 'static {
    fn get_contacts(
        &self,
        filter_term: &str,
        completion: Completion<Vec<ContactSchema>, ContactsFailReason>,
    );
}

/// Callback endpoint; must fire `completion` exactly once, on any thread.
#[cfg_attr(test, mockall::automock)]
pub trait FetchQuestionDetailsEndpoint: Send + Sync + 'static {
    fn fetch_question_details(
        &self,
        question_id: &str,
        completion: Completion<QuestionSchema, QuestionDetailsFetchFailed>,
    );
}

/// Single-shot event bus
#[cfg_attr(test, mockall::automock)]
pub trait EventBusPoster: Send + Sync + 'static {
    fn post_event(&self, event: DomainEvent);
}
