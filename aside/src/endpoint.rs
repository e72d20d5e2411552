//! Endpoint-side vocabulary: wire schemas, raw endpoint outcomes and the
//! single-shot completion handed to callback-style endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Connectivity to the remote side was lost.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("network error")]
pub struct NetworkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointStatus {
    Success,
    GeneralError,
    AuthError,
    ServerError,
}

/// Raw outcome of a request/response endpoint. Only `Success` carries a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointResult<P> {
    Success(P),
    GeneralError,
    AuthError,
    ServerError,
}

impl<P> EndpointResult<P> {
    /// Pair a status with a payload; the payload is dropped for every
    /// non-success status.
    pub fn with_status(status: EndpointStatus, payload: P) -> Self {
        match status {
            EndpointStatus::Success => EndpointResult::Success(payload),
            EndpointStatus::GeneralError => EndpointResult::GeneralError,
            EndpointStatus::AuthError => EndpointResult::AuthError,
            EndpointStatus::ServerError => EndpointResult::ServerError,
        }
    }

    pub fn status(&self) -> EndpointStatus {
        match self {
            EndpointResult::Success(_) => EndpointStatus::Success,
            EndpointResult::GeneralError => EndpointStatus::GeneralError,
            EndpointResult::AuthError => EndpointStatus::AuthError,
            EndpointResult::ServerError => EndpointStatus::ServerError,
        }
    }
}

/// The reputation endpoint reports connectivity loss as a status, not as a
/// transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReputationEndpointResult {
    Success { reputation: u32 },
    GeneralError,
    NetworkError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactsFailReason {
    GeneralError,
    NetworkError,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("question details request failed")]
pub struct QuestionDetailsFetchFailed;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSchema {
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileSchema {
    pub user_id: String,
    pub full_name: String,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSchema {
    pub id: String,
    pub full_name: String,
    pub full_phone_number: String,
    pub image_url: String,
    pub age: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSchema {
    pub title: String,
    pub id: String,
    pub body: String,
}

type Handler<T, E> = Box<dyn FnOnce(Result<T, E>) + Send + 'static>;

/// Single-shot completion for callback-style endpoints.
///
/// Completing consumes the value, so an endpoint can deliver at most one
/// outcome. Endpoints must deliver exactly one: dropping a completion that was
/// never fired is logged as a contract violation. The handler runs on whatever
/// thread the endpoint completes on.
pub struct Completion<T, E> {
    handler: Option<Handler<T, E>>,
}

impl<T, E> Completion<T, E> {
    pub fn new(handler: impl FnOnce(Result<T, E>) + Send + 'static) -> Self {
        Self {
            handler: Some(Box::new(handler)),
        }
    }

    pub fn complete(mut self, outcome: Result<T, E>) {
        if let Some(handler) = self.handler.take() {
            handler(outcome);
        }
    }

    pub fn succeed(self, value: T) {
        self.complete(Ok(value));
    }

    pub fn fail(self, reason: E) {
        self.complete(Err(reason));
    }
}

impl<T, E> Drop for Completion<T, E> {
    fn drop(&mut self) {
        if self.handler.is_some() {
            tracing::warn!("Completion dropped without delivering an outcome; listeners will not be notified");
        }
    }
}

impl<T, E> fmt::Debug for Completion<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.handler.is_some())
            .finish()
    }
}
