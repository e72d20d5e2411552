use crate::endpoint::{ContactSchema, QuestionSchema, UserProfileSchema, UserSchema};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// An immutable entity that can live in an [`EntityCache`](crate::ports::EntityCache).
///
/// Entities are keyed by a string id and built from the payload of a
/// successful endpoint call.
pub trait CachedEntity: Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Payload carried by a successful endpoint result.
    type Payload: Debug + Send + Sync + 'static;

    fn key(&self) -> &str;

    fn from_payload(payload: Self::Payload) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub username: String,
}

impl User {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }
}

impl CachedEntity for User {
    type Payload = UserSchema;

    fn key(&self) -> &str {
        &self.user_id
    }

    fn from_payload(payload: UserSchema) -> Self {
        Self::new(payload.user_id, payload.username)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub full_name: String,
    pub image_url: String,
}

impl UserProfile {
    pub fn new(
        user_id: impl Into<String>,
        full_name: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            full_name: full_name.into(),
            image_url: image_url.into(),
        }
    }
}

impl CachedEntity for UserProfile {
    type Payload = UserProfileSchema;

    fn key(&self) -> &str {
        &self.user_id
    }

    fn from_payload(payload: UserProfileSchema) -> Self {
        Self::new(payload.user_id, payload.full_name, payload.image_url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub full_name: String,
    pub image_url: String,
}

impl From<ContactSchema> for Contact {
    // phone number and age stay on the wire
    fn from(schema: ContactSchema) -> Self {
        Self {
            id: schema.id,
            full_name: schema.full_name,
            image_url: schema.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetails {
    pub id: String,
    pub title: String,
    pub body: String,
}

impl From<QuestionSchema> for QuestionDetails {
    fn from(schema: QuestionSchema) -> Self {
        Self {
            id: schema.id,
            title: schema.title,
            body: schema.body,
        }
    }
}

/// Caller-facing outcome of a request/response use case.
///
/// The payload exists only for `Success`. Endpoint-level errors (general,
/// auth, server) are all reported as `Failure`; `NetworkError` is reserved for
/// transports that signal lost connectivity out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UseCaseResult<T> {
    Success(T),
    Failure,
    NetworkError,
}

impl<T> UseCaseResult<T> {
    pub fn status(&self) -> UseCaseStatus {
        match self {
            UseCaseResult::Success(_) => UseCaseStatus::Success,
            UseCaseResult::Failure => UseCaseStatus::Failure,
            UseCaseResult::NetworkError => UseCaseStatus::NetworkError,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UseCaseResult::Success(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            UseCaseResult::Success(payload) => Some(payload),
            UseCaseResult::Failure | UseCaseResult::NetworkError => None,
        }
    }

    pub fn into_payload(self) -> Option<T> {
        match self {
            UseCaseResult::Success(payload) => Some(payload),
            UseCaseResult::Failure | UseCaseResult::NetworkError => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> UseCaseResult<U> {
        match self {
            UseCaseResult::Success(payload) => UseCaseResult::Success(f(payload)),
            UseCaseResult::Failure => UseCaseResult::Failure,
            UseCaseResult::NetworkError => UseCaseResult::NetworkError,
        }
    }
}

impl<T: Default> UseCaseResult<T> {
    /// Payload on success, `T::default()` otherwise (zero reputation on failure).
    pub fn payload_or_default(self) -> T {
        self.into_payload().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UseCaseStatus {
    Success,
    Failure,
    NetworkError,
}

/// Why a callback-style fetch failed, as reported to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    GeneralError,
    NetworkError,
}
