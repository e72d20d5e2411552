//! Fixture endpoints backed by a JSON document, standing in for the remote
//! side until a real transport is wired.

use aside::endpoint::{
    Completion, ContactSchema, ContactsFailReason, EndpointResult, EndpointStatus, NetworkError,
    QuestionDetailsFetchFailed, QuestionSchema, ReputationEndpointResult, UserProfileSchema,
    UserSchema,
};
use aside::ports::{
    FetchEndpoint, FetchQuestionDetailsEndpoint, GetContactsEndpoint, GetReputationEndpoint,
    UpdateUsernameEndpoint,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureData {
    /// Every request fails as if connectivity was lost
    pub network_down: bool,
    pub users: Vec<UserSchema>,
    pub profiles: Vec<UserProfileSchema>,
    pub reputation: Option<u32>,
    pub contacts: Vec<ContactSchema>,
    pub questions: Vec<QuestionSchema>,
    /// Per-id status overrides for the request/response endpoints
    pub statuses: HashMap<String, EndpointStatus>,
}

impl FixtureData {
    pub fn sample() -> Self {
        Self {
            network_down: false,
            users: vec![UserSchema {
                user_id: "42".to_string(),
                username: "johndoe".to_string(),
            }],
            profiles: vec![UserProfileSchema {
                user_id: "42".to_string(),
                full_name: "John Doe".to_string(),
                image_url: "http://www.imageUrl.com/userAvatar".to_string(),
            }],
            reputation: Some(42),
            contacts: vec![
                ContactSchema {
                    id: "1".to_string(),
                    full_name: "Ada Lovelace".to_string(),
                    full_phone_number: "+44 20 0000 0001".to_string(),
                    image_url: "http://www.imageUrl.com/ada".to_string(),
                    age: 36.0,
                },
                ContactSchema {
                    id: "2".to_string(),
                    full_name: "Alan Turing".to_string(),
                    full_phone_number: "+44 20 0000 0002".to_string(),
                    image_url: "http://www.imageUrl.com/alan".to_string(),
                    age: 41.0,
                },
            ],
            questions: vec![QuestionSchema {
                title: "How do I cache?".to_string(),
                id: "1".to_string(),
                body: "Consult the cache before the network.".to_string(),
            }],
            statuses: HashMap::new(),
        }
    }
}

/// Implements every endpoint port from [`FixtureData`].
///
/// Unknown ids answer `GeneralError`. Callback endpoints complete on a
/// spawned tokio task when a runtime is available, inline otherwise.
#[derive(Debug, Clone, Default)]
pub struct FixtureBackend {
    data: FixtureData,
}

impl FixtureBackend {
    pub fn new(data: FixtureData) -> Self {
        Self { data }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let backend = Self::from_json_str(&raw)
            .map_err(|e| shared::Error::Fixture(format!("{}: {}", path.display(), e)))?;
        info!("Loaded fixtures from {}", path.display());
        Ok(backend)
    }

    pub fn data(&self) -> &FixtureData {
        &self.data
    }

    fn respond<P>(
        &self,
        id: &str,
        found: Option<P>,
    ) -> std::result::Result<EndpointResult<P>, NetworkError> {
        if self.data.network_down {
            return Err(NetworkError);
        }
        let result = match (self.data.statuses.get(id).copied(), found) {
            (None | Some(EndpointStatus::Success), Some(payload)) => {
                EndpointResult::Success(payload)
            }
            (None | Some(EndpointStatus::Success), None) => EndpointResult::GeneralError,
            (Some(EndpointStatus::GeneralError), _) => EndpointResult::GeneralError,
            (Some(EndpointStatus::AuthError), _) => EndpointResult::AuthError,
            (Some(EndpointStatus::ServerError), _) => EndpointResult::ServerError,
        };
        Ok(result)
    }
}

fn deliver<T, E>(completion: Completion<T, E>, outcome: std::result::Result<T, E>)
where
    T: Send + 'static,
    E: Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move { completion.complete(outcome) });
        }
        Err(_) => completion.complete(outcome),
    }
}

#[async_trait]
impl FetchEndpoint<UserSchema> for FixtureBackend {
    async fn fetch_sync(
        &self,
        id: &str,
    ) -> std::result::Result<EndpointResult<UserSchema>, NetworkError> {
        debug!("Fixture fetch of user '{}'", id);
        let found = self.data.users.iter().find(|u| u.user_id == id).cloned();
        self.respond(id, found)
    }
}

#[async_trait]
impl FetchEndpoint<UserProfileSchema> for FixtureBackend {
    async fn fetch_sync(
        &self,
        id: &str,
    ) -> std::result::Result<EndpointResult<UserProfileSchema>, NetworkError> {
        debug!("Fixture fetch of user profile '{}'", id);
        let found = self.data.profiles.iter().find(|p| p.user_id == id).cloned();
        self.respond(id, found)
    }
}

#[async_trait]
impl UpdateUsernameEndpoint for FixtureBackend {
    async fn update_username(
        &self,
        user_id: &str,
        username: &str,
    ) -> std::result::Result<EndpointResult<UserSchema>, NetworkError> {
        debug!("Fixture update of user '{}'", user_id);
        let updated = UserSchema {
            user_id: user_id.to_string(),
            username: username.to_string(),
        };
        self.respond(user_id, Some(updated))
    }
}

#[async_trait]
impl GetReputationEndpoint for FixtureBackend {
    async fn get_reputation_sync(&self) -> ReputationEndpointResult {
        if self.data.network_down {
            return ReputationEndpointResult::NetworkError;
        }
        match self.data.reputation {
            Some(reputation) => ReputationEndpointResult::Success { reputation },
            None => ReputationEndpointResult::GeneralError,
        }
    }
}

impl GetContactsEndpoint for FixtureBackend {
    fn get_contacts(
        &self,
        filter_term: &str,
        completion: Completion<Vec<ContactSchema>, ContactsFailReason>,
    ) {
        if self.data.network_down {
            deliver(completion, Err(ContactsFailReason::NetworkError));
            return;
        }
        let needle = filter_term.to_lowercase();
        let matching: Vec<ContactSchema> = self
            .data
            .contacts
            .iter()
            .filter(|c| c.full_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        deliver(completion, Ok(matching));
    }
}

impl FetchQuestionDetailsEndpoint for FixtureBackend {
    fn fetch_question_details(
        &self,
        question_id: &str,
        completion: Completion<QuestionSchema, QuestionDetailsFetchFailed>,
    ) {
        let found = if self.data.network_down {
            None
        } else {
            self.data.questions.iter().find(|q| q.id == question_id).cloned()
        };
        deliver(completion, found.ok_or(QuestionDetailsFetchFailed));
    }
}
