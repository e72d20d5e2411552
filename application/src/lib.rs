// application/src/lib.rs
pub mod fixtures;

use aside::endpoint::{UserProfileSchema, UserSchema};
use aside::ports::{
    EventBusPoster, FetchEndpoint, FetchQuestionDetailsEndpoint, GetContactsEndpoint,
    GetReputationEndpoint, UpdateUsernameEndpoint,
};
use aside::usecases::{
    FetchContactsUseCase, FetchQuestionDetailsUseCase, FetchReputationUseCase,
    FetchUserProfileUseCase, FetchUserUseCase, UpdateUsernameUseCase,
};
use aside::{BroadcastEventBus, User, UserProfile};
use fixtures::FixtureBackend;
use shared::config::Config;
use std::sync::Arc;
use storage_engine::MokaCache;

/// The remote side of every use case
#[derive(Clone)]
pub struct Endpoints {
    pub fetch_user: Arc<dyn FetchEndpoint<UserSchema>>,
    pub fetch_user_profile: Arc<dyn FetchEndpoint<UserProfileSchema>>,
    pub update_username: Arc<dyn UpdateUsernameEndpoint>,
    pub get_reputation: Arc<dyn GetReputationEndpoint>,
    pub get_contacts: Arc<dyn GetContactsEndpoint>,
    pub fetch_question_details: Arc<dyn FetchQuestionDetailsEndpoint>,
}

impl Endpoints {
    pub fn from_backend(backend: Arc<FixtureBackend>) -> Self {
        Self {
            fetch_user: backend.clone(),
            fetch_user_profile: backend.clone(),
            update_username: backend.clone(),
            get_reputation: backend.clone(),
            get_contacts: backend.clone(),
            fetch_question_details: backend,
        }
    }
}

#[derive(Clone)]
pub struct Application {
    pub fetch_user: FetchUserUseCase,
    pub fetch_user_profile: FetchUserProfileUseCase,
    pub update_username: UpdateUsernameUseCase,
    pub fetch_reputation: FetchReputationUseCase,
    pub fetch_contacts: FetchContactsUseCase,
    pub fetch_question_details: FetchQuestionDetailsUseCase,
    pub users: Arc<MokaCache<User>>,
    pub profiles: Arc<MokaCache<UserProfile>>,
    pub event_bus: BroadcastEventBus,
}

impl Application {
    pub fn new(endpoints: Endpoints, config: &Config) -> Self {
        let users = Arc::new(MokaCache::<User>::new("users", config.cache_max_entries));
        let profiles = Arc::new(MokaCache::<UserProfile>::new(
            "user_profiles",
            config.cache_max_entries,
        ));
        let event_bus = BroadcastEventBus::new(config.event_channel_capacity);
        let poster: Arc<dyn EventBusPoster> = Arc::new(event_bus.clone());

        tracing::info!(
            "Application wired with cache capacity {:?} and event channel capacity {}",
            config.cache_max_entries,
            config.event_channel_capacity
        );

        Self {
            fetch_user: FetchUserUseCase::new(endpoints.fetch_user, users.clone()),
            fetch_user_profile: FetchUserProfileUseCase::new(
                endpoints.fetch_user_profile,
                profiles.clone(),
            ),
            // shares the users cache so fetches observe updated usernames
            update_username: UpdateUsernameUseCase::new(
                endpoints.update_username,
                users.clone(),
                poster,
            ),
            fetch_reputation: FetchReputationUseCase::new(endpoints.get_reputation),
            fetch_contacts: FetchContactsUseCase::new(endpoints.get_contacts),
            fetch_question_details: FetchQuestionDetailsUseCase::new(
                endpoints.fetch_question_details,
            ),
            users,
            profiles,
            event_bus,
        }
    }

    pub fn with_fixtures(backend: FixtureBackend, config: &Config) -> Self {
        Self::new(Endpoints::from_backend(Arc::new(backend)), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aside::events::DomainEvent;
    use aside::ports::EntityCache;
    use aside::usecases::{FetchContactsListener, FetchQuestionDetailsListener};
    use aside::{Contact, FailureReason, QuestionDetails, UseCaseResult};
    use fixtures::FixtureData;
    use tokio::sync::mpsc;
    use tokio::time::{Duration, timeout};

    fn app() -> Application {
        Application::with_fixtures(
            FixtureBackend::new(FixtureData::sample()),
            &Config::default(),
        )
    }

    #[tokio::test]
    async fn test_update_then_fetch_is_served_from_cache() {
        let app = app();

        let before = app.fetch_user.fetch_sync("42").await;
        assert_eq!(before, UseCaseResult::Success(User::new("42", "johndoe")));

        let updated = app.update_username.update_username_sync("42", "jane").await;
        assert_eq!(updated, UseCaseResult::Success(()));

        // fixture data still says "johndoe", so the new name can only come from the cache
        let after = app.fetch_user.fetch_sync("42").await;
        assert_eq!(after, UseCaseResult::Success(User::new("42", "jane")));
    }

    #[tokio::test]
    async fn test_update_posts_user_details_changed() {
        let app = app();
        let mut events = app.event_bus.subscribe();

        app.update_username.update_username_sync("42", "jane").await;

        let event = timeout(Duration::from_secs(1), events.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            DomainEvent::UserDetailsChanged(changed) => {
                assert_eq!(changed.user, User::new("42", "jane"));
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_profile_populates_profile_cache() {
        let app = app();

        let result = app.fetch_user_profile.fetch_sync("42").await;

        assert!(result.is_success());
        let cached = app.profiles.get("42").await.unwrap();
        assert_eq!(cached.full_name, "John Doe");
        assert_eq!(app.users.get("42").await, None);
    }

    #[tokio::test]
    async fn test_network_down_surfaces_as_network_error() {
        let app = Application::with_fixtures(
            FixtureBackend::new(FixtureData {
                network_down: true,
                ..FixtureData::sample()
            }),
            &Config::default(),
        );

        assert_eq!(
            app.fetch_user.fetch_sync("42").await,
            UseCaseResult::NetworkError
        );
        assert_eq!(
            app.fetch_reputation.fetch_reputation_sync().await,
            UseCaseResult::Failure
        );
    }

    struct ChannelListener {
        tx: mpsc::UnboundedSender<Result<Vec<Contact>, FailureReason>>,
    }

    impl FetchContactsListener for ChannelListener {
        fn on_fetch_contacts_succeeded(&self, contacts: &[Contact]) {
            let _ = self.tx.send(Ok(contacts.to_vec()));
        }

        fn on_fetch_contacts_failed(&self, reason: FailureReason) {
            let _ = self.tx.send(Err(reason));
        }
    }

    #[tokio::test]
    async fn test_contacts_listener_notified_from_spawned_task() {
        let app = app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        app.fetch_contacts
            .register_listener(Arc::new(ChannelListener { tx }));

        app.fetch_contacts.fetch_contacts("turing");

        let contacts = timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].full_name, "Alan Turing");
    }

    struct QuestionChannel {
        tx: mpsc::UnboundedSender<Option<QuestionDetails>>,
    }

    impl FetchQuestionDetailsListener for QuestionChannel {
        fn on_question_details_fetched(&self, details: &QuestionDetails) {
            let _ = self.tx.send(Some(details.clone()));
        }

        fn on_question_details_fetch_failed(&self) {
            let _ = self.tx.send(None);
        }
    }

    #[tokio::test]
    async fn test_question_details_fetched_and_failed() {
        let app = app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        app.fetch_question_details
            .register_listener(Arc::new(QuestionChannel { tx }));

        app.fetch_question_details.fetch_question_details_and_notify("1");
        let fetched = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(fetched.flatten().map(|d| d.id), Some("1".to_string()));

        app.fetch_question_details.fetch_question_details_and_notify("missing");
        let failed = timeout(Duration::from_secs(1), rx.recv()).await.unwrap();
        assert_eq!(failed, Some(None));
    }
}
