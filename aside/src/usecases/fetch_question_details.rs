use crate::domain::QuestionDetails;
use crate::endpoint::{Completion, QuestionDetailsFetchFailed, QuestionSchema};
use crate::listeners::ListenerRegistry;
use crate::ports::FetchQuestionDetailsEndpoint;
use std::sync::Arc;
use tracing::{debug, warn};

#[cfg_attr(test, mockall::automock)]
pub trait FetchQuestionDetailsListener: Send + Sync {
    fn on_question_details_fetched(&self, details: &QuestionDetails);

    fn on_question_details_fetch_failed(&self);
}

/// Callback-style fetch of a single question, fanned out to listeners
#[derive(Clone)]
pub struct FetchQuestionDetailsUseCase {
    endpoint: Arc<dyn FetchQuestionDetailsEndpoint>,
    listeners: Arc<ListenerRegistry<dyn FetchQuestionDetailsListener>>,
}

impl FetchQuestionDetailsUseCase {
    pub fn new(endpoint: Arc<dyn FetchQuestionDetailsEndpoint>) -> Self {
        Self {
            endpoint,
            listeners: Arc::new(ListenerRegistry::new()),
        }
    }

    pub fn register_listener(&self, listener: Arc<dyn FetchQuestionDetailsListener>) {
        self.listeners.register(listener);
    }

    pub fn unregister_listener(&self, listener: &Arc<dyn FetchQuestionDetailsListener>) {
        self.listeners.unregister(listener);
    }

    pub fn listeners(&self) -> &ListenerRegistry<dyn FetchQuestionDetailsListener> {
        &self.listeners
    }

    pub fn fetch_question_details_and_notify(&self, question_id: &str) {
        let listeners = Arc::clone(&self.listeners);
        let question_id_owned = question_id.to_string();

        let completion: Completion<QuestionSchema, QuestionDetailsFetchFailed> =
            Completion::new(move |outcome| match outcome {
                Ok(schema) => {
                    let details = QuestionDetails::from(schema);
                    let notified =
                        listeners.notify_all(|l| l.on_question_details_fetched(&details));
                    debug!(
                        "Fetched question '{}', notified {} listener(s)",
                        question_id_owned, notified
                    );
                }
                Err(e) => {
                    let notified = listeners.notify_all(|l| l.on_question_details_fetch_failed());
                    warn!(
                        "Fetching question '{}' failed: {}, notified {} listener(s)",
                        question_id_owned, e, notified
                    );
                }
            });

        self.endpoint.fetch_question_details(question_id, completion);
    }
}

impl std::fmt::Debug for FetchQuestionDetailsUseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchQuestionDetailsUseCase")
            .field("listeners", &self.listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockFetchQuestionDetailsEndpoint;

    const QUESTION_ID: &str = "questionId";

    fn question_schema() -> QuestionSchema {
        QuestionSchema {
            title: "title1".to_string(),
            id: "id1".to_string(),
            body: "body1".to_string(),
        }
    }

    fn question_details() -> QuestionDetails {
        QuestionDetails {
            id: "id1".to_string(),
            title: "title1".to_string(),
            body: "body1".to_string(),
        }
    }

    fn success() -> MockFetchQuestionDetailsEndpoint {
        let mut endpoint = MockFetchQuestionDetailsEndpoint::new();
        endpoint
            .expect_fetch_question_details()
            .returning(|_, completion| completion.succeed(question_schema()));
        endpoint
    }

    fn failure() -> MockFetchQuestionDetailsEndpoint {
        let mut endpoint = MockFetchQuestionDetailsEndpoint::new();
        endpoint
            .expect_fetch_question_details()
            .returning(|_, completion| completion.fail(QuestionDetailsFetchFailed));
        endpoint
    }

    #[test]
    fn test_question_id_passed_to_endpoint() {
        let mut endpoint = MockFetchQuestionDetailsEndpoint::new();
        endpoint
            .expect_fetch_question_details()
            .withf(|question_id, _| question_id == QUESTION_ID)
            .times(1)
            .returning(|_, completion| completion.succeed(question_schema()));

        let use_case = FetchQuestionDetailsUseCase::new(Arc::new(endpoint));
        use_case.fetch_question_details_and_notify(QUESTION_ID);
    }

    #[test]
    fn test_success_listeners_notified_with_correct_data() {
        let use_case = FetchQuestionDetailsUseCase::new(Arc::new(success()));
        for _ in 0..2 {
            let mut listener = MockFetchQuestionDetailsListener::new();
            listener
                .expect_on_question_details_fetched()
                .withf(|details| *details == question_details())
                .times(1)
                .return_const(());
            listener.expect_on_question_details_fetch_failed().never();
            use_case.register_listener(Arc::new(listener));
        }

        use_case.fetch_question_details_and_notify(QUESTION_ID);
    }

    #[test]
    fn test_failure_listeners_notified_with_failure() {
        let use_case = FetchQuestionDetailsUseCase::new(Arc::new(failure()));
        for _ in 0..2 {
            let mut listener = MockFetchQuestionDetailsListener::new();
            listener
                .expect_on_question_details_fetch_failed()
                .times(1)
                .return_const(());
            listener.expect_on_question_details_fetched().never();
            use_case.register_listener(Arc::new(listener));
        }

        use_case.fetch_question_details_and_notify(QUESTION_ID);
    }

    #[test]
    fn test_register_and_unregister_listener() {
        let use_case = FetchQuestionDetailsUseCase::new(Arc::new(success()));
        let listener: Arc<dyn FetchQuestionDetailsListener> =
            Arc::new(MockFetchQuestionDetailsListener::new());

        use_case.register_listener(Arc::clone(&listener));
        assert!(use_case.listeners().contains(&listener));

        use_case.unregister_listener(&listener);
        assert!(!use_case.listeners().contains(&listener));

        // no listeners left, completion must not call into the removed mock
        use_case.fetch_question_details_and_notify(QUESTION_ID);
    }
}
