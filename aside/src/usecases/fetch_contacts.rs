use crate::domain::{Contact, FailureReason};
use crate::endpoint::{Completion, ContactSchema, ContactsFailReason};
use crate::listeners::ListenerRegistry;
use crate::mapping::contacts_failure_reason;
use crate::ports::GetContactsEndpoint;
use std::sync::Arc;
use tracing::{debug, warn};

#[cfg_attr(test, mockall::automock)]
pub trait FetchContactsListener: Send + Sync {
    fn on_fetch_contacts_succeeded(&self, contacts: &[Contact]);

    fn on_fetch_contacts_failed(&self, reason: FailureReason);
}

/// Callback-style contacts fetch.
///
/// `fetch_contacts` returns immediately; when the endpoint completes, every
/// listener registered at that moment is notified in registration order on
/// the completing thread.
#[derive(Clone)]
pub struct FetchContactsUseCase {
    endpoint: Arc<dyn GetContactsEndpoint>,
    listeners: Arc<ListenerRegistry<dyn FetchContactsListener>>,
}

impl FetchContactsUseCase {
    pub fn new(endpoint: Arc<dyn GetContactsEndpoint>) -> Self {
        Self {
            endpoint,
            listeners: Arc::new(ListenerRegistry::new()),
        }
    }

    pub fn register_listener(&self, listener: Arc<dyn FetchContactsListener>) {
        self.listeners.register(listener);
    }

    pub fn unregister_listener(&self, listener: &Arc<dyn FetchContactsListener>) {
        self.listeners.unregister(listener);
    }

    pub fn listeners(&self) -> &ListenerRegistry<dyn FetchContactsListener> {
        &self.listeners
    }

    pub fn fetch_contacts(&self, filter_term: &str) {
        let listeners = Arc::clone(&self.listeners);
        let filter = filter_term.to_string();

        let completion: Completion<Vec<ContactSchema>, ContactsFailReason> =
            Completion::new(move |outcome: Result<Vec<ContactSchema>, ContactsFailReason>| match outcome {
                Ok(schemas) => {
                    let contacts: Vec<Contact> = schemas.into_iter().map(Contact::from).collect();
                    let notified =
                        listeners.notify_all(|l| l.on_fetch_contacts_succeeded(&contacts));
                    debug!(
                        "Fetched {} contact(s) for '{}', notified {} listener(s)",
                        contacts.len(),
                        filter,
                        notified
                    );
                }
                Err(fail_reason) => {
                    let reason = contacts_failure_reason(fail_reason);
                    let notified = listeners.notify_all(|l| l.on_fetch_contacts_failed(reason));
                    warn!(
                        "Fetching contacts for '{}' failed with {:?}, notified {} listener(s)",
                        filter, reason, notified
                    );
                }
            });

        self.endpoint.get_contacts(filter_term, completion);
    }
}

impl std::fmt::Debug for FetchContactsUseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContactsUseCase")
            .field("listeners", &self.listeners)
            .finish()
    }
}
