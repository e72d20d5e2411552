use crate::domain::User;
use crate::ports::EventBusPoster;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    UserDetailsChanged(UserDetailsChangedEvent),
}

impl DomainEvent {
    pub fn event_id(&self) -> Uuid {
        match self {
            DomainEvent::UserDetailsChanged(e) => e.event_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::UserDetailsChanged(_) => "user_details_changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetailsChangedEvent {
    pub event_id: Uuid,
    pub user: User,
    pub occurred_at: DateTime<Utc>,
}

impl UserDetailsChangedEvent {
    pub fn new(user: User) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            user,
            occurred_at: Utc::now(),
        }
    }
}

/// In-process event bus backed by a tokio broadcast channel
#[derive(Clone, Debug)]
pub struct BroadcastEventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventBusPoster for BroadcastEventBus {
    fn post_event(&self, event: DomainEvent) {
        let name = event.name();
        let event_id = event.event_id();

        match self.sender.send(event) {
            Ok(subscriber_count) => {
                tracing::debug!(
                    "Posted {} event {} to {} subscriber(s)",
                    name,
                    event_id,
                    subscriber_count
                );
            }
            Err(_) => {
                tracing::warn!("No subscribers for {} event {}", name, event_id);
            }
        }
    }
}
