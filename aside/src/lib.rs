//! Cache-aside use cases: fetch and update operations that combine a remote
//! endpoint, a local entity cache and observer notification behind a closed
//! result taxonomy.

pub mod domain;
pub mod endpoint;
pub mod events;
pub mod listeners;
pub mod mapping;
pub mod ports;
pub mod usecases;

pub use domain::{
    CachedEntity, Contact, FailureReason, QuestionDetails, UseCaseResult, UseCaseStatus, User,
    UserProfile,
};
pub use endpoint::{Completion, EndpointResult, EndpointStatus, NetworkError};
pub use events::{BroadcastEventBus, DomainEvent};
pub use listeners::ListenerRegistry;
