pub mod fetch;
pub mod fetch_contacts;
pub mod fetch_question_details;
pub mod fetch_reputation;
pub mod update_username;

pub use fetch::{FetchUseCase, FetchUserProfileUseCase, FetchUserUseCase};
pub use fetch_contacts::{FetchContactsListener, FetchContactsUseCase};
pub use fetch_question_details::{FetchQuestionDetailsListener, FetchQuestionDetailsUseCase};
pub use fetch_reputation::FetchReputationUseCase;
pub use update_username::UpdateUsernameUseCase;
