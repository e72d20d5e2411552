use application::Application;
use application::fixtures::{FixtureBackend, FixtureData};
use aside::usecases::{FetchContactsListener, FetchQuestionDetailsListener};
use aside::{Contact, FailureReason, QuestionDetails, UseCaseResult};
use clap::{Parser, Subcommand};
use serde::Serialize;
use shared::config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(5);

/// Run cache-aside use cases against fixture endpoints and print the
/// result as JSON.
#[derive(Debug, Parser)]
#[command(name = "aside-cli", version, about)]
struct Cli {
    /// Fixture file, overrides ASIDE_FIXTURES_PATH
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch a user, consulting the cache first
    FetchUser { user_id: String },
    /// Fetch a user profile, consulting the cache first
    FetchProfile { user_id: String },
    /// Change a username, then read it back through the cache
    UpdateUsername { user_id: String, username: String },
    /// Fetch the current user's reputation
    Reputation,
    /// Fetch contacts whose name contains the filter term
    Contacts {
        #[arg(default_value = "")]
        filter: String,
    },
    /// Fetch a question's details
    Question { question_id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    let config = Config::from_env();

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match dotenv {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let cli = Cli::parse();
    let backend = load_backend(cli.fixtures.as_ref(), &config)?;
    let app = Application::with_fixtures(backend, &config);

    match cli.command {
        Command::FetchUser { user_id } => print_json(&app.fetch_user.fetch_sync(&user_id).await)?,
        Command::FetchProfile { user_id } => {
            print_json(&app.fetch_user_profile.fetch_sync(&user_id).await)?
        }
        Command::UpdateUsername { user_id, username } => {
            update_username(&app, &user_id, &username).await?
        }
        Command::Reputation => print_json(&app.fetch_reputation.fetch_reputation_sync().await)?,
        Command::Contacts { filter } => print_json(&fetch_contacts(&app, &filter).await)?,
        Command::Question { question_id } => {
            print_json(&fetch_question(&app, &question_id).await)?
        }
    }

    Ok(())
}

fn load_backend(flag: Option<&PathBuf>, config: &Config) -> shared::Result<FixtureBackend> {
    let path = flag
        .map(|p| p.display().to_string())
        .or_else(|| config.fixtures_path.clone());

    match path {
        Some(path) => FixtureBackend::from_path(path),
        None => {
            info!("No fixtures configured, using built-in sample data");
            Ok(FixtureBackend::new(FixtureData::sample()))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> shared::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn update_username(app: &Application, user_id: &str, username: &str) -> shared::Result<()> {
    let mut events = app.event_bus.subscribe();

    let result = app.update_username.update_username_sync(user_id, username).await;
    print_json(&result)?;

    if result.is_success() {
        match events.try_recv() {
            Ok(event) => info!("Observed {} event {}", event.name(), event.event_id()),
            Err(e) => warn!("No event observed after update: {}", e),
        }
        print_json(&app.fetch_user.fetch_sync(user_id).await)?;
    }

    Ok(())
}

struct ContactsReply {
    tx: mpsc::UnboundedSender<UseCaseResult<Vec<Contact>>>,
}

impl FetchContactsListener for ContactsReply {
    fn on_fetch_contacts_succeeded(&self, contacts: &[Contact]) {
        let _ = self.tx.send(UseCaseResult::Success(contacts.to_vec()));
    }

    fn on_fetch_contacts_failed(&self, reason: FailureReason) {
        let result = match reason {
            FailureReason::GeneralError => UseCaseResult::Failure,
            FailureReason::NetworkError => UseCaseResult::NetworkError,
        };
        let _ = self.tx.send(result);
    }
}

async fn fetch_contacts(app: &Application, filter: &str) -> UseCaseResult<Vec<Contact>> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener: Arc<dyn FetchContactsListener> = Arc::new(ContactsReply { tx });
    app.fetch_contacts.register_listener(Arc::clone(&listener));

    app.fetch_contacts.fetch_contacts(filter);
    let result = await_reply(&mut rx).await;

    app.fetch_contacts.unregister_listener(&listener);
    result
}

struct QuestionReply {
    tx: mpsc::UnboundedSender<UseCaseResult<QuestionDetails>>,
}

impl FetchQuestionDetailsListener for QuestionReply {
    fn on_question_details_fetched(&self, details: &QuestionDetails) {
        let _ = self.tx.send(UseCaseResult::Success(details.clone()));
    }

    fn on_question_details_fetch_failed(&self) {
        let _ = self.tx.send(UseCaseResult::Failure);
    }
}

async fn fetch_question(app: &Application, question_id: &str) -> UseCaseResult<QuestionDetails> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener: Arc<dyn FetchQuestionDetailsListener> = Arc::new(QuestionReply { tx });
    app.fetch_question_details
        .register_listener(Arc::clone(&listener));

    app.fetch_question_details
        .fetch_question_details_and_notify(question_id);
    let result = await_reply(&mut rx).await;

    app.fetch_question_details.unregister_listener(&listener);
    result
}

async fn await_reply<T>(rx: &mut mpsc::UnboundedReceiver<UseCaseResult<T>>) -> UseCaseResult<T> {
    match tokio::time::timeout(CALLBACK_TIMEOUT, rx.recv()).await {
        Ok(Some(result)) => result,
        Ok(None) => {
            warn!("Listener channel closed before completion");
            UseCaseResult::Failure
        }
        Err(_) => {
            warn!("Endpoint did not complete within {:?}", CALLBACK_TIMEOUT);
            UseCaseResult::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_update_username() {
        let cli = Cli::try_parse_from(["aside-cli", "update-username", "42", "jane"]).unwrap();

        match cli.command {
            Command::UpdateUsername { user_id, username } => {
                assert_eq!(user_id, "42");
                assert_eq!(username, "jane");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_contacts_filter_defaults_to_empty() {
        let cli = Cli::try_parse_from(["aside-cli", "contacts"]).unwrap();

        assert!(matches!(cli.command, Command::Contacts { filter } if filter.is_empty()));
    }

    #[test]
    fn test_configured_fixture_path_is_loaded() {
        let config = Config {
            fixtures_path: Some("/does/not/exist.json".to_string()),
            ..Config::default()
        };

        assert!(load_backend(None, &config).is_err());
        let sample = load_backend(None, &Config::default()).unwrap();
        assert_eq!(sample.data(), &FixtureData::sample());
    }

    #[tokio::test]
    async fn test_question_reply_reaches_caller() {
        let app = Application::with_fixtures(
            FixtureBackend::new(FixtureData::sample()),
            &Config::default(),
        );

        let found = fetch_question(&app, "1").await;
        let missing = fetch_question(&app, "missing").await;

        assert_eq!(found.payload().map(|d| d.title.as_str()), Some("How do I cache?"));
        assert_eq!(missing, UseCaseResult::Failure);
        assert!(app.fetch_question_details.listeners().is_empty());
    }
}
