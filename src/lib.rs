//! # label-setter
//!
//! Interactive tool that applies a fixed set of issue labels to a GitHub repository
//!
//! ## Flow
//! - Resolve the access token and organization (flags, environment, or prompt)
//! - Pick the target repository
//! - Optionally clear the labels already on it
//! - Create every configured label, asking before overwriting an existing one

pub mod audit;
pub mod config;
pub mod error;
pub mod github;
pub mod prompt;
pub mod resolve;
pub mod select;
pub mod sync;
pub mod terminal;

pub use config::{LabelConfig, SessionConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, LabelService};
pub use prompt::{Answer, Prompter, TerminalPrompter};
pub use sync::{LabelSyncer, SyncOperation, SyncResult};

/// Run one labeling session against an already-built client
///
/// `session` must already be resolved; an empty account is picked from the
/// organizations reachable by the credential.
///
/// # Examples
///
/// ```rust,no_run
/// use label_setter::{config, GitHubClient, SessionConfig, TerminalPrompter};
///
/// #[tokio::main]
/// async fn main() -> label_setter::Result<()> {
///     let session = SessionConfig {
///         access_token: "your_github_token".to_string(),
///         account: "your-org".to_string(),
///         api_url: config::DEFAULT_API_URL.to_string(),
///     };
///
///     let client = GitHubClient::new(&session)?;
///     let prompter = TerminalPrompter::new();
///     let result =
///         label_setter::run_session(&client, &prompter, &session, &config::default_labels())
///             .await?;
///
///     println!("Created {} labels", result.created);
///     Ok(())
/// }
/// ```
///
/// # Errors
/// [`Error::Cancelled`] when the user dismisses a prompt; any other error
/// comes from the API and leaves the repository as far as the run got
pub async fn run_session(
    service: &dyn LabelService,
    prompter: &dyn Prompter,
    session: &SessionConfig,
    labels: &[LabelConfig],
) -> Result<SyncResult> {
    let account = if session.account.is_empty() {
        select::select_account(service, prompter).await?
    } else {
        session.account.clone()
    };

    let repo = select::select_repository(service, prompter, &account).await?;

    let mut result = SyncResult::new();
    for name in audit::audit_existing_labels(service, prompter, &account, &repo).await? {
        result.add_operation(SyncOperation::Delete { name });
    }

    LabelSyncer::new(service, prompter, &account, &repo)
        .sync_labels(labels, &mut result)
        .await?;

    Ok(result)
}
