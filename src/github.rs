//! GitHub API Client
//!
//! Module for managing interactions with the GitHub API

use async_trait::async_trait;
use http::header::USER_AGENT;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::config::{LabelConfig, SessionConfig};
use crate::error::{Error, Result};

/// Page size used for every listing call
const PER_PAGE: u8 = 100;

/// User agent sent with every request
fn user_agent() -> String {
    format!("label-setter/{}", env!("CARGO_PKG_VERSION"))
}

/// Encode a string for use in URL path segments (RFC 3986 with UTF-8 support)
///
/// Only unreserved characters (A-Z, a-z, 0-9, -, ., _, ~) are left unencoded.
fn encode_path_segment(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            // RFC 3986 unreserved characters
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '.' | '_' | '~' => c.to_string(),
            // Everything else gets percent-encoded as UTF-8 bytes
            _ => c
                .to_string()
                .bytes()
                .map(|b| format!("%{:02X}", b))
                .collect::<String>(),
        })
        .collect()
}

/// Whether an API error payload is the "label name already taken" conflict
///
/// GitHub answers 422 with `errors: [{"resource": "Label", "code": "already_exists", ...}]`.
fn is_already_exists(status: u16, errors: Option<&[serde_json::Value]>) -> bool {
    status == 422
        && errors
            .and_then(|errors| errors.first())
            .and_then(|error| error.get("code"))
            .and_then(|code| code.as_str())
            == Some("already_exists")
}

/// HTTP status carried by an octocrab error, if it came from the API
fn status_code(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// Whether an octocrab error is the "already exists" conflict
fn is_conflict(err: &octocrab::Error) -> bool {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            is_already_exists(source.status_code.as_u16(), source.errors.as_deref())
        }
        _ => false,
    }
}

/// GitHub Label Information
///
/// Represents label information retrieved from the GitHub API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubLabel {
    /// Label ID
    pub id: u64,

    /// Label name
    pub name: String,

    /// Label color (6-digit hexadecimal, without #)
    pub color: String,

    /// Label description
    pub description: Option<String>,

    /// Whether this is a default label
    pub default: bool,

    /// Label URL
    pub url: String,
}

impl From<octocrab::models::Label> for GitHubLabel {
    fn from(label: octocrab::models::Label) -> Self {
        GitHubLabel {
            id: label.id.0,
            name: label.name,
            color: label.color,
            description: label.description,
            default: label.default,
            url: label.url.to_string(),
        }
    }
}

/// Remote operations needed to apply labels
///
/// Implemented by [`GitHubClient`]; the run itself only talks to this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LabelService: Send + Sync {
    /// Logins of the organizations the credential can see
    async fn list_organizations(&self) -> Result<Vec<String>>;

    /// Names of all repositories of an organization
    async fn list_repositories(&self, account: &str) -> Result<Vec<String>>;

    /// Whether `account/repo` exists; only a 404 counts as missing
    async fn repository_exists(&self, account: &str, repo: &str) -> Result<bool>;

    /// All labels currently on the repository
    async fn list_labels(&self, account: &str, repo: &str) -> Result<Vec<GitHubLabel>>;

    /// Delete a label by name
    async fn delete_label(&self, account: &str, repo: &str, name: &str) -> Result<()>;

    /// Create a label
    ///
    /// Fails with [`Error::LabelAlreadyExists`] when the name is taken.
    async fn create_label(
        &self,
        account: &str,
        repo: &str,
        label: &LabelConfig,
    ) -> Result<GitHubLabel>;

    /// Update color and description of the label with the same name
    async fn update_label(
        &self,
        account: &str,
        repo: &str,
        label: &LabelConfig,
    ) -> Result<GitHubLabel>;
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Deserialize)]
struct OrganizationSummary {
    login: String,
}

#[derive(Serialize)]
struct UpdateLabelBody<'a> {
    color: String,
    description: &'a str,
}

/// GitHub API Client
///
/// Client responsible for interactions with the GitHub API
pub struct GitHubClient {
    octocrab: Octocrab,
}

impl GitHubClient {
    /// Create a new GitHub client
    ///
    /// # Errors
    /// Returns an error if the session is invalid or client initialization fails
    pub fn new(session: &SessionConfig) -> Result<Self> {
        session.validate()?;

        let octocrab = Octocrab::builder()
            .personal_token(session.access_token.clone())
            .add_header(USER_AGENT, user_agent())
            .base_uri(session.api_url.as_str())?
            .build()
            .map_err(|e| Error::generic(format!("Failed to create GitHub client: {}", e)))?;

        Ok(Self { octocrab })
    }
}

#[async_trait]
impl LabelService for GitHubClient {
    async fn list_organizations(&self) -> Result<Vec<String>> {
        let mut logins = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!(page, "listing organizations");
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let orgs: Vec<OrganizationSummary> =
                self.octocrab.get("/user/orgs", Some(&params)).await?;

            let done = orgs.len() < PER_PAGE as usize;
            logins.extend(orgs.into_iter().map(|org| org.login));
            if done {
                break;
            }
            page += 1;
        }

        Ok(logins)
    }

    async fn list_repositories(&self, account: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!(account, page, "listing repositories");
            let response = self
                .octocrab
                .orgs(account)
                .list_repos()
                .per_page(PER_PAGE)
                .page(page)
                .send()
                .await?;

            let done = response.items.len() < PER_PAGE as usize;
            names.extend(response.items.into_iter().map(|repo| repo.name));
            if done {
                break;
            }
            page += 1;
        }

        Ok(names)
    }

    async fn repository_exists(&self, account: &str, repo: &str) -> Result<bool> {
        tracing::debug!(account, repo, "checking repository");
        match self.octocrab.repos(account, repo).get().await {
            Ok(_) => Ok(true),
            Err(e) if status_code(&e) == Some(404) => Ok(false),
            Err(e) => Err(Error::GitHubApi(e)),
        }
    }

    async fn list_labels(&self, account: &str, repo: &str) -> Result<Vec<GitHubLabel>> {
        let mut labels = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!(account, repo, page, "listing labels");
            let response = self
                .octocrab
                .issues(account, repo)
                .list_labels_for_repo()
                .page(page)
                .per_page(PER_PAGE)
                .send()
                .await
                .map_err(|e| {
                    if status_code(&e) == Some(404) {
                        Error::RepositoryNotFound(format!("{}/{}", account, repo))
                    } else {
                        Error::GitHubApi(e)
                    }
                })?;

            let done = response.items.len() < PER_PAGE as usize;
            labels.extend(response.items.into_iter().map(GitHubLabel::from));
            if done {
                break;
            }
            page += 1;
        }

        Ok(labels)
    }

    async fn delete_label(&self, account: &str, repo: &str, name: &str) -> Result<()> {
        tracing::debug!(account, repo, name, "deleting label");
        // URL encode the label name to handle spaces, special characters, and UTF-8
        let encoded_name = encode_path_segment(name);
        self.octocrab
            .issues(account, repo)
            .delete_label(&encoded_name)
            .await?;

        Ok(())
    }

    async fn create_label(
        &self,
        account: &str,
        repo: &str,
        label: &LabelConfig,
    ) -> Result<GitHubLabel> {
        tracing::debug!(account, repo, name = %label.name, "creating label");
        let response = self
            .octocrab
            .issues(account, repo)
            .create_label(&label.name, label.api_color(), label.api_description())
            .await
            .map_err(|e| {
                if is_conflict(&e) {
                    Error::LabelAlreadyExists(label.name.clone())
                } else {
                    Error::GitHubApi(e)
                }
            })?;

        Ok(response.into())
    }

    async fn update_label(
        &self,
        account: &str,
        repo: &str,
        label: &LabelConfig,
    ) -> Result<GitHubLabel> {
        tracing::debug!(account, repo, name = %label.name, "updating label");
        let route = format!(
            "/repos/{}/{}/labels/{}",
            account,
            repo,
            encode_path_segment(&label.name)
        );
        let body = UpdateLabelBody {
            color: label.api_color(),
            description: label.api_description(),
        };
        let response: octocrab::models::Label = self.octocrab.patch(route, Some(&body)).await?;

        Ok(response.into())
    }
}
