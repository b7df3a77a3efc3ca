//! Error Handling
//!
//! Error type definitions used in label-setter

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error types for label-setter
#[derive(Error, Debug)]
pub enum Error {
    #[error("GitHub API error: {0}")]
    GitHubApi(#[from] octocrab::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Terminal prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Configuration validation error: {0}")]
    ConfigValidation(String),

    #[error("Label validation error: {0}")]
    LabelValidation(String),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Label already exists: {0}")]
    LabelAlreadyExists(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid label color: {0} (expected 6-digit hex, optionally prefixed with #)")]
    InvalidLabelColor(String),

    /// The user dismissed a prompt without answering
    #[error("Cancelled by user")]
    Cancelled,

    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Create a new configuration validation error
    pub fn config_validation<S: Into<String>>(message: S) -> Self {
        Error::ConfigValidation(message.into())
    }

    /// Create a new label validation error
    pub fn label_validation<S: Into<String>>(message: S) -> Self {
        Error::LabelValidation(message.into())
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Error::Generic(message.into())
    }

    /// Whether this error comes from the user dismissing a prompt
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}
