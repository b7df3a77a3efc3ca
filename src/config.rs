//! Configuration Management
//!
//! Label definitions and per-run session settings

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable holding the personal access token
pub const ENV_AUTH_TOKEN: &str = "LABEL_AUTH_TOKEN";

/// Environment variable holding the target organization
pub const ENV_AUTH_ORG: &str = "LABEL_AUTH_ORG";

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "LABEL_API_URL";

/// Default GitHub REST API base URL
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Convention-based label file names searched in order
pub const CONVENTION_LABEL_FILES: &[&str] = &[
    "labels.json",
    "labels.yaml",
    "labels.yml",
    ".github/labels.json",
    ".github/labels.yaml",
    ".github/labels.yml",
];

/// Label Configuration
///
/// Represents a label definition to apply to the target repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelConfig {
    /// Label name
    pub name: String,

    /// Label color (6-digit hex code, `#` prefix optional)
    pub color: String,

    /// Label description (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LabelConfig {
    /// Create a new label configuration
    ///
    /// # Arguments
    /// - `name`: Label name
    /// - `color`: Label color (6-digit hex code, `#` prefix optional)
    /// - `description`: Label description
    ///
    /// # Errors
    /// Returns an error if the name is empty or the color format is invalid
    pub fn new(name: &str, color: &str, description: Option<&str>) -> Result<Self> {
        let label = Self {
            name: name.to_string(),
            color: color.to_string(),
            description: description.map(str::to_string),
        };

        label.validate()?;
        Ok(label)
    }

    /// Validate label configuration
    ///
    /// # Errors
    /// - If the name is empty
    /// - If the color is not six hex digits
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::label_validation("Label name cannot be empty"));
        }

        if !is_valid_hex_color(&Self::normalize_color(&self.color)) {
            return Err(Error::InvalidLabelColor(self.color.clone()));
        }

        Ok(())
    }

    /// Normalize color (remove # and convert to lowercase)
    pub fn normalize_color(color: &str) -> String {
        color.trim_start_matches('#').to_lowercase()
    }

    /// Color in the form the API expects
    pub fn api_color(&self) -> String {
        Self::normalize_color(&self.color)
    }

    /// Description sent to the API (empty when unset)
    pub fn api_description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Session Configuration
///
/// Values resolved once per run and passed to every operation
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// GitHub personal access token
    pub access_token: String,

    /// Account (organization) owning the target repository, empty when
    /// it still has to be picked from a list
    pub account: String,

    /// API base URL
    pub api_url: String,
}

impl SessionConfig {
    /// Build a session from command-line values, falling back to the environment
    ///
    /// Missing values stay empty so the resolver can prompt for them.
    pub fn from_sources(
        access_token: Option<String>,
        account: Option<String>,
        api_url: Option<String>,
    ) -> Self {
        Self {
            access_token: arg_or_env(access_token, ENV_AUTH_TOKEN).unwrap_or_default(),
            account: arg_or_env(account, ENV_AUTH_ORG).unwrap_or_default(),
            api_url: arg_or_env(api_url, ENV_API_URL)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    /// - If access token is empty
    /// - If the API URL is not an absolute URL
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(Error::config_validation("Access token is required"));
        }

        let url = url::Url::parse(&self.api_url).map_err(|e| {
            Error::config_validation(format!("Invalid API URL '{}': {}", self.api_url, e))
        })?;
        if url.cannot_be_a_base() {
            return Err(Error::config_validation(format!(
                "API URL must be absolute: {}",
                self.api_url
            )));
        }

        Ok(())
    }
}

/// Pick a non-empty argument, else a non-empty environment variable
fn arg_or_env(arg: Option<String>, var: &str) -> Option<String> {
    arg.filter(|v| !v.is_empty())
        .or_else(|| std::env::var(var).ok().filter(|v| !v.is_empty()))
}

/// Generate default label configuration
///
/// Returns GitHub's standard label set
pub fn default_labels() -> Vec<LabelConfig> {
    [
        ("bug", "#d73a4a", "Something isn't working"),
        ("documentation", "#0075ca", "Improvements or additions to documentation"),
        ("duplicate", "#cfd3d7", "This issue or pull request already exists"),
        ("enhancement", "#a2eeef", "New feature or request"),
        ("good first issue", "#7057ff", "Good for newcomers"),
        ("help wanted", "#008672", "Extra attention is needed"),
        ("invalid", "#e4e669", "This doesn't seem right"),
        ("question", "#d876e3", "Further information is requested"),
        ("wontfix", "#ffffff", "This will not be worked on"),
    ]
    .into_iter()
    .map(|(name, color, description)| LabelConfig {
        name: name.to_string(),
        color: color.to_string(),
        description: Some(description.to_string()),
    })
    .collect()
}

/// Validate a whole label list
///
/// # Errors
/// If any label is invalid or a name appears twice
pub fn validate_labels(labels: &[LabelConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for label in labels {
        label.validate()?;
        if !seen.insert(label.name.as_str()) {
            return Err(Error::label_validation(format!(
                "Duplicate label name: {}",
                label.name
            )));
        }
    }
    Ok(())
}

/// Load label configuration from JSON file
///
/// # Errors
/// If file reading, parsing or validation fails
pub fn load_labels_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<LabelConfig>> {
    let content = std::fs::read_to_string(path)?;
    let labels: Vec<LabelConfig> = serde_json::from_str(&content)?;
    validate_labels(&labels)?;
    Ok(labels)
}

/// Load label configuration from YAML file
///
/// # Errors
/// If file reading, parsing or validation fails
pub fn load_labels_from_yaml<P: AsRef<Path>>(path: P) -> Result<Vec<LabelConfig>> {
    let content = std::fs::read_to_string(path)?;
    let labels: Vec<LabelConfig> = serde_yaml::from_str(&content)?;
    validate_labels(&labels)?;
    Ok(labels)
}

/// Load label configuration from a file, detecting format by extension
///
/// # Errors
/// If file reading, parsing, or validation fails, or if the extension is unsupported
pub fn load_labels_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<LabelConfig>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Label file not found: {}", path.display()),
        )
        .into());
    }

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_labels_from_json(path),
        Some("yaml") | Some("yml") => load_labels_from_yaml(path),
        _ => Err(Error::config_validation(
            "Label file must be .json, .yaml, or .yml",
        )),
    }
}

/// Search for a convention-based label file in the given directory
///
/// Searches [`CONVENTION_LABEL_FILES`] in order and returns the first one found.
pub fn find_convention_labels_in(dir: &Path) -> Option<PathBuf> {
    CONVENTION_LABEL_FILES
        .iter()
        .map(|filename| dir.join(filename))
        .find(|path| path.exists())
}

/// Resolve the label list for this run
///
/// An explicit path wins, then a convention file in `dir`, then the defaults.
///
/// # Errors
/// If the chosen file cannot be loaded
pub fn resolve_labels(explicit: Option<&Path>, dir: &Path) -> Result<Vec<LabelConfig>> {
    if let Some(path) = explicit {
        return load_labels_from_file(path);
    }

    match find_convention_labels_in(dir) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "using convention label file");
            load_labels_from_file(path)
        }
        None => Ok(default_labels()),
    }
}

/// Validate hex color code (6 digits, no #)
fn is_valid_hex_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hex_color() {
        assert!(is_valid_hex_color("ff0000"));
        assert!(is_valid_hex_color("00FF00"));
        assert!(is_valid_hex_color("123abc"));

        assert!(!is_valid_hex_color("ff00")); // Too short
        assert!(!is_valid_hex_color("ff0000x")); // Invalid character
        assert!(!is_valid_hex_color("#ff0000")); // With #
    }

    #[test]
    fn test_label_config_validation() {
        let with_hash = LabelConfig::new("bug", "#d73a4a", None).unwrap();
        assert_eq!(with_hash.color, "#d73a4a");

        let without_hash = LabelConfig::new("bug", "d73a4a", None).unwrap();
        assert_eq!(without_hash.api_color(), "d73a4a");

        assert!(LabelConfig::new("bug", "invalid", None).is_err());
        assert!(LabelConfig::new("bug", "#invalid", None).is_err());
        assert!(LabelConfig::new("   ", "#d73a4a", None).is_err());
    }

    #[test]
    fn test_api_color_strips_hash_and_lowercases() {
        let label = LabelConfig::new("bug", "#D73A4A", Some("Something isn't working")).unwrap();
        assert_eq!(label.api_color(), "d73a4a");
        assert_eq!(label.api_description(), "Something isn't working");

        let bare = LabelConfig::new("bug", "d73a4a", None).unwrap();
        assert_eq!(bare.api_description(), "");
    }

    #[test]
    fn test_default_labels_are_valid() {
        let labels = default_labels();
        assert!(validate_labels(&labels).is_ok());
        assert_eq!(labels[0].name, "bug");
        assert_eq!(labels[0].color, "#d73a4a");
    }

    #[test]
    fn test_validate_labels_rejects_duplicates() {
        let labels = vec![
            LabelConfig::new("bug", "#d73a4a", None).unwrap(),
            LabelConfig::new("bug", "#ffffff", None).unwrap(),
        ];
        let err = validate_labels(&labels).unwrap_err();
        assert!(err.to_string().contains("Duplicate label name"));
    }

    #[test]
    fn test_session_config_validate() {
        let config = SessionConfig {
            access_token: "token".to_string(),
            account: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
        };
        assert!(config.validate().is_ok());

        let empty_token = SessionConfig {
            access_token: "  ".to_string(),
            ..config.clone()
        };
        assert!(empty_token.validate().is_err());

        let bad_url = SessionConfig {
            api_url: "not a url".to_string(),
            ..config
        };
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_session_config_env_variants() {
        // Environment variable tests are combined to keep them sequential.
        let saved_token = std::env::var(ENV_AUTH_TOKEN).ok();
        let saved_org = std::env::var(ENV_AUTH_ORG).ok();

        std::env::set_var(ENV_AUTH_TOKEN, "env-token");
        std::env::set_var(ENV_AUTH_ORG, "env-org");
        let config = SessionConfig::from_sources(None, None, None);
        assert_eq!(config.access_token, "env-token");
        assert_eq!(config.account, "env-org");
        assert_eq!(config.api_url, DEFAULT_API_URL);

        // Arguments take precedence
        let config = SessionConfig::from_sources(
            Some("arg-token".to_string()),
            Some("acme".to_string()),
            None,
        );
        assert_eq!(config.access_token, "arg-token");
        assert_eq!(config.account, "acme");

        // Nothing set leaves the values empty for the prompts
        std::env::remove_var(ENV_AUTH_TOKEN);
        std::env::remove_var(ENV_AUTH_ORG);
        let config = SessionConfig::from_sources(None, None, None);
        assert!(config.access_token.is_empty());
        assert!(config.account.is_empty());

        if let Some(val) = saved_token {
            std::env::set_var(ENV_AUTH_TOKEN, val);
        }
        if let Some(val) = saved_org {
            std::env::set_var(ENV_AUTH_ORG, val);
        }
    }

    #[test]
    fn test_load_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(
            &path,
            r##"[{"name":"bug","color":"#d73a4a","description":"Something isn't working"}]"##,
        )
        .unwrap();
        let labels = load_labels_from_json(&path).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name, "bug");
        assert_eq!(
            labels[0].description.as_deref(),
            Some("Something isn't working")
        );
    }

    #[test]
    fn test_load_valid_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.yaml");
        std::fs::write(&path, "- name: bug\n  color: \"#ff0000\"\n").unwrap();
        let labels = load_labels_from_yaml(&path).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name, "bug");
        assert_eq!(labels[0].description, None);
    }

    #[test]
    fn test_load_json_with_invalid_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.json");
        std::fs::write(&path, r##"[{"name":"bug","color":"invalid"}]"##).unwrap();
        assert!(load_labels_from_json(&path).is_err());
    }

    #[test]
    fn test_load_labels_from_file_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.toml");
        std::fs::write(&path, "").unwrap();
        assert!(load_labels_from_file(&path).is_err());
    }

    #[test]
    fn test_load_labels_from_file_not_found() {
        let path = PathBuf::from("/nonexistent/labels.json");
        assert!(load_labels_from_file(&path).is_err());
    }

    #[test]
    fn test_find_convention_labels_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("labels.yaml"),
            "- name: a\n  color: \"#ff0000\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("labels.json"),
            r##"[{"name":"b","color":"#ff0000"}]"##,
        )
        .unwrap();
        let found = find_convention_labels_in(dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "labels.json");
    }

    #[test]
    fn test_find_convention_labels_github_dir() {
        let dir = tempfile::tempdir().unwrap();
        let github_dir = dir.path().join(".github");
        std::fs::create_dir(&github_dir).unwrap();
        std::fs::write(
            github_dir.join("labels.yml"),
            "- name: a\n  color: \"#ff0000\"\n",
        )
        .unwrap();
        let found = find_convention_labels_in(dir.path()).unwrap();
        assert!(found.ends_with(".github/labels.yml"));
    }

    #[test]
    fn test_resolve_labels_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let labels = resolve_labels(None, dir.path()).unwrap();
        assert_eq!(labels, default_labels());
    }

    #[test]
    fn test_resolve_labels_prefers_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("labels.json"),
            r##"[{"name":"convention","color":"#ff0000"}]"##,
        )
        .unwrap();
        let explicit = dir.path().join("custom.yml");
        std::fs::write(&explicit, "- name: explicit\n  color: \"00ff00\"\n").unwrap();

        let labels = resolve_labels(Some(&explicit), dir.path()).unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name, "explicit");

        let labels = resolve_labels(None, dir.path()).unwrap();
        assert_eq!(labels[0].name, "convention");
    }
}
