//! config
//!
//! Decoded configuration types and loaders.
//!
//! # Design
//!
//! Forgefolio consumes three pieces of configuration:
//!
//! - A YAML forge list (`forges.yaml`): one [`ForgeConfig`] per domain.
//! - A YAML project list (`projects.yaml`): ordered [`InputCategory`] values,
//!   each holding ordered project references. Order is display order and is
//!   preserved until the renderer sorts within each category.
//! - An optional JSON token map keyed by domain, e.g.
//!   `{"github.com": "ghp_xxx"}`. A domain without a token is queried
//!   unauthenticated.
//!
//! The loaders here only decode; validation that depends on the forge layer
//! (duplicate domains, unsupported forge kinds) happens at registry
//! construction in [`crate::forge::registry`].

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from reading or decoding configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed to read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A YAML configuration file could not be decoded.
    #[error("failed to parse {path}: {source}")]
    Yaml {
        /// Path that failed to decode
        path: String,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// The token map was not a valid JSON object of domain to token.
    #[error("failed to parse tokens: {0}")]
    Tokens(#[source] serde_json::Error),
}

/// Configuration for a single forge, keyed by domain.
///
/// Immutable after load. `domain` is the primary key; duplicate domains are
/// rejected when the registry is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// Domain the forge is addressed by in project references (e.g. `github.com`)
    pub domain: String,
    /// Backend kind (`github` or `forgejo`), parsed at registry construction
    #[serde(rename = "type")]
    pub kind: String,
    /// API base URL (e.g. `https://api.github.com`)
    pub api: String,
    /// Raw-content CDN base URL, with trailing slash
    /// (e.g. `https://raw.githubusercontent.com/`)
    pub cdn: String,
    /// Emoji shown as a title prefix in multi-forge mode
    #[serde(default)]
    pub emoji: String,
}

/// A user-authored category of project references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputCategory {
    /// Category title, rendered as the table header
    pub title: String,
    /// Ordered project references
    pub projects: Vec<InputProject>,
}

/// One project reference inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProject {
    /// Reference in `domain/owner/repo` form
    pub repo: String,
    /// Optional icon path, relative to the repository's default branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Load the forge list from a YAML file.
pub fn load_forges(path: &Path) -> Result<Vec<ForgeConfig>, ConfigError> {
    read_yaml(path)
}

/// Load the project categories from a YAML file.
pub fn load_projects(path: &Path) -> Result<Vec<InputCategory>, ConfigError> {
    read_yaml(path)
}

/// Parse the token map from a JSON object string.
pub fn parse_tokens(tokens: &str) -> Result<HashMap<String, String>, ConfigError> {
    serde_json::from_str(tokens).map_err(ConfigError::Tokens)
}

fn read_yaml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ConfigError> {
    let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&data).map_err(|source| ConfigError::Yaml {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_forge_list() {
        let file = write_temp(
            r#"
- domain: github.com
  type: github
  api: https://api.github.com
  cdn: https://raw.githubusercontent.com/
  emoji: "🐙"
- domain: codeberg.org
  type: forgejo
  api: https://codeberg.org/api/v1
  cdn: https://codeberg.org/
"#,
        );

        let forges = load_forges(file.path()).unwrap();
        assert_eq!(forges.len(), 2);
        assert_eq!(forges[0].domain, "github.com");
        assert_eq!(forges[0].kind, "github");
        assert_eq!(forges[1].kind, "forgejo");
        // emoji is optional
        assert_eq!(forges[1].emoji, "");
    }

    #[test]
    fn loads_project_categories_in_order() {
        let file = write_temp(
            r#"
- title: Tools
  projects:
    - repo: github.com/alice/tool
      icon: docs/icon.png
    - repo: github.com/alice/other
- title: Libraries
  projects:
    - repo: codeberg.org/alice/lib
"#,
        );

        let categories = load_projects(file.path()).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].title, "Tools");
        assert_eq!(categories[0].projects.len(), 2);
        assert_eq!(
            categories[0].projects[0].icon.as_deref(),
            Some("docs/icon.png")
        );
        assert_eq!(categories[0].projects[1].icon, None);
        assert_eq!(categories[1].projects[0].repo, "codeberg.org/alice/lib");
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_forges(Path::new("/nonexistent/forges.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn invalid_yaml_is_yaml_error() {
        let file = write_temp("not: [valid");
        let result = load_forges(file.path());
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn parses_token_map() {
        let tokens = parse_tokens(r#"{"github.com": "ghp_abc", "codeberg.org": "tok"}"#).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens["github.com"], "ghp_abc");
    }

    #[test]
    fn rejects_malformed_token_json() {
        assert!(matches!(
            parse_tokens("{not json"),
            Err(ConfigError::Tokens(_))
        ));
    }
}
