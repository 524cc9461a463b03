//! forge::traits
//!
//! Forge trait definition for fetching repository metadata from remote
//! hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors gracefully. Each
//! implementation wraps one configured forge: connection and auth setup
//! happens once at registry-construction time, not per call.
//!
//! A fetch normalizes the backend's response into a [`RepoRecord`], the
//! forge-agnostic representation the renderer consumes. Backends differ in
//! capability (license data, primary-language field, raw-content URL
//! conventions); the normalization rules live with each backend.
//!
//! # Example
//!
//! ```ignore
//! use forgefolio::forge::Forge;
//!
//! async fn show(forge: &dyn Forge) -> Result<(), ForgeError> {
//!     let record = forge.fetch_repository("alice", "example", None).await?;
//!     println!("{} has {} stars", record.full_title, record.stars);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting with
/// remote hosting services. Every one of them aborts the whole generation
/// run; there is no partial-success mode.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested repository or resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error, including request timeouts.
    #[error("network error: {0}")]
    NetworkError(String),

    /// Configuration names a backend kind with no implemented variant.
    #[error("unsupported forge type '{0}'")]
    UnsupportedKind(String),

    /// Two forge configurations share the same domain.
    #[error("duplicate forge domain '{0}'")]
    DuplicateDomain(String),
}

/// The forge-agnostic representation of one repository's metadata.
///
/// Produced by [`Forge::fetch_repository`]; the renderer only reads these
/// and derives display strings from them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoRecord {
    /// Web URL of the repository
    pub url: String,
    /// `owner/repo` pair as reported by the forge
    pub full_title: String,
    /// Repository description, empty if none
    pub description: String,
    /// Primary language, empty if the forge reports none
    pub language: String,
    /// SPDX license identifier, `UNLICENSED` when the backend detects none,
    /// empty when the backend does not expose license data at all
    pub license: String,
    /// Latest activity as an RFC 3339 timestamp: the newest commit author
    /// date on the default branch, falling back to the repository's
    /// last-push timestamp when no commit is returned
    pub last_activity: String,
    /// Repository topics
    pub topics: BTreeSet<String>,
    /// Star count
    pub stars: u64,
    /// Fork count
    pub forks: u64,
    /// Open issue count
    pub open_issues: u64,
    /// Resolved raw-content icon URL, empty unless the input project
    /// requested an icon
    pub icon_url: String,
    /// Domain of the forge that produced this record
    pub forge_domain: String,
    /// Emoji of the forge; populated only in multi-forge mode
    pub forge_emoji: String,
}

/// The Forge trait for fetching repository metadata from remote hosting
/// services.
///
/// One implementation exists per backend kind, selected once at
/// registry-construction time from configuration, never re-dispatched per
/// call.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Forgefolio is fail-fast: the
/// caller aborts the whole run on the first error rather than emitting a
/// silently incomplete report.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge kind name (e.g., "github", "forgejo").
    fn name(&self) -> &'static str;

    /// Get the domain this forge was configured for.
    fn domain(&self) -> &str;

    /// Fetch one repository's metadata and normalize it.
    ///
    /// Performs, in order: (1) get repository metadata, (2) list the first
    /// page of commits on the default branch, and (3) for backends without a
    /// ready primary-language field, list per-language byte counts.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (user or organization)
    /// * `repo` - Repository name
    /// * `icon` - Optional icon path relative to the default branch; when
    ///   present, the record's `icon_url` is resolved against the forge's
    ///   raw-content CDN convention
    ///
    /// # Errors
    ///
    /// - `NotFound` if the repository doesn't exist
    /// - `AuthFailed` if the token is invalid or lacks permissions
    /// - `RateLimited` if the API rate limit is exhausted
    /// - `NetworkError` on connection failure or timeout
    async fn fetch_repository(
        &self,
        owner: &str,
        repo: &str,
        icon: Option<&str>,
    ) -> Result<RepoRecord, ForgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forge_error_display() {
        assert_eq!(
            format!("{}", ForgeError::AuthFailed("expired token".into())),
            "authentication failed: expired token"
        );
        assert_eq!(
            format!("{}", ForgeError::NotFound("alice/example".into())),
            "not found: alice/example"
        );
        assert_eq!(format!("{}", ForgeError::RateLimited), "rate limited");
        assert_eq!(
            format!(
                "{}",
                ForgeError::ApiError {
                    status: 422,
                    message: "Validation failed".into()
                }
            ),
            "API error: 422 - Validation failed"
        );
        assert_eq!(
            format!("{}", ForgeError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
        assert_eq!(
            format!("{}", ForgeError::UnsupportedKind("bitbucket".into())),
            "unsupported forge type 'bitbucket'"
        );
        assert_eq!(
            format!("{}", ForgeError::DuplicateDomain("github.com".into())),
            "duplicate forge domain 'github.com'"
        );
    }

    #[test]
    fn repo_record_default_is_empty() {
        let record = RepoRecord::default();
        assert!(record.url.is_empty());
        assert!(record.license.is_empty());
        assert!(record.topics.is_empty());
        assert_eq!(record.stars, 0);
    }
}
