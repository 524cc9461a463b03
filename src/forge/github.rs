//! forge::github
//!
//! GitHub-compatible forge implementation using the REST API.
//!
//! # Design
//!
//! One [`GitHubForge`] wraps one configured domain. A fetch performs, in
//! order: get repository metadata, then list the first page of commits on
//! the default branch. GitHub reports a ready primary-language field and
//! license data, so no further calls are needed.
//!
//! # Normalization
//!
//! - `license` is the repository's SPDX identifier, or `UNLICENSED` when
//!   GitHub detects no license.
//! - `last_activity` is the author date of the newest commit on the default
//!   branch; when the commit list is empty it falls back to the repository's
//!   `pushed_at` timestamp. The fallback affects the displayed year and must
//!   be preserved exactly.
//! - Icon URLs follow GitHub's raw-content convention:
//!   `{cdn}{owner}/{repo}/{default_branch}/{icon_path}`.
//!
//! # Rate Limiting
//!
//! GitHub has rate limits. This implementation returns
//! [`ForgeError::RateLimited`] when limits are hit and does not retry; the
//! whole run aborts.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{Forge, ForgeError, RepoRecord};
use crate::config::ForgeConfig;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "forgefolio-cli";

/// GitHub-compatible forge implementation.
///
/// Construction happens once at registry-construction time; the HTTP client,
/// bearer token, and endpoints are fixed for the life of the registry.
pub struct GitHubForge {
    /// HTTP client for making requests
    client: Client,
    /// Bearer token; `None` means unauthenticated
    token: Option<String>,
    /// Domain this forge serves (registry key)
    domain: String,
    /// API base URL, without trailing slash
    api_base: String,
    /// Raw-content CDN base URL, with trailing slash
    cdn_base: String,
    /// Emoji shown as a title prefix in multi-forge mode
    emoji: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubForge")
            .field("has_token", &self.token.is_some())
            .field("domain", &self.domain)
            .field("api_base", &self.api_base)
            .field("cdn_base", &self.cdn_base)
            .finish()
    }
}

impl GitHubForge {
    /// Create a new GitHub forge from its configuration and optional token.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::NetworkError` if the HTTP client cannot be built.
    pub fn new(config: &ForgeConfig, token: Option<String>) -> Result<Self, ForgeError> {
        let client = Client::builder()
            .timeout(super::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            token,
            domain: config.domain.clone(),
            api_base: config.api.trim_end_matches('/').to_string(),
            cdn_base: config.cdn.clone(),
            emoji: config.emoji.clone(),
        })
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ForgeError::AuthFailed("invalid token format".into()))?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Perform a GET request and decode the JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, ForgeError> {
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ForgeError::NetworkError(e.to_string()))?;

        handle_response(response).await
    }
}

/// Handle API response, mapping errors appropriately.
async fn handle_response<T: for<'de> Deserialize<'de>>(
    response: Response,
) -> Result<T, ForgeError> {
    let status = response.status();

    if status.is_success() {
        response.json().await.map_err(|e| ForgeError::ApiError {
            status: status.as_u16(),
            message: format!("Failed to parse response: {}", e),
        })
    } else {
        // Try to get an error message from the body
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => ForgeError::AuthFailed("Invalid or expired token".into()),
            StatusCode::FORBIDDEN => ForgeError::AuthFailed(format!("Permission denied: {}", message)),
            StatusCode::NOT_FOUND => ForgeError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => ForgeError::RateLimited,
            _ => ForgeError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

#[async_trait]
impl Forge for GitHubForge {
    fn name(&self) -> &'static str {
        "github"
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    async fn fetch_repository(
        &self,
        owner: &str,
        repo: &str,
        icon: Option<&str>,
    ) -> Result<RepoRecord, ForgeError> {
        let repo_url = format!("{}/repos/{}/{}", self.api_base, owner, repo);
        let gh_repo: GitHubRepo = self.get_json(&repo_url).await?;

        let commits_url = format!("{}/commits?sha={}", repo_url, gh_repo.default_branch);
        let commits: Vec<GitHubCommit> = self.get_json(&commits_url).await?;

        // Latest commit author date wins; the repository's last-push
        // timestamp is the fallback when the branch has no listed commits.
        let last_activity = commits
            .first()
            .and_then(|c| c.commit.author.as_ref())
            .map(|a| a.date.clone())
            .unwrap_or_else(|| gh_repo.pushed_at.clone().unwrap_or_default());

        let license = match gh_repo.license.and_then(|l| l.spdx_id) {
            Some(id) if !id.is_empty() => id,
            _ => "UNLICENSED".to_string(),
        };

        let icon_url = icon
            .map(|path| icon_url(&self.cdn_base, owner, repo, &gh_repo.default_branch, path))
            .unwrap_or_default();

        Ok(RepoRecord {
            url: gh_repo.html_url,
            full_title: gh_repo.full_name,
            description: gh_repo.description.unwrap_or_default(),
            language: gh_repo.language.unwrap_or_default(),
            license,
            last_activity,
            topics: gh_repo.topics.into_iter().collect(),
            stars: gh_repo.stargazers_count,
            forks: gh_repo.forks_count,
            open_issues: gh_repo.open_issues_count,
            icon_url,
            forge_domain: self.domain.clone(),
            forge_emoji: self.emoji.clone(),
        })
    }
}

/// Resolve an icon path against GitHub's raw-content convention.
///
/// The template is `{cdn}{owner}/{repo}/{default_branch}/{icon_path}` and
/// must be reproduced exactly; it encodes the forge's raw-content URL
/// layout.
pub(crate) fn icon_url(cdn: &str, owner: &str, repo: &str, branch: &str, path: &str) -> String {
    format!("{}{}/{}/{}/{}", cdn, owner, repo, branch, path)
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// GitHub repository response format (the subset we consume).
#[derive(Deserialize)]
struct GitHubRepo {
    html_url: String,
    full_name: String,
    description: Option<String>,
    language: Option<String>,
    license: Option<GitHubLicense>,
    pushed_at: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    stargazers_count: u64,
    forks_count: u64,
    open_issues_count: u64,
    default_branch: String,
}

/// GitHub license info.
#[derive(Deserialize)]
struct GitHubLicense {
    spdx_id: Option<String>,
}

/// GitHub commit list item.
#[derive(Deserialize)]
struct GitHubCommit {
    commit: GitHubCommitDetail,
}

/// Git-level commit detail.
#[derive(Deserialize)]
struct GitHubCommitDetail {
    author: Option<GitHubCommitSignature>,
}

/// Git-level author signature.
#[derive(Deserialize)]
struct GitHubCommitSignature {
    date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ForgeConfig {
        ForgeConfig {
            domain: "github.com".to_string(),
            kind: "github".to_string(),
            api: "https://api.github.com".to_string(),
            cdn: "https://raw.githubusercontent.com/".to_string(),
            emoji: "🐙".to_string(),
        }
    }

    #[test]
    fn new_creates_forge() {
        let forge = GitHubForge::new(&test_config(), Some("token".into())).unwrap();
        assert_eq!(forge.name(), "github");
        assert_eq!(forge.domain(), "github.com");
    }

    #[test]
    fn api_base_trailing_slash_is_trimmed() {
        let mut config = test_config();
        config.api = "https://api.github.com/".to_string();
        let forge = GitHubForge::new(&config, None).unwrap();
        assert_eq!(forge.api_base, "https://api.github.com");
    }

    #[test]
    fn icon_url_matches_raw_content_convention() {
        assert_eq!(
            icon_url("https://raw.githubusercontent.com/", "a", "b", "main", "icon.png"),
            "https://raw.githubusercontent.com/a/b/main/icon.png"
        );
    }

    #[test]
    fn headers_without_token_omit_authorization() {
        let forge = GitHubForge::new(&test_config(), None).unwrap();
        let headers = forge.headers().unwrap();
        assert!(!headers.contains_key(AUTHORIZATION));
        assert_eq!(
            headers.get(ACCEPT).unwrap(),
            "application/vnd.github+json"
        );
    }

    #[test]
    fn headers_with_token_use_bearer_scheme() {
        let forge = GitHubForge::new(&test_config(), Some("ghp_abc".into())).unwrap();
        let headers = forge.headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer ghp_abc");
    }

    #[test]
    fn debug_redacts_token() {
        let forge = GitHubForge::new(&test_config(), Some("secret_token_abc123".into())).unwrap();
        let debug_output = format!("{:?}", forge);
        assert!(!debug_output.contains("secret_token_abc123"));
        assert!(debug_output.contains("has_token"));
    }
}
