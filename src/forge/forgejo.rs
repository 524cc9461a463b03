//! forge::forgejo
//!
//! Forgejo-compatible forge implementation using the Gitea-style REST API.
//!
//! # Design
//!
//! One [`ForgejoForge`] wraps one configured domain. A fetch performs, in
//! order: get repository metadata, list the first page of commits on the
//! default branch, then list per-language byte counts. The third call exists
//! because this backend does not provide a ready primary-language field.
//!
//! # Normalization
//!
//! - `language` is derived from the byte-count map: the language with the
//!   maximum byte count wins, ties broken by lexicographically smallest
//!   name so output stays reproducible across runs.
//! - `license` is always empty: this backend does not expose license data,
//!   and we never fabricate a value.
//! - `last_activity` is the author date of the newest commit on the default
//!   branch, falling back to the repository's `updated_at` timestamp when no
//!   commit is returned.
//! - Icon URLs follow Forgejo's raw-content convention:
//!   `{cdn}{owner}/{repo}/raw/branch/{default_branch}/{icon_path}`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;

use super::traits::{Forge, ForgeError, RepoRecord};
use crate::config::ForgeConfig;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "forgefolio-cli";

/// Forgejo-compatible forge implementation.
///
/// Construction happens once at registry-construction time; the HTTP client,
/// token, and endpoints are fixed for the life of the registry.
pub struct ForgejoForge {
    /// HTTP client for making requests
    client: Client,
    /// Access token; `None` means unauthenticated
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
impl std::fmt::Debug for ForgejoForge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForgejoForge")
            .field("has_token", &self.token.is_some())
            .field("domain", &self.domain)
            .field("api_base", &self.api_base)
            .field("cdn_base", &self.cdn_base)
            .finish()
    }
}

impl ForgejoForge {
    /// Create a new Forgejo forge from its configuration and optional token.
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
    ///
    /// Forgejo uses the `token` authorization scheme rather than `Bearer`.
    fn headers(&self) -> Result<HeaderMap, ForgeError> {
        let mut headers = HeaderMap::new();
        if let Some(ref token) = self.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("token {}", token))
                    .map_err(|_| ForgeError::AuthFailed("invalid token format".into()))?,
            );
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
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
        let message = match response.json::<ForgejoErrorResponse>().await {
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
impl Forge for ForgejoForge {
    fn name(&self) -> &'static str {
        "forgejo"
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
        let fj_repo: ForgejoRepo = self.get_json(&repo_url).await?;

        let commits_url = format!("{}/commits?sha={}", repo_url, fj_repo.default_branch);
        let commits: Vec<ForgejoCommit> = self.get_json(&commits_url).await?;

        let languages_url = format!("{}/languages", repo_url);
        let languages: BTreeMap<String, u64> = self.get_json(&languages_url).await?;

        let last_activity = commits
            .first()
            .and_then(|c| c.commit.author.as_ref())
            .map(|a| a.date.clone())
            .unwrap_or_else(|| fj_repo.updated_at.clone().unwrap_or_default());

        let icon_url = icon
            .map(|path| icon_url(&self.cdn_base, owner, repo, &fj_repo.default_branch, path))
            .unwrap_or_default();

        Ok(RepoRecord {
            url: fj_repo.html_url,
            full_title: fj_repo.full_name,
            description: fj_repo.description.unwrap_or_default(),
            language: primary_language(&languages),
            // This backend does not expose license data
            license: String::new(),
            last_activity,
            topics: Default::default(),
            stars: fj_repo.stars_count,
            forks: fj_repo.forks_count,
            open_issues: fj_repo.open_issues_count,
            icon_url,
            forge_domain: self.domain.clone(),
            forge_emoji: self.emoji.clone(),
        })
    }
}

/// Resolve an icon path against Forgejo's raw-content convention.
///
/// The template is `{cdn}{owner}/{repo}/raw/branch/{default_branch}/{icon_path}`
/// and must be reproduced exactly; it encodes the forge's raw-content URL
/// layout.
pub(crate) fn icon_url(cdn: &str, owner: &str, repo: &str, branch: &str, path: &str) -> String {
    format!("{}{}/{}/raw/branch/{}/{}", cdn, owner, repo, branch, path)
}

/// Derive the primary language from a per-language byte-count map.
///
/// The language with the maximum byte count wins. Iteration is over a
/// `BTreeMap` in ascending name order and only a strictly greater count
/// replaces the current winner, so ties resolve to the lexicographically
/// smallest name.
fn primary_language(languages: &BTreeMap<String, u64>) -> String {
    let mut primary = String::new();
    let mut max_bytes = 0u64;
    for (language, bytes) in languages {
        if *bytes > max_bytes {
            max_bytes = *bytes;
            primary = language.clone();
        }
    }
    primary
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// Forgejo error response format.
#[derive(Deserialize)]
struct ForgejoErrorResponse {
    message: String,
}

/// Forgejo repository response format (the subset we consume).
#[derive(Deserialize)]
struct ForgejoRepo {
    html_url: String,
    full_name: String,
    description: Option<String>,
    updated_at: Option<String>,
    stars_count: u64,
    forks_count: u64,
    open_issues_count: u64,
    default_branch: String,
}

/// Forgejo commit list item.
#[derive(Deserialize)]
struct ForgejoCommit {
    commit: ForgejoCommitDetail,
}

/// Git-level commit detail.
#[derive(Deserialize)]
struct ForgejoCommitDetail {
    author: Option<ForgejoCommitSignature>,
}

/// Git-level author signature.
#[derive(Deserialize)]
struct ForgejoCommitSignature {
    date: String,
}
