//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge provides a deterministic implementation of the `Forge`
//! trait for use in tests. It serves canned repository records from memory
//! and allows configuring failure scenarios.
//!
//! # Example
//!
//! ```
//! use forgefolio::forge::mock::MockForge;
//! use forgefolio::forge::{Forge, RepoRecord};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new("mock.example.com", "🔨");
//! forge.insert_record(
//!     "alice",
//!     "example",
//!     RepoRecord {
//!         full_title: "alice/example".to_string(),
//!         stars: 42,
//!         ..Default::default()
//!     },
//! );
//!
//! let record = forge.fetch_repository("alice", "example", None).await.unwrap();
//! assert_eq!(record.stars, 42);
//! assert_eq!(record.forge_domain, "mock.example.com");
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{Forge, ForgeError, RepoRecord};

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockForge {
    /// Domain this mock answers for.
    domain: String,
    /// Emoji stamped onto served records.
    emoji: String,
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// Canned records keyed by `(owner, repo)`.
    records: HashMap<(String, String), RepoRecord>,
    /// Error to return on the next fetch, if configured.
    fail_with: Option<ForgeError>,
    /// Recorded fetches for verification.
    fetches: Vec<MockFetch>,
}

/// Recorded fetch for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFetch {
    /// Requested owner.
    pub owner: String,
    /// Requested repository name.
    pub repo: String,
    /// Requested icon path, if any.
    pub icon: Option<String>,
}

impl MockForge {
    /// Create a new mock forge answering for `domain`.
    pub fn new(domain: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            emoji: emoji.into(),
            inner: Arc::new(Mutex::new(MockForgeInner::default())),
        }
    }

    /// Register a canned record for `owner/repo`.
    ///
    /// The record's `forge_domain` and `forge_emoji` are stamped by the mock
    /// when served, matching real backend behavior.
    pub fn insert_record(&self, owner: impl Into<String>, repo: impl Into<String>, record: RepoRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.records.insert((owner.into(), repo.into()), record);
    }

    /// Configure every subsequent fetch to fail with `error`.
    pub fn fail_with(&self, error: ForgeError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_with = Some(error);
    }

    /// Get the recorded fetches, in call order.
    pub fn fetches(&self) -> Vec<MockFetch> {
        self.inner.lock().unwrap().fetches.clone()
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
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
        let mut inner = self.inner.lock().unwrap();
        inner.fetches.push(MockFetch {
            owner: owner.to_string(),
            repo: repo.to_string(),
            icon: icon.map(|i| i.to_string()),
        });

        if let Some(ref error) = inner.fail_with {
            return Err(error.clone());
        }

        let mut record = inner
            .records
            .get(&(owner.to_string(), repo.to_string()))
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("{}/{}", owner, repo)))?;

        record.forge_domain = self.domain.clone();
        record.forge_emoji = self.emoji.clone();
        if let Some(path) = icon {
            record.icon_url = format!("https://{}/{}/{}/raw/{}", self.domain, owner, repo, path);
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(full_title: &str, stars: u64) -> RepoRecord {
        RepoRecord {
            full_title: full_title.to_string(),
            stars,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn serves_registered_records() {
        let forge = MockForge::new("mock.example.com", "🔨");
        forge.insert_record("alice", "example", record("alice/example", 10));

        let served = forge.fetch_repository("alice", "example", None).await.unwrap();
        assert_eq!(served.full_title, "alice/example");
        assert_eq!(served.stars, 10);
        assert_eq!(served.forge_domain, "mock.example.com");
        assert_eq!(served.forge_emoji, "🔨");
    }

    #[tokio::test]
    async fn unknown_repo_is_not_found() {
        let forge = MockForge::new("mock.example.com", "");
        let result = forge.fetch_repository("alice", "missing", None).await;
        assert!(matches!(result, Err(ForgeError::NotFound(_))));
    }

    #[tokio::test]
    async fn configured_failure_wins() {
        let forge = MockForge::new("mock.example.com", "");
        forge.insert_record("alice", "example", record("alice/example", 1));
        forge.fail_with(ForgeError::RateLimited);

        let result = forge.fetch_repository("alice", "example", None).await;
        assert!(matches!(result, Err(ForgeError::RateLimited)));
    }

    #[tokio::test]
    async fn records_fetches_in_order() {
        let forge = MockForge::new("mock.example.com", "");
        forge.insert_record("alice", "a", record("alice/a", 1));
        forge.insert_record("alice", "b", record("alice/b", 2));

        forge.fetch_repository("alice", "a", Some("icon.png")).await.unwrap();
        forge.fetch_repository("alice", "b", None).await.unwrap();

        let fetches = forge.fetches();
        assert_eq!(fetches.len(), 2);
        assert_eq!(fetches[0].repo, "a");
        assert_eq!(fetches[0].icon.as_deref(), Some("icon.png"));
        assert_eq!(fetches[1].repo, "b");
        assert_eq!(fetches[1].icon, None);
    }

    #[tokio::test]
    async fn icon_request_resolves_icon_url() {
        let forge = MockForge::new("mock.example.com", "");
        forge.insert_record("alice", "example", record("alice/example", 1));

        let served = forge
            .fetch_repository("alice", "example", Some("icon.png"))
            .await
            .unwrap();
        assert_eq!(
            served.icon_url,
            "https://mock.example.com/alice/example/raw/icon.png"
        );

        let plain = forge.fetch_repository("alice", "example", None).await.unwrap();
        assert!(plain.icon_url.is_empty());
    }
}
