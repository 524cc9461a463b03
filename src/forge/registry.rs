//! forge::registry
//!
//! Forge selection and construction, keyed by domain.
//!
//! # Design
//!
//! This module provides the central location for forge selection logic.
//! Callers use [`ForgeRegistry::open`] and [`ForgeRegistry::resolve`] instead
//! of importing specific forge implementations, keeping the backend variant
//! a construction-time decision.
//!
//! Construction builds exactly one client per configured domain. The map is
//! a `BTreeMap`, so construction and iteration are deterministic given
//! deterministic input; output stays reproducible across runs with identical
//! forge data.
//!
//! # Policy
//!
//! Duplicate domains in the forge configuration are rejected, not
//! last-wins: a duplicate is a configuration error worth surfacing loudly.
//!
//! # Example
//!
//! ```ignore
//! use forgefolio::forge::ForgeRegistry;
//!
//! let registry = ForgeRegistry::open(&forges, &secrets)?;
//! if let Some(forge) = registry.resolve("github.com") {
//!     let record = forge.fetch_repository("alice", "example", None).await?;
//! }
//! ```

use std::collections::{BTreeMap, HashMap};

use super::forgejo::ForgejoForge;
use super::github::GitHubForge;
use super::traits::{Forge, ForgeError};
use crate::config::ForgeConfig;

/// Supported forge backend kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgeKind {
    /// GitHub-compatible API
    GitHub,
    /// Forgejo-compatible (Gitea-style) API
    Forgejo,
}

impl ForgeKind {
    /// Get all supported kinds.
    pub fn all() -> &'static [ForgeKind] {
        &[ForgeKind::GitHub, ForgeKind::Forgejo]
    }

    /// Get the kind name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ForgeKind::GitHub => "github",
            ForgeKind::Forgejo => "forgejo",
        }
    }

    /// Parse a kind from a configuration string.
    ///
    /// # Example
    ///
    /// ```
    /// use forgefolio::forge::ForgeKind;
    ///
    /// assert_eq!(ForgeKind::parse("github"), Some(ForgeKind::GitHub));
    /// assert_eq!(ForgeKind::parse("bitbucket"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "github" => Some(ForgeKind::GitHub),
            "forgejo" => Some(ForgeKind::Forgejo),
            _ => None,
        }
    }
}

impl std::fmt::Display for ForgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One forge client per configured domain, immutable after construction.
///
/// The registry is the only shared state across fetches and is read-only;
/// there is no ambient or global client lookup.
pub struct ForgeRegistry {
    forges: BTreeMap<String, Box<dyn Forge>>,
}

impl std::fmt::Debug for ForgeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForgeRegistry")
            .field("domains", &self.forges.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ForgeRegistry {
    /// Build one client per configured domain.
    ///
    /// A domain without a matching secret is queried unauthenticated.
    ///
    /// # Errors
    ///
    /// - `ForgeError::UnsupportedKind` if a configuration names a backend
    ///   kind with no implemented variant
    /// - `ForgeError::DuplicateDomain` if two configurations share a domain
    pub fn open(
        configs: &[ForgeConfig],
        secrets: &HashMap<String, String>,
    ) -> Result<Self, ForgeError> {
        let mut forges: BTreeMap<String, Box<dyn Forge>> = BTreeMap::new();

        for config in configs {
            let kind = ForgeKind::parse(&config.kind)
                .ok_or_else(|| ForgeError::UnsupportedKind(config.kind.clone()))?;
            let token = secrets.get(&config.domain).cloned();

            let forge: Box<dyn Forge> = match kind {
                ForgeKind::GitHub => Box::new(GitHubForge::new(config, token)?),
                ForgeKind::Forgejo => Box::new(ForgejoForge::new(config, token)?),
            };

            if forges.insert(config.domain.clone(), forge).is_some() {
                return Err(ForgeError::DuplicateDomain(config.domain.clone()));
            }
        }

        Ok(Self { forges })
    }

    /// Build a registry from pre-constructed clients, keyed by their domain.
    ///
    /// Used by tests to register mock forges behind the same resolution path
    /// the aggregator uses in production.
    pub fn from_clients(clients: Vec<Box<dyn Forge>>) -> Result<Self, ForgeError> {
        let mut forges: BTreeMap<String, Box<dyn Forge>> = BTreeMap::new();
        for client in clients {
            let domain = client.domain().to_string();
            if forges.insert(domain.clone(), client).is_some() {
                return Err(ForgeError::DuplicateDomain(domain));
            }
        }
        Ok(Self { forges })
    }

    /// Resolve a domain to its forge client.
    ///
    /// Returns `None` when the domain was not present in configuration; the
    /// aggregator surfaces that as its unknown-domain error with the
    /// offending reference attached.
    pub fn resolve(&self, domain: &str) -> Option<&dyn Forge> {
        self.forges.get(domain).map(|f| f.as_ref())
    }

    /// Number of configured forges.
    ///
    /// More than one means multi-forge mode: rendered titles carry the
    /// forge's emoji prefix.
    pub fn len(&self) -> usize {
        self.forges.len()
    }

    /// Whether no forge is configured.
    pub fn is_empty(&self) -> bool {
        self.forges.is_empty()
    }

    /// Configured domains, in deterministic (sorted) order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.forges.keys().map(|d| d.as_str())
    }
}
