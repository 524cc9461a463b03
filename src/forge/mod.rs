//! forge
//!
//! Abstraction for remote forges (GitHub-compatible, Forgejo-compatible).
//!
//! # Architecture
//!
//! The `Forge` trait defines the interface for fetching repository metadata
//! from remote hosting services. Callers resolve clients through the
//! [`ForgeRegistry`] rather than importing specific forge implementations
//! directly; the backend variant is selected once per configured domain at
//! registry-construction time.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait, [`RepoRecord`], and [`ForgeError`]
//! - [`github`]: GitHub-compatible implementation (REST API)
//! - [`forgejo`]: Forgejo-compatible implementation (Gitea-style REST API)
//! - [`registry`]: Domain-to-client map built from configuration + secrets
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use forgefolio::forge::ForgeRegistry;
//!
//! let registry = ForgeRegistry::open(&forges, &secrets)?;
//! let forge = registry.resolve("github.com").expect("configured domain");
//! let record = forge.fetch_repository("alice", "example", None).await?;
//! ```

pub mod forgejo;
pub mod github;
pub mod mock;
pub mod registry;
mod traits;

pub use registry::{ForgeKind, ForgeRegistry};
pub use traits::*;

use std::time::Duration;

/// Per-request timeout applied to every backend HTTP client.
///
/// Timeouts surface as [`ForgeError::NetworkError`].
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
