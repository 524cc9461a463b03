//! report
//!
//! Aggregation of normalized repository records and markdown rendering.
//!
//! # Architecture
//!
//! - [`aggregate`]: resolves `domain/owner/repo` references through the
//!   [`ForgeRegistry`](crate::forge::ForgeRegistry) and produces ordered
//!   [`OutputCategory`] values of normalized records.
//! - [`render`]: turns those records into the final markdown fragment
//!   (per-category sorting, two-column pagination, title shortening,
//!   field-conditional formatting, HTML escaping).
//!
//! The whole pipeline is fail-fast: any error aborts the run and no partial
//! markdown is emitted. A stale-but-complete previous report is preferable
//! to a silently incomplete one.

pub mod aggregate;
pub mod render;

pub use aggregate::{split_reference, OutputCategory, ProjectAggregator};
pub use render::{display_title, escape_html, render};

use std::collections::HashMap;
use thiserror::Error;

use crate::config::{ForgeConfig, InputCategory};
use crate::forge::{ForgeError, ForgeRegistry};

/// Errors from the aggregation and rendering pipeline.
///
/// Every variant carries enough context (domain, owner, repo, offending
/// value) to diagnose the failure without re-running at higher verbosity.
#[derive(Debug, Error)]
pub enum ReportError {
    /// An input project reference does not decompose into exactly three
    /// non-empty path segments.
    #[error("malformed project reference '{0}': expected domain/owner/repo")]
    MalformedReference(String),

    /// A reference names a domain absent from the forge configuration.
    #[error("unknown forge domain '{0}': not present in forge configuration")]
    UnknownDomain(String),

    /// The forge registry could not be built from configuration.
    #[error("failed to build forge registry: {0}")]
    Registry(#[from] ForgeError),

    /// A backend fetch failed; propagated unchanged, with the reference
    /// attached for diagnosis.
    #[error("failed to fetch {domain}/{owner}/{repo}: {source}")]
    Fetch {
        /// Forge domain of the failing reference
        domain: String,
        /// Repository owner
        owner: String,
        /// Repository name
        repo: String,
        /// Underlying backend error
        #[source]
        source: ForgeError,
    },

    /// A stored activity timestamp failed to parse during rendering.
    #[error("malformed activity date '{value}' for {title}: {source}")]
    MalformedDate {
        /// The unparseable timestamp
        value: String,
        /// Full title of the affected project
        title: String,
        /// Underlying parse error
        #[source]
        source: chrono::ParseError,
    },
}

/// Generate the complete markdown report.
///
/// Pure composition of registry construction, aggregation, and rendering;
/// deterministic given deterministic backend responses.
///
/// # Arguments
///
/// * `forges` - Decoded forge configurations, one per domain
/// * `secrets` - Token map keyed by domain; missing entries mean
///   unauthenticated access
/// * `categories` - Ordered input categories of project references
/// * `current_user` - Username omitted from displayed titles
pub async fn generate_report(
    forges: &[ForgeConfig],
    secrets: &HashMap<String, String>,
    categories: &[InputCategory],
    current_user: &str,
) -> Result<String, ReportError> {
    let registry = ForgeRegistry::open(forges, secrets)?;
    let aggregator = ProjectAggregator::new(&registry);
    let output = aggregator.fetch_projects(categories).await?;
    render(&output, current_user)
}
