//! report::aggregate
//!
//! Resolves ordered project references into ordered normalized records.
//!
//! # Design
//!
//! The aggregator consumes an ordered sequence of input categories, resolves
//! each `domain/owner/repo` reference through the read-only
//! [`ForgeRegistry`], and produces a parallel sequence of output categories.
//! Output category order mirrors input category order; within a category,
//! record order mirrors input project order. This predictable intermediate
//! ordering keeps fixtures deterministic even though the renderer later
//! re-sorts by star count.
//!
//! Fetches run sequentially and fail-fast: the first error aborts the whole
//! pass with the offending reference attached. Bounded parallel fetching
//! would fit behind the same contract (results re-assembled into input
//! order), but is not what this tool does today.

use tracing::debug;

use super::ReportError;
use crate::config::InputCategory;
use crate::forge::{ForgeRegistry, RepoRecord};

/// One rendered-order category of normalized records.
///
/// Created once per input category and populated incrementally as each
/// reference resolves; immutable after the aggregation pass completes. The
/// renderer sorts a copy, never this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputCategory {
    /// Category title, carried over from the input category
    pub title: String,
    /// Normalized records in input order
    pub projects: Vec<RepoRecord>,
}

/// Split a `domain/owner/repo` reference into its three segments.
///
/// # Errors
///
/// Returns `ReportError::MalformedReference` unless the reference decomposes
/// into exactly three non-empty path segments.
///
/// # Example
///
/// ```
/// use forgefolio::report::split_reference;
///
/// let (domain, owner, repo) = split_reference("github.com/alice/example").unwrap();
/// assert_eq!(domain, "github.com");
/// assert_eq!(owner, "alice");
/// assert_eq!(repo, "example");
/// ```
pub fn split_reference(reference: &str) -> Result<(&str, &str, &str), ReportError> {
    let mut parts = reference.split('/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(domain), Some(owner), Some(repo), None)
            if !domain.is_empty() && !owner.is_empty() && !repo.is_empty() =>
        {
            Ok((domain, owner, repo))
        }
        _ => Err(ReportError::MalformedReference(reference.to_string())),
    }
}

/// Resolves project references into normalized records via the registry.
pub struct ProjectAggregator<'a> {
    registry: &'a ForgeRegistry,
}

impl<'a> ProjectAggregator<'a> {
    /// Create an aggregator over a registry.
    pub fn new(registry: &'a ForgeRegistry) -> Self {
        Self { registry }
    }

    /// Fetch every referenced project, preserving input order.
    ///
    /// Multi-forge mode (more than one configured forge) keeps the forge
    /// emoji on each record so the renderer can prefix titles with it; with
    /// a single forge the emoji is cleared and titles stay unprefixed.
    ///
    /// # Errors
    ///
    /// - `MalformedReference` if a reference does not split into
    ///   `domain/owner/repo`
    /// - `UnknownDomain` if a reference names an unconfigured domain
    /// - `Fetch` wrapping any backend error, unchanged and without retry
    pub async fn fetch_projects(
        &self,
        categories: &[InputCategory],
    ) -> Result<Vec<OutputCategory>, ReportError> {
        let multi_forge = self.registry.len() > 1;

        let mut output = Vec::with_capacity(categories.len());
        for category in categories {
            debug!(title = %category.title, projects = category.projects.len(), "fetching category");

            let mut projects = Vec::with_capacity(category.projects.len());
            for project in &category.projects {
                let (domain, owner, repo) = split_reference(&project.repo)?;
                let forge = self
                    .registry
                    .resolve(domain)
                    .ok_or_else(|| ReportError::UnknownDomain(domain.to_string()))?;

                debug!(domain, owner, repo, "fetching repository");
                let mut record = forge
                    .fetch_repository(owner, repo, project.icon.as_deref())
                    .await
                    .map_err(|source| ReportError::Fetch {
                        domain: domain.to_string(),
                        owner: owner.to_string(),
                        repo: repo.to_string(),
                        source,
                    })?;

                if !multi_forge {
                    record.forge_emoji.clear();
                }
                projects.push(record);
            }

            output.push(OutputCategory {
                title: category.title.clone(),
                projects,
            });
        }

        Ok(output)
    }
}
