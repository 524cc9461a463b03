//! Forgefolio - a CLI that renders a markdown project showcase from forge APIs
//!
//! Forgefolio queries one or more code-hosting forges (GitHub-compatible and
//! Forgejo-compatible APIs) for repository metadata, normalizes the
//! heterogeneous responses into one record shape, and renders them as a
//! sorted, paginated markdown fragment for embedding in a profile page.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, loads config, prints)
//! - [`config`] - Decoded configuration types (forge list, project list, tokens)
//! - [`forge`] - Abstraction for remote forges (GitHub, Forgejo)
//! - [`report`] - Aggregation of normalized records and markdown rendering
//!
//! # Correctness Invariants
//!
//! Forgefolio maintains the following invariants:
//!
//! 1. Output is deterministic given deterministic forge responses
//! 2. Any fetch or render error aborts the run; no partial markdown is emitted
//! 3. Free-text forge content is HTML-escaped before it reaches the output

pub mod cli;
pub mod config;
pub mod forge;
pub mod report;
