//! cli
//!
//! Command-line interface layer for Forgefolio.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and environment fallbacks
//! - Initialize structured logging on stderr
//! - Read and decode the forge and project configuration files
//! - Run the report pipeline and write the markdown to stdout
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, decodes
//! configuration via [`crate::config`], and delegates the actual work to
//! [`crate::report::generate_report`]. Logs go to stderr so the markdown on
//! stdout stays clean for redirection.

pub mod args;

pub use args::Cli;

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config;
use crate::report;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`. Any error aborts the
/// run with a non-zero exit; no partial markdown is emitted.
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_new(&cli.verbosity)
        .with_context(|| format!("invalid verbosity '{}'", cli.verbosity))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(file = %cli.forges.display(), "reading forge configuration");
    let forges = config::load_forges(&cli.forges)?;

    let secrets: HashMap<String, String> = match cli.tokens.as_deref() {
        Some(tokens) if !tokens.is_empty() => {
            info!("parsing forge tokens");
            config::parse_tokens(tokens)?
        }
        _ => HashMap::new(),
    };

    info!(file = %cli.projects.display(), "reading projects file");
    let categories = config::load_projects(&cli.projects)?;

    info!("fetching projects");
    let markdown = report::generate_report(&forges, &secrets, &categories, &cli.user).await?;
    debug!(bytes = markdown.len(), "fetched and rendered all projects");

    print!("{}", markdown);

    Ok(())
}
