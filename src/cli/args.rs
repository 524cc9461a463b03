//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Environment Fallbacks
//!
//! Two flags can also come from the environment, for use in CI where
//! secrets must not appear in the process arguments:
//! - `--tokens` falls back to `FORGE_TOKENS`
//! - `--user` falls back to `FORGE_USER`

use clap::Parser;
use std::path::PathBuf;

/// Forgefolio - renders a markdown project showcase from forge APIs
#[derive(Parser, Debug)]
#[command(name = "forgefolio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub verbosity: String,

    /// Projects configuration file
    #[arg(long, default_value = "projects.yaml")]
    pub projects: PathBuf,

    /// Forges configuration file
    #[arg(long, default_value = "forges.yaml")]
    pub forges: PathBuf,

    /// Forge tokens as a JSON object, e.g. {"github.com": "token"}
    #[arg(long, env = "FORGE_TOKENS", hide_env_values = true)]
    pub tokens: Option<String>,

    /// Username to omit from displayed project titles
    #[arg(long, env = "FORGE_USER", default_value = "pojntfx")]
    pub user: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
