//! # mcat-cli
//!
//! Command-line interface for the metrics catalog.
//!
//! ## Commands
//!
//! - `mcat sync <source>` - Observe a snapshot and reconcile it into the catalog
//! - `mcat render` - Render an existing catalog as Markdown
//! - `mcat inspect <source>` - Print the observed catalog without touching files
//!
//! ## Configuration
//!
//! Settings come from `--config <file>` (TOML, see [`CliConfig`]), the
//! `IGNORE_LABELS` environment variable and flags, in increasing precedence.

#![warn(missing_docs)]
#![warn(unreachable_pub)]
// CLI prints command output on stdout
#![allow(clippy::print_stdout)]

pub mod commands;
pub mod config;
pub mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use config::{CliConfig, ConfigError};
pub use logging::{init_logging, LogFormat};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// mcat - curated metrics catalog synchronization
#[derive(Debug, Parser)]
#[command(name = "mcat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging (overrides `RUST_LOG`)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log format selected by flags
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reconcile a metrics snapshot into the catalog
    Sync(commands::sync::SyncArgs),
    /// Render the catalog as Markdown
    Render(commands::render::RenderArgs),
    /// Print the observed catalog for a snapshot
    Inspect(commands::inspect::InspectArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["mcat", "inspect", "metrics.txt", "--verbose", "--log-json", "--config", "mcat.toml"]);

        assert!(cli.verbose);
        assert_eq!(cli.log_format(), LogFormat::Json);
        assert_eq!(cli.config, Some(PathBuf::from("mcat.toml")));
        assert!(matches!(cli.command, Commands::Inspect(_)));
    }

    #[test]
    fn defaults_to_text_logs() {
        let cli = Cli::parse_from(["mcat", "render"]);
        assert!(!cli.verbose);
        assert_eq!(cli.log_format(), LogFormat::Text);
    }
}
