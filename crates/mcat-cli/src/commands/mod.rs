//! Subcommand implementations
//!
//! Each command exposes `run` (returns its result, used by tests) and
//! `execute` (runs and prints).

pub mod inspect;
pub mod render;
pub mod sync;

use anyhow::{Context, Result};
use clap::Args;
use mcat_catalog::Catalog;
use mcat_exposition::MetricSource;
use mcat_sync::Normalizer;

use crate::config::CliConfig;

/// Flags shaping the observed catalog
#[derive(Debug, Clone, Default, Args)]
pub struct ObserveArgs {
    /// Label recorded without values (repeatable or comma-separated)
    #[arg(long = "unfixed-label", env = "IGNORE_LABELS", value_delimiter = ',')]
    pub unfixed_labels: Vec<String>,

    /// Underscore-delimited name segments forming a component key
    #[arg(long)]
    pub prefix_segments: Option<usize>,

    /// Provenance tag stamped on newly observed metrics
    #[arg(long)]
    pub since: Option<String>,

    /// HTTP fetch timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ObserveArgs {
    /// Override configuration with the flags that were given
    pub fn apply(&self, config: &mut CliConfig) {
        let unfixed: Vec<String> = self
            .unfixed_labels
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        if !unfixed.is_empty() {
            config.sync.unfixed_labels = unfixed;
        }
        if let Some(segments) = self.prefix_segments {
            config.sync.prefix_segments = segments;
        }
        if let Some(since) = &self.since {
            config.sync.since = Some(since.clone());
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
    }
}

/// Fetch, decode and normalize a snapshot
pub(crate) async fn observe(location: &str, config: &CliConfig) -> Result<Catalog> {
    let source = MetricSource::parse(location).with_timeout(config.timeout());
    let families = source
        .families()
        .await
        .with_context(|| format!("failed to read metrics from {location}"))?;
    Ok(Normalizer::from_config(&config.sync).normalize(&families))
}
