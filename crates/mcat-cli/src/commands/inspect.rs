//! Inspect command - print the observed catalog for a snapshot.

use anyhow::Result;
use clap::Args;
use mcat_catalog::Catalog;

use super::{observe, ObserveArgs};
use crate::config::CliConfig;

/// Arguments for the inspect command
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Metrics endpoint URL, file path, `file://` URL, or `-` for stdin
    pub source: String,

    #[command(flatten)]
    pub observe: ObserveArgs,
}

/// Observe the snapshot without touching any file
///
/// # Errors
/// Returns an error if the snapshot cannot be fetched or decoded.
pub async fn run(args: &InspectArgs, mut config: CliConfig) -> Result<Catalog> {
    args.observe.apply(&mut config);
    observe(&args.source, &config).await
}

/// Execute the inspect command
///
/// # Errors
/// See [`run`].
pub async fn execute(args: InspectArgs, config: CliConfig) -> Result<()> {
    let catalog = run(&args, config).await?;
    print!("{}", catalog.to_yaml()?);
    Ok(())
}
