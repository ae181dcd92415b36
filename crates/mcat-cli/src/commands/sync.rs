//! Sync command - observe a snapshot and reconcile it into the catalog.

use std::fmt;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use mcat_publish::{CatalogStore, MarkdownRenderer};
use mcat_sync::{Reconciler, SyncReport, TailPolicy};
use serde::Serialize;

use super::{observe, ObserveArgs};
use crate::config::CliConfig;

/// Arguments for the sync command
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Metrics endpoint URL, file path, `file://` URL, or `-` for stdin
    pub source: String,

    /// Persisted YAML catalog
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Markdown output
    #[arg(long)]
    pub markdown: Option<PathBuf>,

    /// File of help-text words rendered as inline code
    #[arg(long)]
    pub escape_words_file: Option<PathBuf>,

    /// Version written into the catalog
    #[arg(long)]
    pub catalog_version: Option<String>,

    /// Drop new entries sorting after the last persisted key
    #[arg(long)]
    pub legacy_tail: bool,

    /// Reconcile and report without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub observe: ObserveArgs,
}

impl SyncArgs {
    /// Override configuration with the flags that were given
    pub fn apply(&self, config: &mut CliConfig) {
        self.observe.apply(config);
        if let Some(catalog) = &self.catalog {
            config.catalog.clone_from(catalog);
        }
        if let Some(markdown) = &self.markdown {
            config.markdown = Some(markdown.clone());
        }
        if let Some(file) = &self.escape_words_file {
            config.escape_words_file = Some(file.clone());
        }
        if let Some(version) = &self.catalog_version {
            config.catalog_version = Some(version.clone());
        }
        if self.legacy_tail {
            config.sync.tail_policy = TailPolicy::Truncate;
        }
    }
}

/// Outcome of one sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Snapshot location
    pub source: String,
    /// Catalog path
    pub catalog: PathBuf,
    /// Markdown path, when rendered
    pub markdown: Option<PathBuf>,
    /// Nothing was written
    pub dry_run: bool,
    /// Catalog differs from the loaded one
    pub changed: bool,
    /// Catalog version after the run
    pub version: String,
    /// Components after the run
    pub components: usize,
    /// Metrics after the run
    pub metrics: usize,
    /// Per-level merge statistics
    pub report: SyncReport,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "Would update" } else { "Updated" };
        let state = if self.changed { "" } else { " (unchanged)" };
        writeln!(f, "{verb} {}{state} from {}", self.catalog.display(), self.source)?;
        writeln!(f, "  version: {}", self.version)?;
        writeln!(f, "  {} components, {} metrics", self.components, self.metrics)?;
        write!(f, "  {}", self.report)?;
        if let Some(markdown) = &self.markdown {
            write!(f, "\n  markdown: {}", markdown.display())?;
        }
        Ok(())
    }
}

/// Run the sync pipeline
///
/// # Errors
/// Returns an error if fetching, loading, storing or rendering fails. The
/// catalog file is only replaced after reconciliation succeeded.
pub async fn run(args: &SyncArgs, mut config: CliConfig) -> Result<RunSummary> {
    args.apply(&mut config);

    let observed = observe(&args.source, &config).await?;
    let store = CatalogStore::new(&config.catalog);
    let current = store
        .load()
        .await
        .with_context(|| format!("failed to load catalog {}", config.catalog.display()))?;
    let before = current.clone();

    let (mut catalog, report) = Reconciler::from_config(&config.sync).reconcile_with_report(current, observed);
    if let Some(version) = &config.catalog_version {
        catalog.version.clone_from(version);
    }
    let changed = catalog != before;

    if !args.dry_run {
        // Escape words are read before anything is written
        let renderer = match &config.markdown {
            Some(markdown) => Some((markdown, MarkdownRenderer::new(config.render_options().await?))),
            None => None,
        };
        store.store(&catalog).await.context("failed to store catalog")?;
        if let Some((markdown, renderer)) = renderer {
            renderer
                .write(markdown, &catalog, Utc::now())
                .await
                .context("failed to write Markdown")?;
        }
    }

    tracing::info!(changed, dry_run = args.dry_run, %report, "Sync finished");
    Ok(RunSummary {
        source: args.source.clone(),
        catalog: config.catalog,
        markdown: config.markdown,
        dry_run: args.dry_run,
        changed,
        version: catalog.version.clone(),
        components: catalog.components.len(),
        metrics: catalog.row_count(),
        report,
    })
}

/// Execute the sync command
///
/// # Errors
/// See [`run`].
pub async fn execute(args: SyncArgs, config: CliConfig) -> Result<()> {
    let summary = run(&args, config).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}
