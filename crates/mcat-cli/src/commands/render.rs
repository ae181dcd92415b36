//! Render command - write the catalog as Markdown.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use mcat_publish::{CatalogStore, MarkdownRenderer};

use crate::config::CliConfig;

/// Arguments for the render command
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Persisted YAML catalog
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Markdown output
    #[arg(long)]
    pub markdown: Option<PathBuf>,

    /// File of help-text words rendered as inline code
    #[arg(long)]
    pub escape_words_file: Option<PathBuf>,
}

/// Render the catalog, returning the Markdown path
///
/// # Errors
/// Returns an error if no Markdown path is configured, or loading or
/// writing fails.
pub async fn run(args: &RenderArgs, mut config: CliConfig) -> Result<PathBuf> {
    if let Some(catalog) = &args.catalog {
        config.catalog.clone_from(catalog);
    }
    if let Some(file) = &args.escape_words_file {
        config.escape_words_file = Some(file.clone());
    }
    let markdown = args
        .markdown
        .clone()
        .or_else(|| config.markdown.clone())
        .context("no Markdown output; pass --markdown or set `markdown` in the config")?;

    let catalog = CatalogStore::new(&config.catalog)
        .load()
        .await
        .with_context(|| format!("failed to load catalog {}", config.catalog.display()))?;
    let options = config.render_options().await?;
    MarkdownRenderer::new(options)
        .write(&markdown, &catalog, Utc::now())
        .await
        .context("failed to write Markdown")?;
    Ok(markdown)
}

/// Execute the render command
///
/// # Errors
/// See [`run`].
pub async fn execute(args: RenderArgs, config: CliConfig) -> Result<()> {
    let markdown = run(&args, config).await?;
    println!("Rendered {}", markdown.display());
    Ok(())
}
