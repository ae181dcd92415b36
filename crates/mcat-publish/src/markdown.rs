//! Markdown reference renderer
//!
//! Produces one section per component with a table of its metrics. Labels are
//! rendered as nested HTML lists so a table cell can hold them.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use mcat_catalog::{Catalog, Label, Row};

use crate::error::PublishError;
use crate::store::replace_file;

const TABLE_HEADER: &str = "| Metric name | Type | Units | Labels | Introduced in version |\n|---|---|---|---|---|\n";

/// Rendering options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Help-text words rendered as inline code
    pub escape_words: BTreeSet<String>,
}

impl RenderOptions {
    /// Create empty options
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With escape words
    #[must_use]
    pub fn with_escape_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.escape_words.extend(words.into_iter().map(Into::into).filter(|w: &String| !w.is_empty()));
        self
    }

    /// Parse an escape-words list: comma or newline separated, blanks ignored
    #[must_use]
    pub fn parse_escape_words(text: &str) -> BTreeSet<String> {
        text.split(['\n', ','])
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Load escape words from a file
    ///
    /// # Errors
    /// Returns `PublishError::Io` if the file cannot be read.
    pub async fn load_escape_words(path: &Path) -> Result<BTreeSet<String>, PublishError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PublishError::io_error(path, e))?;
        Ok(Self::parse_escape_words(&text))
    }
}

/// Renders catalogs as Markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create renderer
    #[inline]
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render the catalog with an explicit timestamp
    #[must_use]
    pub fn render(&self, catalog: &Catalog, updated: DateTime<Utc>) -> String {
        let mut out = String::new();
        out.push_str("## Metrics list\n");
        let _ = writeln!(out, "Last updated: {}", updated.to_rfc3339_opts(SecondsFormat::Secs, true));
        let _ = write!(out, "Version: {}\n\n", catalog.version);

        for component in &catalog.components {
            let _ = write!(out, "### {}\n\n{}\n\n", component.title, component.description);
            out.push_str(TABLE_HEADER);
            for row in &component.rows {
                self.render_row(&mut out, row);
            }
            out.push('\n');
        }
        out
    }

    /// Render and write to `path` with backup and atomic replace
    ///
    /// # Errors
    /// Returns `PublishError::Io` if the file cannot be replaced.
    pub async fn write(&self, path: &Path, catalog: &Catalog, updated: DateTime<Utc>) -> Result<(), PublishError> {
        let document = self.render(catalog, updated);
        replace_file(path, document.as_bytes()).await?;
        tracing::info!(path = %path.display(), components = catalog.components.len(), "Rendered Markdown");
        Ok(())
    }

    fn render_row(&self, out: &mut String, row: &Row) {
        let unit = if row.unit.is_empty() {
            String::new()
        } else {
            format!("`{}`", row.unit)
        };
        let _ = writeln!(
            out,
            "| `{}`: <br> {} | `{}` | {} | {} | {} |",
            row.name,
            self.format_help(&row.help),
            row.kind,
            unit,
            label_list(&row.labels),
            row.since,
        );
    }

    /// Wrap escape words in backticks, keeping the original spacing
    ///
    /// Pipes and newlines would end the table cell, so they are escaped.
    fn format_help(&self, help: &str) -> String {
        help.split(' ')
            .map(|word| {
                if self.options.escape_words.contains(word) {
                    format!("`{word}`")
                } else {
                    word.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
            .replace('|', "\\|")
            .replace('\n', "<br>")
    }
}

fn label_list(labels: &[Label]) -> String {
    if labels.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&Label> = labels.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut out = String::from("<ul>");
    for label in sorted {
        let _ = write!(out, "<li>`{}`", label.name);
        if !label.description.is_empty() {
            let _ = write!(out, " ({})", label.description);
        }
        if !label.values.is_empty() {
            let mut values: Vec<_> = label.values.iter().collect();
            values.sort_by(|a, b| a.value.cmp(&b.value));

            out.push_str("<ul>");
            for value in values {
                let _ = write!(out, "<li>`{}`", value.value);
                if !value.description.is_empty() {
                    let _ = write!(out, " ({})", value.description);
                }
                out.push_str("</li>");
            }
            out.push_str("</ul>");
        }
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}
