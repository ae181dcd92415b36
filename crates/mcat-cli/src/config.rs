//! CLI configuration file
//!
//! Layered lowest to highest: built-in defaults, the TOML file given with
//! `--config`, the `IGNORE_LABELS` environment variable, then flags.
//!
//! ```toml
//! catalog = "docs/metrics.yaml"
//! markdown = "docs/metrics.md"
//! catalog_version = "3.2.0"
//! escape_words_file = ".escape_words.txt"
//!
//! [sync]
//! unfixed_labels = ["sandbox_id"]
//! tail_policy = "append-new"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use mcat_publish::{PublishError, RenderOptions};
use mcat_sync::SyncConfig;
use serde::{Deserialize, Serialize};

/// Default catalog path
pub const DEFAULT_CATALOG: &str = "metrics.yaml";

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors while loading the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File cannot be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid configuration TOML
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings for a CLI run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Persisted YAML catalog
    pub catalog: PathBuf,
    /// Rendered Markdown output, if any
    pub markdown: Option<PathBuf>,
    /// Version written into the catalog after sync
    pub catalog_version: Option<String>,
    /// Help-text words rendered as inline code
    pub escape_words: Vec<String>,
    /// File with more escape words
    pub escape_words_file: Option<PathBuf>,
    /// HTTP fetch timeout
    pub timeout_secs: u64,
    /// Engine settings
    pub sync: SyncConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog: PathBuf::from(DEFAULT_CATALOG),
            markdown: None,
            catalog_version: None,
            escape_words: Vec::new(),
            escape_words_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            sync: SyncConfig::default(),
        }
    }
}

impl CliConfig {
    /// Parse configuration TOML
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on invalid TOML or unknown keys.
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a file
    ///
    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read, or
    /// `ConfigError::Parse` if it is invalid.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(path, &text)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from `path` when given, else defaults
    ///
    /// # Errors
    /// Same as [`CliConfig::load`].
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }

    /// HTTP fetch timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Renderer options from the inline list and the escape-words file
    ///
    /// # Errors
    /// Returns `PublishError::Io` if the escape-words file cannot be read.
    pub async fn render_options(&self) -> Result<RenderOptions, PublishError> {
        let mut options = RenderOptions::new().with_escape_words(self.escape_words.iter().cloned());
        if let Some(path) = &self.escape_words_file {
            options = options.with_escape_words(RenderOptions::load_escape_words(path).await?);
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcat_sync::TailPolicy;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = CliConfig::from_toml(Path::new("mcat.toml"), "").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.catalog, PathBuf::from("metrics.yaml"));
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn full_file() {
        let text = r#"
catalog = "docs/metrics.yaml"
markdown = "docs/metrics.md"
catalog_version = "3.2.0"
escape_words = ["GC", "RSS"]
timeout_secs = 3

[sync]
unfixed_labels = ["sandbox_id"]
prefix_segments = 3
tail_policy = "truncate"
since = "3.2.0"
"#;
        let config = CliConfig::from_toml(Path::new("mcat.toml"), text).unwrap();

        assert_eq!(config.markdown, Some(PathBuf::from("docs/metrics.md")));
        assert_eq!(config.catalog_version.as_deref(), Some("3.2.0"));
        assert_eq!(config.sync.unfixed_labels, vec!["sandbox_id"]);
        assert_eq!(config.sync.prefix_segments, 3);
        assert_eq!(config.sync.tail_policy, TailPolicy::Truncate);
        assert_eq!(config.timeout(), Duration::from_secs(3));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = CliConfig::from_toml(Path::new("mcat.toml"), "catalgo = \"x\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("mcat.toml"));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = CliConfig::load_or_default(Some(Path::new("/nonexistent/mcat.toml")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(CliConfig::load_or_default(None).await.unwrap(), CliConfig::default());
    }

    #[tokio::test]
    async fn render_options_merge_sources() {
        let dir = tempfile::tempdir().unwrap();
        let words = dir.path().join("words.txt");
        std::fs::write(&words, "vCPU\nGC").unwrap();

        let config = CliConfig {
            escape_words: vec!["RSS".to_string()],
            escape_words_file: Some(words),
            ..CliConfig::default()
        };
        let options = config.render_options().await.unwrap();
        assert_eq!(options.escape_words.into_iter().collect::<Vec<_>>(), vec!["GC", "RSS", "vCPU"]);
    }
}
