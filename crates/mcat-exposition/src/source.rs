//! Snapshot sources
//!
//! A location string resolves to one of:
//! - `http://` or `https://`: GET via `reqwest`
//! - `file://` or a plain path: read from disk
//! - `-`: read from stdin

use std::path::PathBuf;
use std::time::Duration;

use mcat_sync::MetricFamily;
use tokio::io::AsyncReadExt;

use crate::decode::decode;
use crate::error::SourceError;

/// Default HTTP request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where an exposition snapshot is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricSource {
    /// HTTP(S) endpoint
    Http {
        /// Endpoint URL
        url: String,
        /// Request timeout
        timeout: Duration,
    },
    /// File on disk
    File(PathBuf),
    /// Standard input
    Stdin,
}

impl MetricSource {
    /// Resolve a location string
    #[must_use]
    pub fn parse(location: &str) -> Self {
        if location == "-" {
            Self::Stdin
        } else if location.starts_with("http://") || location.starts_with("https://") {
            Self::Http {
                url: location.to_string(),
                timeout: DEFAULT_TIMEOUT,
            }
        } else {
            let path = location.strip_prefix("file://").unwrap_or(location);
            Self::File(PathBuf::from(path))
        }
    }

    /// With HTTP request timeout (no effect on other sources)
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Self::Http { timeout: t, .. } = &mut self {
            *t = timeout;
        }
        self
    }

    /// Display form of the location
    #[must_use]
    pub fn location(&self) -> String {
        match self {
            Self::Http { url, .. } => url.clone(),
            Self::File(path) => path.display().to_string(),
            Self::Stdin => "-".to_string(),
        }
    }

    /// Read the raw exposition text
    ///
    /// # Errors
    /// - `SourceError::Http` if the request cannot be sent or its body read
    /// - `SourceError::Status` on a non-success HTTP status
    /// - `SourceError::Io` if the file or stdin cannot be read
    pub async fn fetch(&self) -> Result<String, SourceError> {
        match self {
            Self::Http { url, timeout } => {
                let client = reqwest::Client::builder()
                    .timeout(*timeout)
                    .build()
                    .map_err(|e| SourceError::http(url, e))?;
                let response = client.get(url).send().await.map_err(|e| SourceError::http(url, e))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response.text().await.map_err(|e| SourceError::http(url, e))
            }
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| SourceError::io_error(path, e)),
            Self::Stdin => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .map_err(|e| SourceError::io_error("<stdin>", e))?;
                Ok(text)
            }
        }
    }

    /// Read and decode the snapshot
    ///
    /// # Errors
    /// Any fetch error, or `SourceError::Decode` if the text is not valid
    /// exposition format.
    pub async fn families(&self) -> Result<Vec<MetricFamily>, SourceError> {
        let text = self.fetch().await?;
        let families = decode(&text).map_err(|source| SourceError::Decode {
            location: self.location(),
            source,
        })?;
        tracing::info!(source = %self.location(), families = families.len(), "Fetched snapshot");
        Ok(families)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locations() {
        assert_eq!(MetricSource::parse("-"), MetricSource::Stdin);
        assert_eq!(
            MetricSource::parse("http://localhost:8090/metrics"),
            MetricSource::Http {
                url: "http://localhost:8090/metrics".to_string(),
                timeout: DEFAULT_TIMEOUT,
            }
        );
        assert_eq!(
            MetricSource::parse("file:///tmp/metrics.txt"),
            MetricSource::File(PathBuf::from("/tmp/metrics.txt"))
        );
        assert_eq!(MetricSource::parse("metrics.txt"), MetricSource::File(PathBuf::from("metrics.txt")));
    }

    #[test]
    fn timeout_only_applies_to_http() {
        let http = MetricSource::parse("https://example.com/metrics").with_timeout(Duration::from_secs(2));
        assert!(matches!(http, MetricSource::Http { timeout, .. } if timeout == Duration::from_secs(2)));

        let file = MetricSource::parse("m.txt").with_timeout(Duration::from_secs(2));
        assert_eq!(file, MetricSource::File(PathBuf::from("m.txt")));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = MetricSource::parse("/nonexistent/mcat/metrics.txt").fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
