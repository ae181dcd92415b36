//! Error types for decoding and fetching snapshots

use std::path::PathBuf;

/// Errors while decoding exposition text
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Sample line without a metric name
    #[error("line {line}: missing metric name")]
    MissingName { line: usize },

    /// Label set does not parse
    #[error("line {line}: malformed label set: {message}")]
    MalformedLabels { line: usize, message: String },

    /// Sample line without a value
    #[error("line {line}: sample '{name}' has no value")]
    MissingValue { line: usize, name: String },

    /// Sample value is not a float
    #[error("line {line}: invalid sample value '{value}'")]
    InvalidValue { line: usize, value: String },

    /// `# TYPE` names an unknown type
    #[error("line {line}: unknown metric type '{kind}'")]
    UnknownType { line: usize, kind: String },

    /// Second `# TYPE` line for the same family
    #[error("line {line}: duplicate TYPE line for '{name}'")]
    DuplicateType { line: usize, name: String },
}

impl DecodeError {
    /// Create malformed label error
    pub fn malformed_labels(line: usize, message: impl Into<String>) -> Self {
        Self::MalformedLabels {
            line,
            message: message.into(),
        }
    }

    /// Line the error was found on
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::MissingName { line }
            | Self::MalformedLabels { line, .. }
            | Self::MissingValue { line, .. }
            | Self::InvalidValue { line, .. }
            | Self::UnknownType { line, .. }
            | Self::DuplicateType { line, .. } => *line,
        }
    }
}

/// Errors while reading a snapshot from its source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP client could not be built or the request failed
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Endpoint answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// File or stdin read failed
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fetched text does not decode
    #[error("cannot decode snapshot from {location}: {source}")]
    Decode {
        location: String,
        #[source]
        source: DecodeError,
    },
}

impl SourceError {
    /// Create HTTP error for url
    pub fn http(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            url: url.into(),
            source,
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
