//! Error types for catalog persistence

use std::path::PathBuf;

use mcat_catalog::CatalogError;

/// Errors while loading, storing or rendering a catalog
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// IO error on a catalog, backup or output file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted catalog could not be decoded or encoded
    #[error("catalog {path}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: CatalogError,
    },
}

impl PublishError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create catalog error for path
    pub fn catalog(path: impl Into<PathBuf>, source: CatalogError) -> Self {
        Self::Catalog {
            path: path.into(),
            source,
        }
    }
}
