//! Error types for the catalog model
//!
//! Covers decoding/encoding of the persisted document and structural
//! validation of a decoded catalog.

use std::fmt;

/// Nesting level within the catalog tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// Catalog → components
    Component,
    /// Component → rows (metric families)
    Row,
    /// Row → labels
    Label,
    /// Label → enumerated values
    LabelValue,
}

impl Level {
    /// All levels, outermost first
    pub const ALL: [Level; 4] = [Self::Component, Self::Row, Self::Label, Self::LabelValue];

    /// Lowercase name used in diagnostics and reports
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Row => "metric",
            Self::Label => "label",
            Self::LabelValue => "label value",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while decoding, encoding or validating a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Persisted document is not valid catalog YAML
    #[error("invalid catalog document: {0}")]
    Decode(#[source] serde_yaml::Error),

    /// Catalog could not be serialized
    #[error("failed to encode catalog: {0}")]
    Encode(#[source] serde_yaml::Error),

    /// Same key appears twice within one sequence
    #[error("duplicate {level} key '{key}' under '{parent}'")]
    DuplicateKey {
        /// Level of the offending sequence
        level: Level,
        /// Repeated key
        key: String,
        /// Path of the owning element ("" for the catalog root)
        parent: String,
    },
}

impl CatalogError {
    /// Create duplicate key error
    pub fn duplicate_key(level: Level, key: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::DuplicateKey {
            level,
            key: key.into(),
            parent: parent.into(),
        }
    }
}
