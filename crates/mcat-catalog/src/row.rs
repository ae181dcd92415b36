//! Metric rows

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::keyed::Keyed;
use crate::label::Label;

/// Declared metric family type
///
/// Serialized with the upper-case names used by existing catalog documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    /// Monotonic counter
    Counter,
    /// Arbitrary gauge
    Gauge,
    /// Cumulative histogram
    Histogram,
    /// Gauge histogram
    GaugeHistogram,
    /// Quantile summary
    Summary,
    /// No declared type
    #[default]
    Untyped,
}

impl MetricKind {
    /// Upper-case tag as persisted and rendered
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Counter => "COUNTER",
            Self::Gauge => "GAUGE",
            Self::Histogram => "HISTOGRAM",
            Self::GaugeHistogram => "GAUGE_HISTOGRAM",
            Self::Summary => "SUMMARY",
            Self::Untyped => "UNTYPED",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown metric type tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric type: '{0}'")]
pub struct UnknownKind(pub String);

impl FromStr for MetricKind {
    type Err = UnknownKind;

    /// Accepts both exposition tags (`gaugehistogram`, `unknown`) and the
    /// persisted upper-case names, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "counter" => Ok(Self::Counter),
            "gauge" => Ok(Self::Gauge),
            "histogram" => Ok(Self::Histogram),
            "gaugehistogram" | "gauge_histogram" => Ok(Self::GaugeHistogram),
            "summary" => Ok(Self::Summary),
            "untyped" | "unknown" => Ok(Self::Untyped),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}

/// One metric family
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Row {
    /// Metric family name (key)
    pub name: String,

    /// Declared type (structural)
    #[serde(rename = "type", default)]
    pub kind: MetricKind,

    /// Inferred unit (structural, empty when unknown)
    #[serde(default)]
    pub unit: String,

    /// Declared help text (structural)
    #[serde(default)]
    pub help: String,

    /// Label dimensions
    #[serde(default)]
    pub labels: Vec<Label>,

    /// Release the metric first appeared in (curatorial)
    #[serde(default)]
    pub since: String,
}

impl Row {
    /// Create row without labels
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MetricKind, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            unit: String::new(),
            help: help.into(),
            labels: Vec::new(),
            since: String::new(),
        }
    }

    /// With unit
    #[inline]
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// With provenance tag
    #[inline]
    #[must_use]
    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = since.into();
        self
    }

    /// With additional label
    #[inline]
    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Look up a label by name
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.name == name)
    }
}

impl Keyed for Row {
    #[inline]
    fn key(&self) -> &str {
        &self.name
    }
}
