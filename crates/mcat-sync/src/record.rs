//! Decoded metric records handed to the normalizer
//!
//! These are the structured form of one exposition snapshot: the normalizer
//! never sees wire text, only families with their samples.

use std::collections::BTreeMap;

use mcat_catalog::MetricKind;

/// One sample instance of a metric family
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sample {
    /// Label name → value, unique by name
    pub labels: BTreeMap<String, String>,
    /// Sample value
    pub value: f64,
}

impl Sample {
    /// Create sample without labels
    #[inline]
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            labels: BTreeMap::new(),
            value,
        }
    }

    /// With label pair (a repeated name replaces the earlier value)
    #[inline]
    #[must_use]
    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(name.into(), value.into());
        self
    }
}

/// One metric family as declared by the source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricFamily {
    /// Family name
    pub name: String,
    /// Declared type
    pub kind: MetricKind,
    /// Declared help text
    pub help: String,
    /// Observed sample instances
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    /// Create family without samples
    #[must_use]
    pub fn new(name: impl Into<String>, kind: MetricKind, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            help: help.into(),
            samples: Vec::new(),
        }
    }

    /// With additional sample
    #[inline]
    #[must_use]
    pub fn with_sample(mut self, sample: Sample) -> Self {
        self.samples.push(sample);
        self
    }

    /// Label name/value pairs across every sample
    pub fn label_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.samples
            .iter()
            .flat_map(|s| s.labels.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}
