//! Synchronization configuration

use serde::{Deserialize, Serialize};

use crate::heuristics::{PrefixGrouping, UnfixedLabels};
use crate::merge::TailPolicy;

/// Engine settings shared by the normalizer and the reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Label names recorded without enumerated values
    pub unfixed_labels: Vec<String>,
    /// Underscore-delimited segments forming a component key
    pub prefix_segments: usize,
    /// Handling of entries past an exhausted cursor
    pub tail_policy: TailPolicy,
    /// Provenance tag stamped on newly observed metrics
    pub since: Option<String>,
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With open-ended label names
    #[must_use]
    pub fn with_unfixed_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unfixed_labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// With prefix segment count
    #[inline]
    #[must_use]
    pub fn with_prefix_segments(mut self, segments: usize) -> Self {
        self.prefix_segments = segments;
        self
    }

    /// With tail policy
    #[inline]
    #[must_use]
    pub fn with_tail_policy(mut self, tail: TailPolicy) -> Self {
        self.tail_policy = tail;
        self
    }

    /// With provenance tag
    #[inline]
    #[must_use]
    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Open-ended labels as a lookup set
    #[must_use]
    pub fn unfixed(&self) -> UnfixedLabels {
        self.unfixed_labels.iter().map(String::as_str).collect()
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            unfixed_labels: Vec::new(),
            prefix_segments: PrefixGrouping::DEFAULT_SEGMENTS,
            tail_policy: TailPolicy::default(),
            since: None,
        }
    }
}
