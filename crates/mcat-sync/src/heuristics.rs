//! Classification heuristics used by the normalizer
//!
//! - [`infer_unit`]: unit from naming conventions
//! - [`ComponentGrouping`]: metric name → component key
//! - [`UnfixedLabels`]: open-ended label names

use std::collections::BTreeSet;
use std::fmt;

/// Units recognised from metric names and help texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Milliseconds
    Milliseconds,
    /// Bytes
    Bytes,
    /// Seconds
    Seconds,
}

impl Unit {
    /// Probe order; `milliseconds` must win over `seconds`
    pub const PROBE_ORDER: [Unit; 3] = [Self::Milliseconds, Self::Bytes, Self::Seconds];

    /// Unit string as stored in the catalog
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Milliseconds => "milliseconds",
            Self::Bytes => "bytes",
            Self::Seconds => "seconds",
        }
    }

    /// Substring that marks this unit
    #[inline]
    #[must_use]
    pub fn marker(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer a unit from the metric name, falling back to the help text
///
/// A marker only counts when its first occurrence is past the start of the
/// text, so `bytes_total` is not a byte metric but `go_memstats_alloc_bytes` is.
#[must_use]
pub fn infer_unit(name: &str, help: &str) -> Option<Unit> {
    [name, help].into_iter().find_map(|text| {
        Unit::PROBE_ORDER
            .into_iter()
            .find(|unit| text.find(unit.marker()).is_some_and(|at| at > 0))
    })
}

/// Strategy mapping a metric name to its component key
///
/// Implemented for any `Fn(&str) -> String`, so ad-hoc groupings can be
/// passed as closures.
pub trait ComponentGrouping: Send + Sync {
    /// Component key for a metric name
    fn component_key(&self, metric_name: &str) -> String;
}

impl<F> ComponentGrouping for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn component_key(&self, metric_name: &str) -> String {
        self(metric_name)
    }
}

/// Group by the first `segments` underscore-delimited segments
///
/// Names with `segments` or fewer segments are their own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixGrouping {
    segments: usize,
}

impl PrefixGrouping {
    /// Default number of segments
    pub const DEFAULT_SEGMENTS: usize = 2;

    /// Create grouping; zero is treated as one
    #[inline]
    #[must_use]
    pub fn new(segments: usize) -> Self {
        Self {
            segments: segments.max(1),
        }
    }

    /// Configured segment count
    #[inline]
    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }
}

impl Default for PrefixGrouping {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEGMENTS)
    }
}

impl ComponentGrouping for PrefixGrouping {
    fn component_key(&self, metric_name: &str) -> String {
        match metric_name.match_indices('_').nth(self.segments - 1) {
            Some((cut, _)) => metric_name[..cut].to_string(),
            None => metric_name.to_string(),
        }
    }
}

/// Label names whose value space is open-ended
///
/// Such labels (container ids, sandbox ids, paths) are recorded without
/// enumerated values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnfixedLabels {
    names: BTreeSet<String>,
}

impl UnfixedLabels {
    /// Create empty set: every label is fixed
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list, ignoring blanks
    #[must_use]
    pub fn parse_list(list: &str) -> Self {
        list.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
    }

    /// Add a name
    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Whether a label keeps an enumerated value list
    #[inline]
    #[must_use]
    pub fn is_fixed(&self, label_name: &str) -> bool {
        !self.names.contains(label_name)
    }

    /// Names in ascending order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no label is open-ended
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for UnfixedLabels {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for UnfixedLabels {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}
