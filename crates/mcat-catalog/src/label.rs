//! Label dimensions and their enumerated values

use serde::{Deserialize, Serialize};

use crate::keyed::Keyed;

/// One concrete value observed for a fixed label
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelValue {
    /// Value string (key)
    pub value: String,

    /// Curatorial description
    #[serde(rename = "desc", default)]
    pub description: String,
}

impl LabelValue {
    /// Create value without description
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: String::new(),
        }
    }

    /// With curatorial description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Keyed for LabelValue {
    #[inline]
    fn key(&self) -> &str {
        &self.value
    }
}

/// One label dimension attached to a metric
///
/// `fixed` labels have a small closed value set tracked in `values`; open
/// labels (container ids, paths, ...) carry no values at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Label {
    /// Label name (key)
    pub name: String,

    /// Curatorial description
    #[serde(rename = "desc", default)]
    pub description: String,

    /// When set, `values` is only ever edited by hand
    #[serde(rename = "manually_edit", default)]
    pub manually_edited: bool,

    /// Whether the value space is a small closed enumeration
    #[serde(default)]
    pub fixed: bool,

    /// Enumerated values (fixed labels only)
    #[serde(default)]
    pub values: Vec<LabelValue>,
}

impl Label {
    /// Create a fixed label with the given values
    #[must_use]
    pub fn fixed<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: String::new(),
            manually_edited: false,
            fixed: true,
            values: values.into_iter().map(LabelValue::new).collect(),
        }
    }

    /// Create an open (unfixed) label
    #[must_use]
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            manually_edited: false,
            fixed: false,
            values: Vec::new(),
        }
    }

    /// With curatorial description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Lock (or unlock) the value list against automatic updates
    #[inline]
    #[must_use]
    pub fn manually_edited(mut self, locked: bool) -> Self {
        self.manually_edited = locked;
        self
    }

    /// Value strings in current order
    pub fn value_keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.value.as_str())
    }

    /// Look up an enumerated value
    #[must_use]
    pub fn value(&self, value: &str) -> Option<&LabelValue> {
        self.values.iter().find(|v| v.value == value)
    }
}

impl Keyed for Label {
    #[inline]
    fn key(&self) -> &str {
        &self.name
    }
}
