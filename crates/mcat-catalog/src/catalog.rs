//! Catalog root and components

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Level};
use crate::keyed::{sort_by_key, Keyed};
use crate::row::Row;

/// Logical grouping of metrics sharing a name prefix
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Component {
    /// Shared name prefix (key)
    pub prefix: String,

    /// Section title (curatorial)
    #[serde(default)]
    pub title: String,

    /// Section description (curatorial)
    #[serde(rename = "desc", default)]
    pub description: String,

    /// Metric families in this component
    #[serde(rename = "metrics", default)]
    pub rows: Vec<Row>,
}

impl Component {
    /// Create component with placeholder curation: the title is the prefix
    /// and the description is empty.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            title: prefix.clone(),
            prefix,
            description: String::new(),
            rows: Vec::new(),
        }
    }

    /// With title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With additional row
    #[inline]
    #[must_use]
    pub fn with_row(mut self, row: Row) -> Self {
        self.rows.push(row);
        self
    }

    /// Look up a row by metric name
    #[must_use]
    pub fn row(&self, name: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.name == name)
    }
}

impl Keyed for Component {
    #[inline]
    fn key(&self) -> &str {
        &self.prefix
    }
}

/// The persisted metrics catalog
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Schema/product version, set by the caller and never touched by sync
    #[serde(default)]
    pub version: String,

    /// Components keyed by prefix
    #[serde(default)]
    pub components: Vec<Component>,
}

impl Catalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            components: Vec::new(),
        }
    }

    /// With additional component
    #[inline]
    #[must_use]
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// True when the catalog has no components
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Look up a component by prefix
    #[must_use]
    pub fn component(&self, prefix: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.prefix == prefix)
    }

    /// Find a row anywhere in the catalog
    #[must_use]
    pub fn find_row(&self, name: &str) -> Option<&Row> {
        self.components.iter().find_map(|c| c.row(name))
    }

    /// Number of rows across all components
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.components.iter().map(|c| c.rows.len()).sum()
    }

    /// Stable-sort every level by key
    pub fn canonicalize(&mut self) {
        sort_by_key(&mut self.components);
        for component in &mut self.components {
            sort_by_key(&mut component.rows);
            for row in &mut component.rows {
                sort_by_key(&mut row.labels);
                for label in &mut row.labels {
                    sort_by_key(&mut label.values);
                }
            }
        }
    }

    /// Check that no sequence holds the same key twice
    ///
    /// # Errors
    /// Returns [`CatalogError::DuplicateKey`] for the first repeated key found,
    /// outermost level first.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_unique(&self.components, Level::Component, "")?;
        for component in &self.components {
            check_unique(&component.rows, Level::Row, &component.prefix)?;
            for row in &component.rows {
                let row_path = format!("{}/{}", component.prefix, row.name);
                check_unique(&row.labels, Level::Label, &row_path)?;
                for label in &row.labels {
                    check_unique(
                        &label.values,
                        Level::LabelValue,
                        &format!("{row_path}/{}", label.name),
                    )?;
                }
            }
        }
        Ok(())
    }
}

fn check_unique<T: Keyed>(items: &[T], level: Level, parent: &str) -> Result<(), CatalogError> {
    let mut keys: Vec<&str> = items.iter().map(Keyed::key).collect();
    keys.sort_unstable();
    match keys.windows(2).find(|pair| pair[0] == pair[1]) {
        Some(pair) => Err(CatalogError::duplicate_key(level, pair[0], parent)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use crate::row::MetricKind;
    use pretty_assertions::assert_eq;

    fn sample() -> Catalog {
        Catalog::new("2.0.0")
            .with_component(
                Component::new("go_memstats").with_row(
                    Row::new("go_memstats_alloc_bytes", MetricKind::Gauge, "bytes allocated")
                        .with_label(Label::fixed("state", ["stack", "heap"]))
                        .with_label(Label::open("instance")),
                ),
            )
            .with_component(Component::new("go_gc"))
    }

    #[test]
    fn component_placeholder_title_is_prefix() {
        let component = Component::new("kata_hypervisor");
        assert_eq!(component.title, "kata_hypervisor");
        assert!(component.description.is_empty());
    }

    #[test]
    fn canonicalize_sorts_every_level() {
        let mut catalog = sample();
        catalog.canonicalize();

        let prefixes: Vec<_> = catalog.components.iter().map(|c| c.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["go_gc", "go_memstats"]);

        let row = catalog.find_row("go_memstats_alloc_bytes").unwrap();
        let labels: Vec<_> = row.labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(labels, vec!["instance", "state"]);
        let values: Vec<_> = row.label("state").unwrap().value_keys().collect();
        assert_eq!(values, vec!["heap", "stack"]);
    }

    #[test]
    fn validate_accepts_unique_keys() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_reports_duplicate_values() {
        let catalog = Catalog::new("").with_component(
            Component::new("go_memstats").with_row(
                Row::new("go_memstats_alloc_bytes", MetricKind::Gauge, "")
                    .with_label(Label::fixed("state", ["heap", "heap"])),
            ),
        );

        let err = catalog.validate().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateKey { level: Level::LabelValue, ref key, ref parent }
                if key == "heap" && parent == "go_memstats/go_memstats_alloc_bytes/state"
        ));
    }

    #[test]
    fn validate_reports_duplicate_components() {
        let catalog = Catalog::new("")
            .with_component(Component::new("go_gc"))
            .with_component(Component::new("go_gc"));
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateKey { level: Level::Component, .. })
        ));
    }

    #[test]
    fn row_count_spans_components() {
        assert_eq!(sample().row_count(), 1);
        assert!(!sample().is_empty());
        assert!(Catalog::default().is_empty());
    }
}
