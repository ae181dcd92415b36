//! Snapshot normalizer
//!
//! Turns decoded metric families into an observed [`Catalog`] with the same
//! shape as the persisted one but no curatorial history.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use mcat_catalog::{Catalog, Component, Label, MetricKind, Row};

use crate::config::SyncConfig;
use crate::heuristics::{infer_unit, ComponentGrouping, PrefixGrouping, UnfixedLabels};
use crate::record::MetricFamily;

/// Row under construction: first declaration wins, labels accumulate
#[derive(Debug)]
struct RowDraft {
    kind: MetricKind,
    help: String,
    labels: BTreeMap<String, BTreeSet<String>>,
}

/// Builds observed catalogs from metric snapshots
pub struct Normalizer {
    grouping: Box<dyn ComponentGrouping>,
    unfixed: UnfixedLabels,
    since: Option<String>,
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Normalizer")
            .field("unfixed", &self.unfixed)
            .field("since", &self.since)
            .finish_non_exhaustive()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create normalizer with two-segment prefix grouping and every label fixed
    #[must_use]
    pub fn new() -> Self {
        Self {
            grouping: Box::new(PrefixGrouping::default()),
            unfixed: UnfixedLabels::new(),
            since: None,
        }
    }

    /// Create normalizer from configuration
    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Self {
        let mut normalizer = Self::new()
            .with_grouping(PrefixGrouping::new(config.prefix_segments))
            .with_unfixed_labels(config.unfixed());
        normalizer.since.clone_from(&config.since);
        normalizer
    }

    /// With component grouping strategy
    #[must_use]
    pub fn with_grouping(mut self, grouping: impl ComponentGrouping + 'static) -> Self {
        self.grouping = Box::new(grouping);
        self
    }

    /// With open-ended label names
    #[must_use]
    pub fn with_unfixed_labels(mut self, unfixed: UnfixedLabels) -> Self {
        self.unfixed = unfixed;
        self
    }

    /// With provenance tag for observed rows
    #[must_use]
    pub fn with_since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    /// Build the observed catalog
    ///
    /// Components, rows, labels and values come out in canonical order.
    /// Families repeating a name merge their label observations; the first
    /// declaration's type and help are kept.
    #[must_use]
    pub fn normalize(&self, families: &[MetricFamily]) -> Catalog {
        let mut components: BTreeMap<String, BTreeMap<String, RowDraft>> = BTreeMap::new();

        for family in families {
            let prefix = self.grouping.component_key(&family.name);
            let draft = components
                .entry(prefix)
                .or_default()
                .entry(family.name.clone())
                .or_insert_with(|| RowDraft {
                    kind: family.kind,
                    help: family.help.clone(),
                    labels: BTreeMap::new(),
                });

            for (name, value) in family.label_pairs() {
                draft.labels.entry(name.to_string()).or_default().insert(value.to_string());
            }
        }

        let catalog = Catalog {
            version: String::new(),
            components: components
                .into_iter()
                .map(|(prefix, rows)| Component {
                    rows: rows.into_iter().map(|(name, draft)| self.build_row(name, draft)).collect(),
                    ..Component::new(prefix)
                })
                .collect(),
        };

        tracing::debug!(
            families = families.len(),
            components = catalog.components.len(),
            metrics = catalog.row_count(),
            "Normalized snapshot"
        );
        catalog
    }

    fn build_row(&self, name: String, draft: RowDraft) -> Row {
        let unit = infer_unit(&name, &draft.help).map(|u| u.as_str().to_string()).unwrap_or_default();
        let labels = draft
            .labels
            .into_iter()
            .map(|(label, values)| {
                if self.unfixed.is_fixed(&label) {
                    Label::fixed(label, values)
                } else {
                    Label::open(label)
                }
            })
            .collect();

        Row {
            name,
            kind: draft.kind,
            unit,
            help: draft.help,
            labels,
            since: self.since.clone().unwrap_or_default(),
        }
    }
}
