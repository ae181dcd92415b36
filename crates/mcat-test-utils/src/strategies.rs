//! Proptest strategies for catalogs
//!
//! Keys come from a tiny alphabet so that old and new catalogs overlap often.
//! Maps keep keys unique and sorted, so every generated catalog is canonical.

use std::collections::BTreeMap;

use mcat_catalog::{Catalog, Component, Label, LabelValue, MetricKind, Row};
use proptest::collection::btree_map;
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    "[a-d]{1,2}"
}

fn text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z ]{1,8}"]
}

pub fn kind() -> impl Strategy<Value = MetricKind> {
    prop_oneof![
        Just(MetricKind::Counter),
        Just(MetricKind::Gauge),
        Just(MetricKind::Histogram),
        Just(MetricKind::GaugeHistogram),
        Just(MetricKind::Summary),
        Just(MetricKind::Untyped),
    ]
}

fn values() -> impl Strategy<Value = Vec<LabelValue>> {
    btree_map(key(), text(), 0..4).prop_map(|values: BTreeMap<String, String>| {
        values
            .into_iter()
            .map(|(value, description)| LabelValue { value, description })
            .collect()
    })
}

fn labels() -> impl Strategy<Value = Vec<Label>> {
    btree_map(key(), (text(), any::<bool>(), any::<bool>(), values()), 0..3).prop_map(|labels| {
        labels
            .into_iter()
            .map(|(name, (description, manually_edited, fixed, values))| Label {
                name,
                description,
                manually_edited,
                fixed,
                values: if fixed { values } else { Vec::new() },
            })
            .collect()
    })
}

fn rows() -> impl Strategy<Value = Vec<Row>> {
    btree_map(key(), (kind(), prop_oneof![Just(""), Just("bytes"), Just("seconds")], text(), text(), labels()), 0..4)
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(name, (kind, unit, help, since, labels))| Row {
                    name,
                    kind,
                    unit: unit.to_string(),
                    help,
                    labels,
                    since,
                })
                .collect()
        })
}

/// Catalog with arbitrary curation
pub fn catalog() -> impl Strategy<Value = Catalog> {
    (text(), btree_map(key(), (text(), text(), rows()), 0..4)).prop_map(|(version, components)| Catalog {
        version,
        components: components
            .into_iter()
            .map(|(prefix, (title, description, rows))| Component {
                prefix,
                title,
                description,
                rows,
            })
            .collect(),
    })
}

/// Catalog shaped like normalizer output: no curation at all
pub fn observed() -> impl Strategy<Value = Catalog> {
    catalog().prop_map(strip_curation)
}

/// Remove every curatorial annotation, as a freshly normalized snapshot would
pub fn strip_curation(mut catalog: Catalog) -> Catalog {
    catalog.version.clear();
    for component in &mut catalog.components {
        component.title.clone_from(&component.prefix);
        component.description.clear();
        for row in &mut component.rows {
            row.since.clear();
            for label in &mut row.labels {
                label.description.clear();
                label.manually_edited = false;
                for value in &mut label.values {
                    value.description.clear();
                }
            }
        }
    }
    catalog
}
