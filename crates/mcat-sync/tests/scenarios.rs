use mcat_catalog::{is_canonical, Catalog, Component, MetricKind, Row};
use mcat_sync::{Normalizer, Reconciler, TailPolicy, UnfixedLabels};
use mcat_test_utils::{family, label_values, memstats_catalog, prefixes};
use pretty_assertions::assert_eq;

fn observed_memstats(states: &[&str]) -> Catalog {
    let samples: Vec<Vec<(&str, &str)>> = states.iter().map(|s| vec![("state", *s)]).collect();
    let samples: Vec<&[(&str, &str)]> = samples.iter().map(Vec::as_slice).collect();
    Normalizer::new().normalize(&[family("go_memstats_alloc_bytes", MetricKind::Gauge, &samples)])
}

#[test]
fn new_label_value_is_admitted() {
    let merged = Reconciler::new().reconcile(memstats_catalog(&["heap"], false), observed_memstats(&["heap", "stack"]));
    assert_eq!(label_values(&merged, "go_memstats_alloc_bytes", "state"), vec!["heap", "stack"]);
}

#[test]
fn manually_edited_values_are_kept() {
    let merged = Reconciler::new().reconcile(memstats_catalog(&["heap"], true), observed_memstats(&["heap", "stack"]));
    assert_eq!(label_values(&merged, "go_memstats_alloc_bytes", "state"), vec!["heap"]);
    assert!(merged.find_row("go_memstats_alloc_bytes").unwrap().label("state").unwrap().manually_edited);
}

#[test]
fn manually_edited_values_come_out_sorted() {
    let merged = Reconciler::new().reconcile(memstats_catalog(&["stack", "heap"], true), observed_memstats(&["heap", "stack"]));

    let state = merged.find_row("go_memstats_alloc_bytes").unwrap().label("state").unwrap();
    assert_eq!(label_values(&merged, "go_memstats_alloc_bytes", "state"), vec!["heap", "stack"]);
    assert!(is_canonical(&state.values));
}

#[test]
fn stale_row_is_dropped() {
    let old = Catalog::new("").with_component(
        Component::new("foo_bar")
            .with_row(Row::new("foo_bar", MetricKind::Counter, "gone"))
            .with_row(Row::new("foo_bar_total", MetricKind::Counter, "kept")),
    );
    let new = Normalizer::new().normalize(&[family("foo_bar_total", MetricKind::Counter, &[])]);

    let merged = Reconciler::new().reconcile(old, new);
    assert!(merged.find_row("foo_bar").is_none());
    assert!(merged.find_row("foo_bar_total").is_some());
}

#[test]
fn trailing_component_depends_on_tail_policy() {
    let old = memstats_catalog(&["heap"], false);
    let new = Normalizer::new()
        .with_unfixed_labels(UnfixedLabels::parse_list("sandbox_id"))
        .normalize(&[
            family("go_memstats_alloc_bytes", MetricKind::Gauge, &[&[("state", "heap")]]),
            family("kata_hypervisor_fds", MetricKind::Gauge, &[&[("sandbox_id", "0b1c")]]),
        ]);

    let appended = Reconciler::new().reconcile(old.clone(), new.clone());
    assert_eq!(prefixes(&appended), vec!["go_memstats", "kata_hypervisor"]);

    let (truncated, report) = Reconciler::new()
        .with_tail_policy(TailPolicy::Truncate)
        .reconcile_with_report(old, new);
    assert_eq!(prefixes(&truncated), vec!["go_memstats"]);
    assert_eq!(report.components.skipped, 1);
}
