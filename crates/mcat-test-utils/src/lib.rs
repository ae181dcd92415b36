//! Testing utilities for the mcat workspace
//!
//! Shared fixtures, builders and proptest strategies.

#![allow(missing_docs)]

use mcat_catalog::{Catalog, Component, Label, MetricKind, Row};
use mcat_sync::{MetricFamily, Sample};

pub mod strategies;

/// First snapshot of a small runtime endpoint
pub const SNAPSHOT_V1: &str = r#"# HELP go_gc_duration_seconds A summary of the pause duration of garbage collection cycles.
# TYPE go_gc_duration_seconds summary
go_gc_duration_seconds{quantile="0"} 2.1e-05
go_gc_duration_seconds{quantile="0.5"} 4.3e-05
go_gc_duration_seconds{quantile="1"} 0.000217
go_gc_duration_seconds_sum 0.0041
go_gc_duration_seconds_count 61
# HELP go_memstats_alloc_bytes Number of bytes allocated and still in use.
# TYPE go_memstats_alloc_bytes gauge
go_memstats_alloc_bytes{state="heap"} 4.194304e+06
# HELP kata_hypervisor_fds Open FDs for hypervisor.
# TYPE kata_hypervisor_fds gauge
kata_hypervisor_fds{sandbox_id="0b1c"} 124
kata_hypervisor_fds{sandbox_id="9f2e"} 119
# HELP kata_shim_rpc_durations_histogram_milliseconds RPC latency distributions.
# TYPE kata_shim_rpc_durations_histogram_milliseconds histogram
kata_shim_rpc_durations_histogram_milliseconds_bucket{action="create",le="1"} 0
kata_shim_rpc_durations_histogram_milliseconds_bucket{action="create",le="+Inf"} 3
kata_shim_rpc_durations_histogram_milliseconds_sum{action="create"} 712
kata_shim_rpc_durations_histogram_milliseconds_count{action="create"} 3
kata_shim_rpc_durations_histogram_milliseconds_bucket{action="start",le="1"} 1
kata_shim_rpc_durations_histogram_milliseconds_bucket{action="start",le="+Inf"} 1
kata_shim_rpc_durations_histogram_milliseconds_sum{action="start"} 0.4
kata_shim_rpc_durations_histogram_milliseconds_count{action="start"} 1
"#;

/// Second snapshot: one metric gone, one new, new label values
pub const SNAPSHOT_V2: &str = r#"# HELP go_memstats_alloc_bytes Bytes allocated and still in use.
# TYPE go_memstats_alloc_bytes gauge
go_memstats_alloc_bytes{state="heap"} 4.194304e+06
go_memstats_alloc_bytes{state="stack"} 65536
# HELP kata_hypervisor_fds Open FDs for hypervisor.
# TYPE kata_hypervisor_fds gauge
kata_hypervisor_fds{sandbox_id="77aa"} 130
# HELP kata_shim_rpc_durations_histogram_milliseconds RPC latency distributions.
# TYPE kata_shim_rpc_durations_histogram_milliseconds histogram
kata_shim_rpc_durations_histogram_milliseconds_bucket{action="create",le="+Inf"} 3
kata_shim_rpc_durations_histogram_milliseconds_sum{action="create"} 712
kata_shim_rpc_durations_histogram_milliseconds_count{action="create"} 3
kata_shim_rpc_durations_histogram_milliseconds_bucket{action="delete",le="+Inf"} 2
kata_shim_rpc_durations_histogram_milliseconds_sum{action="delete"} 9
kata_shim_rpc_durations_histogram_milliseconds_count{action="delete"} 2
# HELP kata_shim_threads Kata containerd shim v2 process threads.
# TYPE kata_shim_threads gauge
kata_shim_threads 12
"#;

/// Catalog with one `go_memstats_alloc_bytes` row and a `state` label
pub fn memstats_catalog(values: &[&str], manually_edited: bool) -> Catalog {
    Catalog::new("").with_component(
        Component::new("go_memstats").with_row(
            Row::new("go_memstats_alloc_bytes", MetricKind::Gauge, "Number of bytes allocated and still in use.")
                .with_unit("bytes")
                .with_label(Label::fixed("state", values.iter().copied()).manually_edited(manually_edited)),
        ),
    )
}

/// Values of a label, or empty when the row or label is missing
pub fn label_values(catalog: &Catalog, row: &str, label: &str) -> Vec<String> {
    catalog
        .find_row(row)
        .and_then(|r| r.label(label))
        .map(|l| l.value_keys().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Family with one sample per label set
pub fn family(name: &str, kind: MetricKind, samples: &[&[(&str, &str)]]) -> MetricFamily {
    samples.iter().fold(MetricFamily::new(name, kind, ""), |family, pairs| {
        let sample = pairs
            .iter()
            .fold(Sample::new(0.0), |sample, (k, v)| sample.with_label(*k, *v));
        family.with_sample(sample)
    })
}

/// Keys of every component, in order
pub fn prefixes(catalog: &Catalog) -> Vec<&str> {
    catalog.components.iter().map(|c| c.prefix.as_str()).collect()
}
