//! Ordered merge-join
//!
//! Reconciles two key-sorted sequences in one linear scan with an old cursor
//! and a new cursor, without building an index. Each key resolves to one of:
//!
//! - old only: dropped as stale
//! - new only: admitted unchanged
//! - both: passed to the level's [`MergeRule`]
//!
//! Both inputs are consumed by value; the result is a fresh vector, so no
//! element is ever reachable from two places during a merge.

use std::cmp::Ordering;

use mcat_catalog::{is_canonical, sort_by_key, Component, Keyed, Label, LabelValue, Level, Row};
use serde::{Deserialize, Serialize};

use crate::report::{Outcome, SyncReport};

/// What to do with entries left over once one cursor is exhausted
///
/// The old tail is always stale and dropped. The policies differ on new-only
/// entries that sort after every old key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TailPolicy {
    /// Admit the new tail
    #[default]
    AppendNew,
    /// Stop at the first exhausted cursor and drop the new tail too.
    /// Matches catalogs produced by earlier tooling.
    Truncate,
}

/// Level-specific rule for keys present on both sides
pub trait MergeRule<T: Keyed> {
    /// Catalog level this rule merges
    fn level(&self) -> Level;

    /// Combine the persisted element with its freshly observed counterpart
    fn combine(&self, old: T, new: T, report: &mut SyncReport) -> T;
}

/// Merge two sequences keyed by [`Keyed::key`]
///
/// Both sequences are stable-sorted first, so callers may pass them in any
/// order. Keys must be unique within each sequence; duplicates are a caller
/// bug (checked in debug builds).
///
/// If `old` is empty, `new` is returned as-is.
pub fn merge_join<T, R>(
    mut old: Vec<T>,
    mut new: Vec<T>,
    rule: &R,
    tail: TailPolicy,
    report: &mut SyncReport,
) -> Vec<T>
where
    T: Keyed,
    R: MergeRule<T>,
{
    let level = rule.level();
    sort_by_key(&mut old);
    sort_by_key(&mut new);
    debug_assert!(is_canonical(&old), "duplicate {level} keys in persisted sequence");
    debug_assert!(is_canonical(&new), "duplicate {level} keys in observed sequence");

    if old.is_empty() {
        report.level_mut(level).record_many(Outcome::Admitted, new.len());
        return new;
    }

    let mut merged = Vec::with_capacity(new.len());
    let mut old = old.into_iter().peekable();
    let mut new = new.into_iter().peekable();

    loop {
        let ordering = match (old.peek(), new.peek()) {
            (Some(o), Some(n)) => o.key().cmp(n.key()),
            _ => break,
        };

        match ordering {
            Ordering::Less => {
                old.next();
                report.record(level, Outcome::Pruned);
            }
            Ordering::Equal => {
                if let (Some(o), Some(n)) = (old.next(), new.next()) {
                    merged.push(rule.combine(o, n, report));
                    report.record(level, Outcome::Combined);
                }
            }
            Ordering::Greater => {
                if let Some(n) = new.next() {
                    merged.push(n);
                    report.record(level, Outcome::Admitted);
                }
            }
        }
    }

    report.level_mut(level).record_many(Outcome::Pruned, old.count());
    match tail {
        TailPolicy::AppendNew => {
            let before = merged.len();
            merged.extend(new);
            report
                .level_mut(level)
                .record_many(Outcome::Admitted, merged.len() - before);
        }
        TailPolicy::Truncate => {
            report.level_mut(level).record_many(Outcome::Skipped, new.count());
        }
    }

    merged
}

/// Label values: the old value wins, keeping its description
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueRule;

impl MergeRule<LabelValue> for ValueRule {
    fn level(&self) -> Level {
        Level::LabelValue
    }

    fn combine(&self, old: LabelValue, _new: LabelValue, _report: &mut SyncReport) -> LabelValue {
        old
    }
}

/// Labels: `fixed` refreshes; values merge unless manually edited
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelRule {
    tail: TailPolicy,
}

impl LabelRule {
    /// Create rule
    #[inline]
    #[must_use]
    pub fn new(tail: TailPolicy) -> Self {
        Self { tail }
    }
}

impl MergeRule<Label> for LabelRule {
    fn level(&self) -> Level {
        Level::Label
    }

    fn combine(&self, old: Label, new: Label, report: &mut SyncReport) -> Label {
        let values = if old.manually_edited {
            report.record(Level::Label, Outcome::Locked);
            let mut values = old.values;
            sort_by_key(&mut values);
            values
        } else {
            merge_join(old.values, new.values, &ValueRule, self.tail, report)
        };

        Label {
            fixed: new.fixed,
            values,
            ..old
        }
    }
}

/// Rows: type, help and unit refresh; labels merge
#[derive(Debug, Clone, Copy, Default)]
pub struct RowRule {
    tail: TailPolicy,
}

impl RowRule {
    /// Create rule
    #[inline]
    #[must_use]
    pub fn new(tail: TailPolicy) -> Self {
        Self { tail }
    }
}

impl MergeRule<Row> for RowRule {
    fn level(&self) -> Level {
        Level::Row
    }

    fn combine(&self, old: Row, new: Row, report: &mut SyncReport) -> Row {
        let labels = merge_join(old.labels, new.labels, &LabelRule::new(self.tail), self.tail, report);

        Row {
            kind: new.kind,
            help: new.help,
            unit: new.unit,
            labels,
            ..old
        }
    }
}

/// Components: curation untouched; rows merge
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentRule {
    tail: TailPolicy,
}

impl ComponentRule {
    /// Create rule
    #[inline]
    #[must_use]
    pub fn new(tail: TailPolicy) -> Self {
        Self { tail }
    }
}

impl MergeRule<Component> for ComponentRule {
    fn level(&self) -> Level {
        Level::Component
    }

    fn combine(&self, old: Component, new: Component, report: &mut SyncReport) -> Component {
        let rows = merge_join(old.rows, new.rows, &RowRule::new(self.tail), self.tail, report);
        Component { rows, ..old }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcat_catalog::MetricKind;
    use pretty_assertions::assert_eq;

    fn values(keys: &[&str]) -> Vec<LabelValue> {
        keys.iter().map(|k| LabelValue::new(*k)).collect()
    }

    fn keys<T: Keyed>(items: &[T]) -> Vec<&str> {
        items.iter().map(Keyed::key).collect()
    }

    fn join_values(old: &[&str], new: &[&str], tail: TailPolicy) -> (Vec<LabelValue>, SyncReport) {
        let mut report = SyncReport::default();
        let merged = merge_join(values(old), values(new), &ValueRule, tail, &mut report);
        (merged, report)
    }

    #[test]
    fn empty_old_returns_new_verbatim() {
        let (merged, report) = join_values(&[], &["b", "a"], TailPolicy::Truncate);
        assert_eq!(keys(&merged), vec!["a", "b"]);
        assert_eq!(report.values.admitted, 2);
        assert_eq!(report.values.pruned, 0);
    }

    #[test]
    fn interleaved_keys() {
        let (merged, report) = join_values(&["a", "c", "e"], &["b", "c", "d", "f"], TailPolicy::AppendNew);
        assert_eq!(keys(&merged), vec!["b", "c", "d", "f"]);
        assert_eq!(report.values.combined, 1);
        assert_eq!(report.values.admitted, 3);
        assert_eq!(report.values.pruned, 2);
    }

    #[test]
    fn new_tail_appended_by_default() {
        let (merged, report) = join_values(&["heap"], &["heap", "stack"], TailPolicy::AppendNew);
        assert_eq!(keys(&merged), vec!["heap", "stack"]);
        assert_eq!(report.values.skipped, 0);
    }

    #[test]
    fn truncate_drops_new_tail() {
        let (merged, report) = join_values(&["heap"], &["heap", "stack"], TailPolicy::Truncate);
        assert_eq!(keys(&merged), vec!["heap"]);
        assert_eq!(report.values.skipped, 1);
    }

    #[test]
    fn old_tail_is_always_pruned() {
        for tail in [TailPolicy::AppendNew, TailPolicy::Truncate] {
            let (merged, report) = join_values(&["a", "x", "y"], &["a"], tail);
            assert_eq!(keys(&merged), vec!["a"]);
            assert_eq!(report.values.pruned, 2);
        }
    }

    #[test]
    fn empty_new_prunes_everything() {
        let (merged, report) = join_values(&["a", "b"], &[], TailPolicy::AppendNew);
        assert!(merged.is_empty());
        assert_eq!(report.values.pruned, 2);
    }

    #[test]
    fn unsorted_inputs_are_sorted_first() {
        let (merged, _) = join_values(&["c", "a"], &["d", "c", "a"], TailPolicy::AppendNew);
        assert_eq!(keys(&merged), vec!["a", "c", "d"]);
    }

    #[test]
    fn value_rule_keeps_old_description() {
        let mut report = SyncReport::default();
        let old = vec![LabelValue::new("heap").with_description("Go heap")];
        let merged = merge_join(old, values(&["heap"]), &ValueRule, TailPolicy::AppendNew, &mut report);
        assert_eq!(merged[0].description, "Go heap");
    }

    #[test]
    fn label_rule_merges_unlocked_values() {
        let old = Label::fixed("state", ["heap"]).with_description("memory state");
        let new = Label::fixed("state", ["heap", "stack"]);

        let mut report = SyncReport::default();
        let merged = LabelRule::default().combine(old, new, &mut report);

        assert_eq!(merged.value_keys().collect::<Vec<_>>(), vec!["heap", "stack"]);
        assert_eq!(merged.description, "memory state");
        assert_eq!(report.labels.locked, 0);
    }

    #[test]
    fn label_rule_respects_manual_lock() {
        let old = Label::fixed("state", ["zeta", "heap"]).manually_edited(true);
        let new = Label::fixed("state", ["heap", "stack"]);

        let mut report = SyncReport::default();
        let merged = LabelRule::default().combine(old, new, &mut report);

        assert_eq!(merged.value_keys().collect::<Vec<_>>(), vec!["heap", "zeta"]);
        assert!(merged.manually_edited);
        assert_eq!(report.labels.locked, 1);
        assert_eq!(report.values, Default::default());
    }

    #[test]
    fn label_rule_refreshes_fixed_flag() {
        let old = Label::fixed("pod", ["a", "b"]);
        let new = Label::open("pod");

        let merged = LabelRule::default().combine(old, new, &mut SyncReport::default());
        assert!(!merged.fixed);
        assert!(merged.values.is_empty());
    }

    #[test]
    fn row_rule_refreshes_structure_and_keeps_since() {
        let old = Row::new("kata_agent_io", MetricKind::Counter, "old help")
            .with_unit("seconds")
            .with_since("1.0.0")
            .with_label(Label::fixed("item", ["rchar"]).with_description("io item"));
        let new = Row::new("kata_agent_io", MetricKind::Gauge, "new help")
            .with_unit("bytes")
            .with_since("3.0.0")
            .with_label(Label::fixed("item", ["rchar", "wchar"]));

        let merged = RowRule::default().combine(old, new, &mut SyncReport::default());

        assert_eq!(merged.kind, MetricKind::Gauge);
        assert_eq!(merged.help, "new help");
        assert_eq!(merged.unit, "bytes");
        assert_eq!(merged.since, "1.0.0");
        let item = merged.label("item").unwrap();
        assert_eq!(item.description, "io item");
        assert_eq!(item.value_keys().collect::<Vec<_>>(), vec!["rchar", "wchar"]);
    }

    #[test]
    fn component_rule_keeps_curation() {
        let old = Component::new("kata_agent")
            .with_title("Agent")
            .with_description("Metrics of the in-guest agent.")
            .with_row(Row::new("kata_agent_gone", MetricKind::Gauge, ""));
        let new = Component::new("kata_agent").with_row(Row::new("kata_agent_up", MetricKind::Gauge, ""));

        let mut report = SyncReport::default();
        let merged = ComponentRule::default().combine(old, new, &mut report);

        assert_eq!(merged.title, "Agent");
        assert_eq!(merged.description, "Metrics of the in-guest agent.");
        assert_eq!(keys(&merged.rows), vec!["kata_agent_up"]);
        assert_eq!(report.rows.pruned, 1);
        assert_eq!(report.rows.admitted, 1);
    }

    #[test]
    fn tail_policy_serde_names() {
        let policy: TailPolicy = serde_json::from_str("\"truncate\"").unwrap();
        assert_eq!(policy, TailPolicy::Truncate);
        assert_eq!(serde_json::to_string(&TailPolicy::AppendNew).unwrap(), "\"append-new\"");
    }
}
