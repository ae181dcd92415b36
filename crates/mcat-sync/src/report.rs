//! Synchronization statistics

use std::fmt;

use mcat_catalog::Level;
use serde::Serialize;

/// What happened to one key during a merge-join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Only in the new snapshot: admitted as-is
    Admitted,
    /// In both: combined by the level rule
    Combined,
    /// Only in the old catalog: dropped as stale
    Pruned,
    /// New-only entry past the exhausted old cursor, dropped by
    /// [`TailPolicy::Truncate`](crate::TailPolicy::Truncate)
    Skipped,
    /// Value list left untouched because the label is manually edited
    Locked,
}

/// Counters for one catalog level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// New entries admitted
    pub admitted: usize,
    /// Matching entries combined
    pub combined: usize,
    /// Stale entries pruned
    pub pruned: usize,
    /// New entries lost to tail truncation
    pub skipped: usize,
    /// Entries whose children were locked against updates
    pub locked: usize,
}

impl LevelStats {
    /// Count one outcome
    #[inline]
    pub fn record(&mut self, outcome: Outcome) {
        self.record_many(outcome, 1);
    }

    /// Count `n` identical outcomes
    #[inline]
    pub fn record_many(&mut self, outcome: Outcome, n: usize) {
        let slot = match outcome {
            Outcome::Admitted => &mut self.admitted,
            Outcome::Combined => &mut self.combined,
            Outcome::Pruned => &mut self.pruned,
            Outcome::Skipped => &mut self.skipped,
            Outcome::Locked => &mut self.locked,
        };
        *slot += n;
    }

    /// True when entries were added or removed at this level
    #[inline]
    #[must_use]
    pub fn has_membership_changes(&self) -> bool {
        self.admitted > 0 || self.pruned > 0 || self.skipped > 0
    }
}

impl fmt::Display for LevelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{} ={} -{}", self.admitted, self.combined, self.pruned)?;
        if self.skipped > 0 {
            write!(f, " skipped {}", self.skipped)?;
        }
        if self.locked > 0 {
            write!(f, " locked {}", self.locked)?;
        }
        Ok(())
    }
}

/// Per-level statistics for one reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Component level
    pub components: LevelStats,
    /// Metric level
    pub rows: LevelStats,
    /// Label level
    pub labels: LevelStats,
    /// Label value level
    pub values: LevelStats,
}

impl SyncReport {
    /// Stats for a level
    #[must_use]
    pub fn level(&self, level: Level) -> &LevelStats {
        match level {
            Level::Component => &self.components,
            Level::Row => &self.rows,
            Level::Label => &self.labels,
            Level::LabelValue => &self.values,
        }
    }

    /// Mutable stats for a level
    pub fn level_mut(&mut self, level: Level) -> &mut LevelStats {
        match level {
            Level::Component => &mut self.components,
            Level::Row => &mut self.rows,
            Level::Label => &mut self.labels,
            Level::LabelValue => &mut self.values,
        }
    }

    /// Count one outcome at a level
    #[inline]
    pub fn record(&mut self, level: Level, outcome: Outcome) {
        self.level_mut(level).record(outcome);
    }

    /// True when any level gained or lost entries
    #[must_use]
    pub fn has_membership_changes(&self) -> bool {
        Level::ALL
            .into_iter()
            .any(|level| self.level(level).has_membership_changes())
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, level) in Level::ALL.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{level}s {}", self.level(level))?;
        }
        Ok(())
    }
}
