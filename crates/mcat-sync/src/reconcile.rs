//! Catalog reconciler
//!
//! Drives the merge-join bottom-up through the component rule: label values
//! inside labels, labels inside rows, rows inside components.

use mcat_catalog::Catalog;

use crate::config::SyncConfig;
use crate::merge::{merge_join, ComponentRule, TailPolicy};
use crate::report::SyncReport;

/// Reconciles a persisted catalog with an observed one
///
/// The persisted catalog is authoritative for curation (titles,
/// descriptions, manual locks, `since`); the observed catalog is
/// authoritative for structure (membership, types, help, units, `fixed`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    tail: TailPolicy,
}

impl Reconciler {
    /// Create reconciler with the default tail policy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create reconciler from configuration
    #[inline]
    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new().with_tail_policy(config.tail_policy)
    }

    /// With tail policy
    #[inline]
    #[must_use]
    pub fn with_tail_policy(mut self, tail: TailPolicy) -> Self {
        self.tail = tail;
        self
    }

    /// Configured tail policy
    #[inline]
    #[must_use]
    pub fn tail_policy(&self) -> TailPolicy {
        self.tail
    }

    /// Reconcile and return the updated catalog
    #[must_use]
    pub fn reconcile(&self, current: Catalog, observed: Catalog) -> Catalog {
        self.reconcile_with_report(current, observed).0
    }

    /// Reconcile and also return per-level statistics
    ///
    /// When `current` has no components, the observed components are taken
    /// over wholesale. The catalog version is never changed.
    #[must_use]
    pub fn reconcile_with_report(&self, current: Catalog, mut observed: Catalog) -> (Catalog, SyncReport) {
        let mut report = SyncReport::default();
        let bootstrap = current.is_empty();
        observed.canonicalize();

        let components = merge_join(
            current.components,
            observed.components,
            &ComponentRule::new(self.tail),
            self.tail,
            &mut report,
        );
        let catalog = Catalog {
            version: current.version,
            components,
        };

        if bootstrap {
            tracing::info!(
                components = catalog.components.len(),
                metrics = catalog.row_count(),
                "Bootstrapped empty catalog from snapshot"
            );
        } else {
            tracing::info!(
                components = catalog.components.len(),
                metrics = catalog.row_count(),
                "Reconciled catalog: {report}"
            );
        }
        if report.labels.locked > 0 {
            tracing::debug!("{} manually edited labels left untouched", report.labels.locked);
        }
        if report.has_membership_changes() {
            tracing::debug!(?report, "Catalog membership changed");
        }

        (catalog, report)
    }

    /// Reconcile in place
    pub fn synchronize(&self, catalog: &mut Catalog, observed: Catalog) -> SyncReport {
        let current = std::mem::take(catalog);
        let (updated, report) = self.reconcile_with_report(current, observed);
        *catalog = updated;
        report
    }
}
