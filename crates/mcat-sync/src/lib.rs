//! mcat Synchronization Engine
//!
//! Reconciles a freshly observed metrics snapshot with the persisted,
//! hand-curated catalog.
//!
//! # Core Concepts
//!
//! - [`Normalizer`]: Metric families → observed [`Catalog`](mcat_catalog::Catalog)
//! - [`merge_join`]: Two-cursor linear merge of key-sorted sequences
//! - [`MergeRule`]: Per-level combine rule ([`ValueRule`], [`LabelRule`],
//!   [`RowRule`], [`ComponentRule`])
//! - [`Reconciler`]: Bottom-up reconciliation of two catalogs
//! - [`SyncReport`]: Per-level admitted/combined/pruned counters
//!
//! The observed snapshot wins for structure (membership, type, help, unit,
//! `fixed`); the persisted catalog wins for curation (titles, descriptions,
//! manual locks, `since`).
//!
//! # Example
//!
//! ```rust,ignore
//! use mcat_sync::{Normalizer, Reconciler, SyncConfig};
//!
//! let config = SyncConfig::new().with_unfixed_labels(["sandbox_id"]);
//! let observed = Normalizer::from_config(&config).normalize(&families);
//! let (catalog, report) = Reconciler::from_config(&config).reconcile_with_report(persisted, observed);
//! println!("{report}");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod heuristics;
mod merge;
mod normalize;
mod reconcile;
mod record;
mod report;

pub use config::SyncConfig;
pub use heuristics::{infer_unit, ComponentGrouping, PrefixGrouping, UnfixedLabels, Unit};
pub use merge::{merge_join, ComponentRule, LabelRule, MergeRule, RowRule, TailPolicy, ValueRule};
pub use normalize::Normalizer;
pub use reconcile::Reconciler;
pub use record::{MetricFamily, Sample};
pub use report::{LevelStats, Outcome, SyncReport};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
