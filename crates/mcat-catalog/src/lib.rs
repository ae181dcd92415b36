//! mcat Catalog Model
//!
//! The curated metrics catalog: a four-level tree persisted as a YAML document
//! and refreshed from live metric snapshots.
//!
//! # Core Concepts
//!
//! - [`Catalog`]: Aggregate root (schema version + components)
//! - [`Component`]: Metrics sharing a derived name prefix
//! - [`Row`]: One metric family (type, unit, help, labels)
//! - [`Label`]: One label dimension, optionally with enumerated values
//! - [`LabelValue`]: One concrete value of a fixed label
//! - [`Keyed`]: Ordering key shared by every level
//!
//! Every level is an ordered sequence unique by key. Canonical order is
//! ascending byte-wise order of the key; see [`Catalog::canonicalize`].
//!
//! # Example
//!
//! ```rust,ignore
//! use mcat_catalog::Catalog;
//!
//! let catalog = Catalog::from_yaml(&std::fs::read_to_string("metrics.yaml")?)?;
//! for component in &catalog.components {
//!     println!("{}: {} metrics", component.prefix, component.rows.len());
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod catalog;
mod document;
mod error;
mod keyed;
mod label;
mod row;

pub use catalog::{Catalog, Component};
pub use error::{CatalogError, Level};
pub use keyed::{is_canonical, sort_by_key, Keyed};
pub use label::{Label, LabelValue};
pub use row::{MetricKind, Row, UnknownKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
