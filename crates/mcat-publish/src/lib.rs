//! mcat Publish
//!
//! Egress side of a sync run:
//! - [`CatalogStore`]: load and atomically replace the persisted YAML catalog
//! - [`MarkdownRenderer`]: render the catalog as a Markdown reference table
//!
//! Both writers copy the previous file to `<path>.bak` before replacing it.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod markdown;
mod store;

pub use error::PublishError;
pub use markdown::{MarkdownRenderer, RenderOptions};
pub use store::{backup_path, replace_file, CatalogStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
