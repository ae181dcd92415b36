//! mcat Exposition
//!
//! Turns a Prometheus endpoint into decoded [`MetricFamily`](mcat_sync::MetricFamily)
//! records for the normalizer.
//!
//! - [`decode`]: Text exposition format → metric families
//! - [`MetricSource`]: HTTP, file or stdin location → raw exposition text

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod decode;
mod error;
mod source;

pub use decode::decode;
pub use error::{DecodeError, SourceError};
pub use source::{MetricSource, DEFAULT_TIMEOUT};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
