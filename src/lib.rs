//! Shared library for `Greenmove` analytics
//! Contains the trip loader, the aggregations and the report renderers used by the CLI.

pub mod config;
pub mod core;
pub mod error;

pub use error::{GreenmoveError, Result};

/// Returns the current version of the `greenmove-analytics` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
