//! CLI command handlers for `Greenmove`.
//!
//! The report runner covers every scope flag; `config` manages the settings file.

pub mod config;
pub mod report;
pub mod stats;
