//! Core module: trip loading, aggregation and report generation

pub mod derive;
pub mod distribution;
pub mod intensity;
pub mod loader;
pub mod metrics;
pub mod models;
pub mod recommendations;
pub mod report;
pub mod temporal;
pub mod users;
