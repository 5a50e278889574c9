//! Data models for `Greenmove` analytics

pub mod trip;

pub use trip::{TripRecord, TripTable};
