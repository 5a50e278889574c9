//! Error types for `Greenmove` analytics

use thiserror::Error;

/// Errors raised while loading trips or producing reports.
#[derive(Error, Debug)]
pub enum GreenmoveError {
    /// Missing or invalid configuration, detected before any network access.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The database could not be reached or refused the credentials.
    #[error("Database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    /// The trip query failed after the connection was established.
    #[error("Trip query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// No trip matches the requested user identifier.
    #[error("No data for user {0}")]
    NoUserData(String),

    /// The user aborted an interactive prompt.
    #[error("Interrupted by user")]
    Interrupted,

    /// Writing an artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTML template could not be rendered.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// A chart could not be drawn.
    #[error("Chart error: {0}")]
    Chart(String),

    /// The PDF document could not be assembled.
    #[error("PDF error: {0}")]
    Pdf(String),
}

impl GreenmoveError {
    /// Process exit code for this error.
    ///
    /// `2` configuration, `3` connection or query, `130` interruption, `1` otherwise.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Connection(_) | Self::Query(_) => 3,
            Self::Interrupted => 130,
            _ => 1,
        }
    }

    /// Whether the error only affects the current report and a batch may continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoUserData(_))
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GreenmoveError>;
