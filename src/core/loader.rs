//! Trip loading: database access and value coercion
//!
//! Rows are fetched as text and coerced here, so a malformed value turns into
//! a missing measure instead of failing the whole load.

use crate::core::models::{TripRecord, TripTable};
use crate::error::{GreenmoveError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Connection, Row};
use std::fmt;

/// Query returning every trip ordered by start time.
///
/// Numeric columns are cast to text and coerced by [`coerce_numeric`].
pub const TRIP_QUERY: &str = r#"
    SELECT
        utilisateur::text AS utilisateur,
        "startTime"::text AS start_time,
        mode_transport::text AS mode_transport,
        distance::text AS distance,
        duration_in_minutes::text AS duration_in_minutes,
        emission_co2::text AS emission_co2
    FROM tripanalyse.usagestat
    ORDER BY "startTime"
"#;

/// Timestamp layouts accepted for the start time, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Layouts carrying a UTC offset (`timestamptz` rendered as text).
const OFFSET_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"];

/// Database connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    /// Server host name
    pub host: String,
    /// Database name
    pub database: String,
    /// Login user
    pub user: String,
    /// Login password
    pub password: String,
    /// Server port
    pub port: u16,
}

impl ConnectionParams {
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

// The password never reaches logs.
impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"********")
            .field("port", &self.port)
            .finish()
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}

/// One row as read from the store, before coercion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTripRow {
    /// User identifier
    pub user: String,
    /// Start time as text
    pub start_time: Option<String>,
    /// Transport mode
    pub mode: String,
    /// Distance as text
    pub distance: Option<String>,
    /// Duration as text
    pub duration: Option<String>,
    /// Emission as text
    pub emission: Option<String>,
}

impl RawTripRow {
    /// Build a row from string slices
    #[must_use]
    pub fn new(
        user: &str,
        start_time: &str,
        mode: &str,
        distance: &str,
        duration: &str,
        emission: &str,
    ) -> Self {
        Self {
            user: user.to_string(),
            start_time: Some(start_time.to_string()),
            mode: mode.to_string(),
            distance: Some(distance.to_string()),
            duration: Some(duration.to_string()),
            emission: Some(emission.to_string()),
        }
    }

    fn from_pg_row(row: &PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(Self {
            user: row
                .try_get::<Option<String>, _>("utilisateur")?
                .unwrap_or_default(),
            start_time: row.try_get("start_time")?,
            mode: row
                .try_get::<Option<String>, _>("mode_transport")?
                .unwrap_or_default(),
            distance: row.try_get("distance")?,
            duration: row.try_get("duration_in_minutes")?,
            emission: row.try_get("emission_co2")?,
        })
    }
}

/// Anything able to produce raw trip rows
pub trait TripSource {
    /// Fetch every trip row
    ///
    /// # Errors
    /// Returns [`GreenmoveError::Connection`] or [`GreenmoveError::Query`] when
    /// the store cannot be read.
    fn fetch_rows(&self) -> Result<Vec<RawTripRow>>;
}

/// `PostgreSQL` trip source
///
/// Runs a single query on a current-thread runtime; no retry.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    params: ConnectionParams,
}

impl PostgresSource {
    /// Create a source for the given connection parameters
    #[must_use]
    pub const fn new(params: ConnectionParams) -> Self {
        Self { params }
    }

    async fn fetch_async(&self) -> Result<Vec<RawTripRow>> {
        logger::info!("Connecting to {}", self.params);
        let mut conn = PgConnection::connect_with(&self.params.connect_options())
            .await
            .map_err(GreenmoveError::Connection)?;

        let rows = sqlx::query(TRIP_QUERY)
            .fetch_all(&mut conn)
            .await
            .map_err(GreenmoveError::Query)?;

        let parsed = rows
            .iter()
            .map(RawTripRow::from_pg_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(GreenmoveError::Query)?;

        if let Err(e) = conn.close().await {
            logger::debug!("Closing the connection failed: {e}");
        }

        Ok(parsed)
    }
}

impl TripSource for PostgresSource {
    fn fetch_rows(&self) -> Result<Vec<RawTripRow>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.fetch_async())
    }
}

/// In-memory trip source
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Vec<RawTripRow>,
}

impl MemorySource {
    /// Create a source serving the given rows
    #[must_use]
    pub const fn new(rows: Vec<RawTripRow>) -> Self {
        Self { rows }
    }
}

impl TripSource for MemorySource {
    fn fetch_rows(&self) -> Result<Vec<RawTripRow>> {
        Ok(self.rows.clone())
    }
}

/// Coerce a textual measure to a number
///
/// Surrounding whitespace is ignored. Unparseable and non-finite values
/// yield `None`.
#[must_use]
pub fn coerce_numeric(raw: Option<&str>) -> Option<f64> {
    raw?.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Coerce a textual timestamp
///
/// Offsets are dropped after conversion to the local wall-clock time the
/// offset describes. A bare date maps to midnight.
#[must_use]
pub fn coerce_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let text = raw?.trim();

    OFFSET_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.naive_local())
        .or_else(|| {
            TIMESTAMP_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Load and coerce every row of `source` into a trip table
///
/// Rows without a readable start time cannot be placed on the timeline and
/// are dropped; missing measures are kept as `None`.
///
/// # Errors
/// Propagates the source error; no table is produced.
pub fn load_trip_table<S: TripSource + ?Sized>(source: &S) -> Result<TripTable> {
    let rows = source.fetch_rows()?;

    let mut dropped = 0usize;
    let mut missing = 0usize;
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let Some(start_time) = coerce_timestamp(row.start_time.as_deref()) else {
            dropped += 1;
            continue;
        };
        let record = TripRecord::new(
            row.user,
            start_time,
            row.mode,
            coerce_numeric(row.distance.as_deref()),
            coerce_numeric(row.duration.as_deref()),
            coerce_numeric(row.emission.as_deref()),
        );
        missing += record.missing_measures();
        records.push(record);
    }

    logger::info!("Loaded {} trips", records.len());
    if missing > 0 {
        logger::warn!("{missing} measure(s) could not be read and are treated as missing");
    }
    if dropped > 0 {
        logger::warn!("{dropped} row(s) without a readable start time were skipped");
    }

    Ok(TripTable::from_records(records))
}
