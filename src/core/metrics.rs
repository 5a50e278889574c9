//! Global and per-mode trip aggregates

use crate::core::models::{TripRecord, TripTable};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Grams per kilogram.
pub const GRAMS_PER_KG: f64 = 1000.0;

/// Per-mode statistics keyed by mode name, in byte order.
pub type ModeStatsByMode = BTreeMap<String, ModeStats>;

/// Convert an emission mass from grams to kilograms
#[must_use]
pub fn grams_to_kg(grams: f64) -> f64 {
    grams / GRAMS_PER_KG
}

/// Running sum of an optional measure
///
/// Missing values are skipped by both the sum and the mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeasureSum {
    /// Sum of present values
    pub sum: f64,
    /// Number of present values
    pub count: usize,
}

impl MeasureSum {
    /// Add a value; `None` is ignored
    pub fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    /// Mean of present values, `None` when there are none
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        #[allow(clippy::cast_precision_loss)]
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Dataset-wide statistics
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalStats {
    /// Number of distinct users
    pub user_count: usize,
    /// Number of trips
    pub trip_count: usize,
    /// Total distance (km)
    pub total_distance_km: f64,
    /// Mean distance per trip (km)
    pub mean_distance_km: Option<f64>,
    /// Total duration (minutes)
    pub total_duration_min: f64,
    /// Mean duration per trip (minutes)
    pub mean_duration_min: Option<f64>,
    /// Total emission (g)
    pub total_emission_g: f64,
    /// Mean emission per trip (g)
    pub mean_emission_g: Option<f64>,
    /// Earliest start time
    pub period_start: Option<NaiveDateTime>,
    /// Latest start time
    pub period_end: Option<NaiveDateTime>,
}

impl GlobalStats {
    /// Total emission in kilograms
    #[must_use]
    pub fn total_emission_kg(&self) -> f64 {
        grams_to_kg(self.total_emission_g)
    }

    /// Fleet carbon intensity (g/km), `None` without distance
    #[must_use]
    pub fn intensity_g_per_km(&self) -> Option<f64> {
        intensity(self.total_emission_g, self.total_distance_km)
    }
}

/// Statistics for one transport mode
#[derive(Debug, Clone, PartialEq)]
pub struct ModeStats {
    /// Mode name
    pub mode: String,
    /// Number of trips
    pub trip_count: usize,
    /// Total distance (km)
    pub total_distance_km: f64,
    /// Mean distance (km)
    pub mean_distance_km: Option<f64>,
    /// Total duration (minutes)
    pub total_duration_min: f64,
    /// Mean duration (minutes)
    pub mean_duration_min: Option<f64>,
    /// Total emission (g)
    pub total_emission_g: f64,
    /// Mean emission (g)
    pub mean_emission_g: Option<f64>,
    /// Emission sum over distance sum (g/km), `None` when the distance sum is zero
    pub intensity_g_per_km: Option<f64>,
}

/// Both aggregate structures, computed together
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    /// Dataset-wide statistics
    pub global: GlobalStats,
    /// Per-mode statistics
    pub modes: ModeStatsByMode,
}

impl Aggregates {
    /// Compute global and per-mode statistics for a table
    #[must_use]
    pub fn compute(table: &TripTable) -> Self {
        Self {
            global: compute_global_stats(table),
            modes: compute_mode_stats(table),
        }
    }

    /// Share of trips made with `mode`, in percent
    #[must_use]
    pub fn trip_share(&self, mode: &str) -> Option<f64> {
        #[allow(clippy::cast_precision_loss)]
        let count = self.modes.get(mode)?.trip_count as f64;
        #[allow(clippy::cast_precision_loss)]
        percentage(count, self.global.trip_count as f64)
    }

    /// Share of the total distance covered with `mode`, in percent
    #[must_use]
    pub fn distance_share(&self, mode: &str) -> Option<f64> {
        percentage(
            self.modes.get(mode)?.total_distance_km,
            self.global.total_distance_km,
        )
    }

    /// Share of the total emission produced by `mode`, in percent
    #[must_use]
    pub fn emission_share(&self, mode: &str) -> Option<f64> {
        percentage(
            self.modes.get(mode)?.total_emission_g,
            self.global.total_emission_g,
        )
    }

    /// Mode with the largest emission sum; ties go to the first name
    #[must_use]
    pub fn highest_emitter(&self) -> Option<&ModeStats> {
        self.modes.values().fold(None, |best, stats| match best {
            Some(b) if b.total_emission_g >= stats.total_emission_g => Some(b),
            _ => Some(stats),
        })
    }
}

/// `part / whole * 100`, `None` when `whole` is zero
#[must_use]
pub fn percentage(part: f64, whole: f64) -> Option<f64> {
    (whole != 0.0).then(|| part / whole * 100.0)
}

fn intensity(emission_g: f64, distance_km: f64) -> Option<f64> {
    (distance_km != 0.0).then(|| emission_g / distance_km)
}

#[derive(Default)]
struct Accumulator {
    trips: usize,
    distance: MeasureSum,
    duration: MeasureSum,
    emission: MeasureSum,
}

impl Accumulator {
    fn push(&mut self, trip: &TripRecord) {
        self.trips += 1;
        self.distance.push(trip.distance_km);
        self.duration.push(trip.duration_min);
        self.emission.push(trip.emission_g);
    }
}

/// Compute dataset-wide statistics
///
/// An empty table yields zero sums and `None` means and period bounds.
#[must_use]
pub fn compute_global_stats(table: &TripTable) -> GlobalStats {
    let mut acc = Accumulator::default();
    for trip in table {
        acc.push(trip);
    }

    GlobalStats {
        user_count: table.users().len(),
        trip_count: acc.trips,
        total_distance_km: acc.distance.sum,
        mean_distance_km: acc.distance.mean(),
        total_duration_min: acc.duration.sum,
        mean_duration_min: acc.duration.mean(),
        total_emission_g: acc.emission.sum,
        mean_emission_g: acc.emission.mean(),
        period_start: table.iter().map(|t| t.start_time).min(),
        period_end: table.iter().map(|t| t.start_time).max(),
    }
}

/// Compute statistics per transport mode
///
/// Modes are grouped on exact string equality.
#[must_use]
pub fn compute_mode_stats(table: &TripTable) -> ModeStatsByMode {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for trip in table {
        groups.entry(trip.mode.as_str()).or_default().push(trip);
    }

    groups
        .into_iter()
        .map(|(mode, acc)| {
            let stats = ModeStats {
                mode: mode.to_string(),
                trip_count: acc.trips,
                total_distance_km: acc.distance.sum,
                mean_distance_km: acc.distance.mean(),
                total_duration_min: acc.duration.sum,
                mean_duration_min: acc.duration.mean(),
                total_emission_g: acc.emission.sum,
                mean_emission_g: acc.emission.mean(),
                intensity_g_per_km: intensity(acc.emission.sum, acc.distance.sum),
            };
            (mode.to_string(), stats)
        })
        .collect()
}
