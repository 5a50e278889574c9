//! Derived series: speed and cumulative emissions
//!
//! Each function returns a new series; the table is never modified.

use crate::core::metrics::MeasureSum;
use crate::core::models::{TripRecord, TripTable};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// Average speed of a trip in km/h
///
/// `None` when a measure is missing or the duration is not positive.
#[must_use]
pub fn speed_kmh(trip: &TripRecord) -> Option<f64> {
    let distance = trip.distance_km?;
    let duration = trip.duration_min.filter(|d| *d > 0.0)?;
    Some(distance / (duration / 60.0))
}

/// Speed of every trip, in table order
#[must_use]
pub fn speeds_kmh(table: &TripTable) -> Vec<Option<f64>> {
    table.iter().map(speed_kmh).collect()
}

/// Mean trip speed per mode; modes without a usable speed are left out
#[must_use]
pub fn mean_speed_by_mode(table: &TripTable) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<&str, MeasureSum> = BTreeMap::new();
    for trip in table {
        if let Some(speed) = speed_kmh(trip) {
            sums.entry(trip.mode.as_str()).or_default().push(Some(speed));
        }
    }
    sums.into_iter()
        .filter_map(|(mode, sum)| sum.mean().map(|m| (mode.to_string(), m)))
        .collect()
}

/// Running emission total (g) at each trip start
#[must_use]
pub fn cumulative_emissions_g(table: &TripTable) -> Vec<(NaiveDateTime, f64)> {
    let mut total = 0.0;
    table
        .iter()
        .map(|trip| {
            total += trip.emission_g.unwrap_or(0.0);
            (trip.start_time, total)
        })
        .collect()
}

/// Distance of each trip over time; trips without a distance are left out
#[must_use]
pub fn distance_over_time(table: &TripTable) -> Vec<(NaiveDateTime, f64)> {
    table
        .iter()
        .filter_map(|trip| trip.distance_km.map(|d| (trip.start_time, d)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(hour: u32, mode: &str, distance: Option<f64>, duration: Option<f64>) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        TripRecord::new("u1", start, mode, distance, duration, Some(100.0))
    }

    #[test]
    fn test_speed_excludes_zero_and_missing_duration() {
        assert_eq!(speed_kmh(&trip(8, "bike", Some(5.0), Some(30.0))), Some(10.0));
        assert_eq!(speed_kmh(&trip(8, "bike", Some(5.0), Some(0.0))), None);
        assert_eq!(speed_kmh(&trip(8, "bike", None, Some(30.0))), None);
    }

    #[test]
    fn test_mean_speed_by_mode() {
        let table = TripTable::from_records(vec![
            trip(8, "bike", Some(5.0), Some(30.0)),
            trip(9, "bike", Some(10.0), Some(30.0)),
            trip(10, "walk", Some(1.0), None),
        ]);
        let speeds = mean_speed_by_mode(&table);
        assert_eq!(speeds.get("bike"), Some(&15.0));
        assert!(!speeds.contains_key("walk"));
        assert_eq!(speeds_kmh(&table).len(), 3);
    }

    #[test]
    fn test_cumulative_emissions() {
        let table = TripTable::from_records(vec![
            trip(8, "car", Some(5.0), Some(10.0)),
            trip(9, "car", Some(5.0), Some(10.0)),
        ]);
        let series = cumulative_emissions_g(&table);
        assert_eq!(series.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![100.0, 200.0]);
        assert_eq!(distance_over_time(&table).len(), 2);
    }
}
