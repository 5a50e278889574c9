//! Temporal distribution of trips

use crate::core::models::TripTable;
use chrono::{Datelike, NaiveDate, Timelike};
use std::collections::BTreeMap;

/// Weekday names, Monday first
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Trip counts by weekday (Monday first) and hour of day
pub type WeekdayHourMatrix = [[usize; 24]; 7];

/// Trips per calendar day, days without trips omitted
#[must_use]
pub fn trips_per_day(table: &TripTable) -> BTreeMap<NaiveDate, usize> {
    let mut days = BTreeMap::new();
    for trip in table {
        *days.entry(trip.start_time.date()).or_insert(0) += 1;
    }
    days
}

/// Trips per weekday, Monday first
#[must_use]
pub fn trips_per_weekday(table: &TripTable) -> [usize; 7] {
    let mut counts = [0usize; 7];
    for trip in table {
        counts[trip.start_time.weekday().num_days_from_monday() as usize] += 1;
    }
    counts
}

/// Trips per hour of day
#[must_use]
pub fn trips_per_hour(table: &TripTable) -> [usize; 24] {
    let mut counts = [0usize; 24];
    for trip in table {
        counts[trip.start_time.hour() as usize] += 1;
    }
    counts
}

/// Weekday by hour density matrix
#[must_use]
pub fn weekday_hour_matrix(table: &TripTable) -> WeekdayHourMatrix {
    let mut matrix = [[0usize; 24]; 7];
    for trip in table {
        let day = trip.start_time.weekday().num_days_from_monday() as usize;
        matrix[day][trip.start_time.hour() as usize] += 1;
    }
    matrix
}

/// Index of the largest count; ties go to the first index
///
/// `None` when every count is zero.
#[must_use]
pub fn peak_index(counts: &[usize]) -> Option<usize> {
    counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .fold(None, |best: Option<(usize, usize)>, (i, count)| match best {
            Some((_, c)) if c >= *count => best,
            _ => Some((i, *count)),
        })
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::TripRecord;

    fn trip_at(day: u32, hour: u32) -> TripRecord {
        // March 2024: the 4th is a Monday.
        let start = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap();
        TripRecord::new("u1", start, "bus", Some(5.0), Some(10.0), Some(50.0))
    }

    #[test]
    fn test_distributions() {
        let table = TripTable::from_records(vec![
            trip_at(4, 8),
            trip_at(4, 18),
            trip_at(5, 8),
            trip_at(10, 11),
        ]);

        let weekdays = trips_per_weekday(&table);
        assert_eq!(weekdays[0], 2);
        assert_eq!(weekdays[1], 1);
        assert_eq!(weekdays[6], 1);

        let hours = trips_per_hour(&table);
        assert_eq!(hours[8], 2);
        assert_eq!(hours.iter().sum::<usize>(), 4);

        let matrix = weekday_hour_matrix(&table);
        assert_eq!(matrix[0][8], 1);
        assert_eq!(matrix[0][18], 1);
        assert_eq!(matrix[1][8], 1);

        assert_eq!(trips_per_day(&table).len(), 3);
    }

    #[test]
    fn test_peak_index() {
        assert_eq!(peak_index(&[0, 3, 5, 5, 1]), Some(2));
        assert_eq!(peak_index(&[0, 0]), None);
        assert_eq!(peak_index(&[]), None);
    }
}
