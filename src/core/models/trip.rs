//! Trip records and the in-memory trip table

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One logged movement of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    /// User identifier
    pub user: String,

    /// Trip start time
    pub start_time: NaiveDateTime,

    /// Transport mode (open set: "car", "bike", "walk", ...)
    pub mode: String,

    /// Distance in kilometres
    pub distance_km: Option<f64>,

    /// Duration in minutes
    pub duration_min: Option<f64>,

    /// CO2 emission in grams
    pub emission_g: Option<f64>,
}

impl TripRecord {
    /// Create a new trip record
    ///
    /// # Arguments
    /// * `user` - User identifier
    /// * `start_time` - Trip start time
    /// * `mode` - Transport mode, kept verbatim
    /// * `distance_km` - Distance in km, `None` when missing
    /// * `duration_min` - Duration in minutes, `None` when missing
    /// * `emission_g` - Emission in grams, `None` when missing
    #[must_use]
    pub fn new(
        user: impl Into<String>,
        start_time: NaiveDateTime,
        mode: impl Into<String>,
        distance_km: Option<f64>,
        duration_min: Option<f64>,
        emission_g: Option<f64>,
    ) -> Self {
        Self {
            user: user.into(),
            start_time,
            mode: mode.into(),
            distance_km,
            duration_min,
            emission_g,
        }
    }

    /// Number of missing measures on this record
    #[must_use]
    pub fn missing_measures(&self) -> usize {
        [self.distance_km, self.duration_min, self.emission_g]
            .iter()
            .filter(|value| value.is_none())
            .count()
    }
}

/// Trip records ordered by start time
///
/// A table is built once and never mutated afterwards; every derivation
/// returns new values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripTable {
    trips: Vec<TripRecord>,
}

impl TripTable {
    /// Build a table from records, ordering them by start time.
    ///
    /// The sort is stable: records sharing a start time keep their input order.
    #[must_use]
    pub fn from_records(mut trips: Vec<TripRecord>) -> Self {
        trips.sort_by_key(|trip| trip.start_time);
        Self { trips }
    }

    /// All records, in start-time order
    #[must_use]
    pub fn trips(&self) -> &[TripRecord] {
        &self.trips
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.trips.iter()
    }

    /// Number of trips
    #[must_use]
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Whether the table holds no trip
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    /// The trips of one user, as a new table
    ///
    /// Matching is exact on the identifier. The slice is empty when the user
    /// has no trip.
    #[must_use]
    pub fn for_user(&self, user: &str) -> Self {
        Self {
            trips: self
                .trips
                .iter()
                .filter(|trip| trip.user == user)
                .cloned()
                .collect(),
        }
    }

    /// Distinct user identifiers, sorted
    #[must_use]
    pub fn users(&self) -> BTreeSet<&str> {
        self.trips.iter().map(|trip| trip.user.as_str()).collect()
    }

    /// Distinct transport modes, sorted
    #[must_use]
    pub fn modes(&self) -> BTreeSet<&str> {
        self.trips.iter().map(|trip| trip.mode.as_str()).collect()
    }

    /// Present distance values, in table order
    #[must_use]
    pub fn distances(&self) -> Vec<f64> {
        self.trips.iter().filter_map(|trip| trip.distance_km).collect()
    }

    /// Present emission values, in table order
    #[must_use]
    pub fn emissions(&self) -> Vec<f64> {
        self.trips.iter().filter_map(|trip| trip.emission_g).collect()
    }
}

impl<'a> IntoIterator for &'a TripTable {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_from_records_orders_by_start_time() {
        let table = TripTable::from_records(vec![
            TripRecord::new("u2", at(5, 9), "car", Some(10.0), Some(15.0), Some(1200.0)),
            TripRecord::new("u1", at(2, 8), "bike", Some(4.0), Some(20.0), Some(5.0)),
            TripRecord::new("u3", at(5, 9), "walk", Some(1.0), Some(12.0), Some(0.0)),
        ]);

        let users: Vec<&str> = table.iter().map(|t| t.user.as_str()).collect();
        assert_eq!(users, vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn test_for_user_is_exact() {
        let table = TripTable::from_records(vec![
            TripRecord::new("alice", at(1, 8), "bike", Some(2.0), None, None),
            TripRecord::new("Alice", at(1, 9), "bike", Some(3.0), None, None),
        ]);

        assert_eq!(table.for_user("alice").len(), 1);
        assert!(table.for_user("bob").is_empty());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_measures() {
        let trip = TripRecord::new("u1", at(1, 8), "bus", None, Some(10.0), None);
        assert_eq!(trip.missing_measures(), 2);
        assert_eq!(table_of(&trip).distances(), Vec::<f64>::new());
    }

    fn table_of(trip: &TripRecord) -> TripTable {
        TripTable::from_records(vec![trip.clone()])
    }
}
