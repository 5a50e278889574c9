//! Per-user totals and rankings

use crate::core::metrics::MeasureSum;
use crate::core::models::TripTable;
use std::collections::BTreeMap;

/// Totals for one user
#[derive(Debug, Clone, PartialEq)]
pub struct UserTotals {
    /// User identifier
    pub user: String,
    /// Number of trips
    pub trip_count: usize,
    /// Total distance (km)
    pub total_distance_km: f64,
    /// Total duration (minutes)
    pub total_duration_min: f64,
    /// Total emission (g)
    pub total_emission_g: f64,
}

/// Ranking criterion for top-user lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRanking {
    /// Most trips
    Trips,
    /// Longest total distance
    Distance,
    /// Largest total emission
    Emissions,
}

/// Totals for every user, ordered by identifier
#[must_use]
pub fn user_totals(table: &TripTable) -> Vec<UserTotals> {
    let mut groups: BTreeMap<&str, (usize, MeasureSum, MeasureSum, MeasureSum)> = BTreeMap::new();
    for trip in table {
        let entry = groups.entry(trip.user.as_str()).or_default();
        entry.0 += 1;
        entry.1.push(trip.distance_km);
        entry.2.push(trip.duration_min);
        entry.3.push(trip.emission_g);
    }

    groups
        .into_iter()
        .map(|(user, (trips, distance, duration, emission))| UserTotals {
            user: user.to_string(),
            trip_count: trips,
            total_distance_km: distance.sum,
            total_duration_min: duration.sum,
            total_emission_g: emission.sum,
        })
        .collect()
}

/// The `n` highest-ranked users, largest first; ties by identifier ascending
#[must_use]
pub fn top_users(table: &TripTable, by: UserRanking, n: usize) -> Vec<UserTotals> {
    let mut totals = user_totals(table);
    // Input is sorted by identifier and the sort is stable.
    match by {
        UserRanking::Trips => totals.sort_by(|a, b| b.trip_count.cmp(&a.trip_count)),
        UserRanking::Distance => {
            totals.sort_by(|a, b| b.total_distance_km.total_cmp(&a.total_distance_km));
        }
        UserRanking::Emissions => {
            totals.sort_by(|a, b| b.total_emission_g.total_cmp(&a.total_emission_g));
        }
    }
    totals.truncate(n);
    totals
}

/// Identifiers of the `n` users with the most trips
#[must_use]
pub fn most_active_users(table: &TripTable, n: usize) -> Vec<String> {
    top_users(table, UserRanking::Trips, n)
        .into_iter()
        .map(|totals| totals.user)
        .collect()
}

/// Number of trips of each user, ordered by identifier
#[must_use]
pub fn trips_per_user(table: &TripTable) -> Vec<usize> {
    user_totals(table).iter().map(|t| t.trip_count).collect()
}

/// Mode used for the most trips; ties go to the first mode name
#[must_use]
pub fn favourite_mode(table: &TripTable) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for trip in table {
        *counts.entry(trip.mode.as_str()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .fold(None, |best: Option<(&str, usize)>, (mode, count)| match best {
            Some((_, c)) if c >= count => best,
            _ => Some((mode, count)),
        })
        .map(|(mode, _)| mode.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::TripRecord;
    use chrono::NaiveDate;

    fn trip(user: &str, mode: &str, distance: f64, emission: f64) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        TripRecord::new(user, start, mode, Some(distance), Some(10.0), Some(emission))
    }

    fn sample() -> TripTable {
        TripTable::from_records(vec![
            trip("carol", "car", 30.0, 5000.0),
            trip("bob", "bike", 3.0, 0.0),
            trip("bob", "bike", 4.0, 0.0),
            trip("alice", "walk", 1.0, 0.0),
            trip("alice", "bus", 6.0, 400.0),
        ])
    }

    #[test]
    fn test_top_users_by_trips_breaks_ties_by_id() {
        let top = most_active_users(&sample(), 2);
        assert_eq!(top, vec!["alice".to_string(), "bob".to_string()]);
    }

    #[test]
    fn test_top_users_by_distance_and_emissions() {
        let table = sample();
        assert_eq!(top_users(&table, UserRanking::Distance, 1)[0].user, "carol");
        let by_emission = top_users(&table, UserRanking::Emissions, 3);
        assert_eq!(by_emission[0].user, "carol");
        assert_eq!(by_emission[1].user, "alice");
        assert_eq!(by_emission[2].user, "bob");
    }

    #[test]
    fn test_favourite_mode() {
        let table = sample();
        assert_eq!(favourite_mode(&table.for_user("bob")), Some("bike".to_string()));
        assert_eq!(favourite_mode(&table.for_user("alice")), Some("bus".to_string()));
        assert_eq!(favourite_mode(&TripTable::default()), None);
    }

    #[test]
    fn test_trips_per_user() {
        assert_eq!(trips_per_user(&sample()), vec![2, 2, 1]);
    }
}
