//! Narrative recommendations and carbon equivalences

use crate::core::intensity::IntensityThresholds;
use crate::core::metrics::{grams_to_kg, Aggregates};
use crate::core::models::{TripRecord, TripTable};

/// Mode name identifying car trips
pub const CAR_MODE: &str = "car";

/// Car trips strictly under this distance (km) are considered convertible
pub const SHORT_TRIP_KM: f64 = 5.0;

/// kg CO2 of one Paris-Lyon high-speed train trip
pub const TRAIN_TRIP_KG: f64 = 0.2;
/// kg CO2 of one Paris-New York return flight
pub const RETURN_FLIGHT_KG: f64 = 2100.0;
/// kg CO2 counted per kg of beef produced
pub const BEEF_KG: f64 = 0.4;
/// Trees needed per kg CO2 for a one-year offset
pub const TREES_PER_KG: f64 = 0.09;

/// Reduction advice printed in every report
pub const GENERIC_RECOMMENDATIONS: [&str; 4] = [
    "Prefer public transport for urban trips",
    "Use a bike for trips under 5 km",
    "Share car rides",
    "Group errands to cut the number of trips",
];

/// Mode producing the most emissions
#[derive(Debug, Clone, PartialEq)]
pub struct HighestEmitter {
    /// Mode name
    pub mode: String,
    /// Emission sum (g)
    pub emission_g: f64,
    /// Share of the total emission (%)
    pub share_percent: f64,
}

/// Car trips shorter than [`SHORT_TRIP_KM`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortCarTrips {
    /// The trips, in table order
    pub trips: Vec<TripRecord>,
    /// Their total distance (km)
    pub total_distance_km: f64,
    /// Their total emission (g), the potential saving
    pub total_emission_g: f64,
}

impl ShortCarTrips {
    /// Collect the short car trips of a table
    #[must_use]
    pub fn collect(table: &TripTable) -> Self {
        let trips: Vec<TripRecord> = table
            .iter()
            .filter(|t| t.mode == CAR_MODE && t.distance_km.is_some_and(|d| d < SHORT_TRIP_KM))
            .cloned()
            .collect();
        Self {
            total_distance_km: trips.iter().filter_map(|t| t.distance_km).sum(),
            total_emission_g: trips.iter().filter_map(|t| t.emission_g).sum(),
            trips,
        }
    }

    /// Number of short car trips
    #[must_use]
    pub fn count(&self) -> usize {
        self.trips.len()
    }
}

/// Mode whose intensity exceeds the recommended target
#[derive(Debug, Clone, PartialEq)]
pub struct ModeAboveTarget {
    /// Mode name
    pub mode: String,
    /// Carbon intensity (g/km)
    pub g_per_km: f64,
    /// Above the priority threshold
    pub priority: bool,
}

/// Recommendations derived from a table
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendations {
    /// Mode with the largest emission sum
    pub highest_emitter: Option<HighestEmitter>,
    /// Car trips that could be walked or cycled
    pub short_car_trips: ShortCarTrips,
    /// Modes above the recommended target, most intensive first
    pub above_target: Vec<ModeAboveTarget>,
}

impl Recommendations {
    /// Derive recommendations from a table and its aggregates
    #[must_use]
    pub fn build(table: &TripTable, aggregates: &Aggregates, thresholds: &IntensityThresholds) -> Self {
        let highest_emitter = aggregates
            .highest_emitter()
            .filter(|m| m.total_emission_g > 0.0)
            .and_then(|m| {
                aggregates.emission_share(&m.mode).map(|share| HighestEmitter {
                    mode: m.mode.clone(),
                    emission_g: m.total_emission_g,
                    share_percent: share,
                })
            });

        let mut above_target: Vec<ModeAboveTarget> = aggregates
            .modes
            .values()
            .filter_map(|m| m.intensity_g_per_km.map(|g| (m, g)))
            .filter(|(_, g)| *g > thresholds.target)
            .map(|(m, g)| ModeAboveTarget {
                mode: m.mode.clone(),
                g_per_km: g,
                priority: thresholds.is_priority(g),
            })
            .collect();
        above_target.sort_by(|a, b| b.g_per_km.total_cmp(&a.g_per_km));

        Self {
            highest_emitter,
            short_car_trips: ShortCarTrips::collect(table),
            above_target,
        }
    }

    /// Recommendation sentences, most specific first
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(top) = &self.highest_emitter {
            lines.push(format!(
                "Mode '{}' accounts for {:.1}% of total emissions. Prefer lower-emission alternatives for these trips.",
                top.mode, top.share_percent
            ));
        }

        let short = &self.short_car_trips;
        if short.count() > 0 {
            lines.push(format!(
                "{} car trip(s) are shorter than {SHORT_TRIP_KM} km ({:.1} km, {:.2} kg CO2). They could be cycled or walked.",
                short.count(),
                short.total_distance_km,
                grams_to_kg(short.total_emission_g)
            ));
        }

        for mode in &self.above_target {
            let label = if mode.priority { "Priority: mode" } else { "Mode" };
            lines.push(format!(
                "{label} '{}' emits {:.1} g CO2/km, above the recommended target.",
                mode.mode, mode.g_per_km
            ));
        }

        lines
    }
}

/// Everyday equivalents of an emission mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonEquivalences {
    /// Emission (kg)
    pub emission_kg: f64,
    /// Paris-Lyon train trips
    pub train_trips: f64,
    /// Paris-New York return flights
    pub return_flights: f64,
    /// kg of beef produced
    pub beef_kg: f64,
    /// Trees needed for a one-year offset
    pub trees: f64,
}

impl CarbonEquivalences {
    /// Equivalents of an emission mass in grams
    #[must_use]
    pub fn from_grams(emission_g: f64) -> Self {
        let kg = grams_to_kg(emission_g);
        Self {
            emission_kg: kg,
            train_trips: kg / TRAIN_TRIP_KG,
            return_flights: kg / RETURN_FLIGHT_KG,
            beef_kg: kg / BEEF_KG,
            trees: kg * TREES_PER_KG,
        }
    }

    /// Labelled equivalence lines
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("{:.0} Paris-Lyon high-speed train trips", self.train_trips),
            format!("{:.2} Paris-New York return flights", self.return_flights),
            format!("{:.0} kg of beef produced", self.beef_kg),
            format!("{:.0} trees needed to offset it over one year", self.trees),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(mode: &str, distance: f64, emission: f64) -> TripRecord {
        let start = NaiveDate::from_ymd_opt(2024, 1, 8)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        TripRecord::new("u1", start, mode, Some(distance), Some(10.0), Some(emission))
    }

    #[test]
    fn test_short_car_trip_is_flagged() {
        let table = TripTable::from_records(vec![trip("car", 3.0, 600.0), trip("bike", 3.0, 0.0)]);
        let agg = Aggregates::compute(&table);
        let recs = Recommendations::build(&table, &agg, &IntensityThresholds::default());

        assert_eq!(recs.short_car_trips.count(), 1);
        assert_eq!(recs.short_car_trips.trips[0].mode, "car");
        assert_eq!(recs.highest_emitter.as_ref().map(|h| h.share_percent), Some(100.0));
        assert_eq!(recs.above_target.len(), 1);
        assert!(recs.above_target[0].priority);
        assert_eq!(recs.lines().len(), 3);
    }

    #[test]
    fn test_car_trip_at_five_km_is_not_short() {
        let table = TripTable::from_records(vec![trip("car", 5.0, 800.0), trip("Car", 2.0, 300.0)]);
        assert_eq!(ShortCarTrips::collect(&table).count(), 0);
    }

    #[test]
    fn test_no_emissions_no_highest_emitter() {
        let table = TripTable::from_records(vec![trip("walk", 2.0, 0.0)]);
        let agg = Aggregates::compute(&table);
        let recs = Recommendations::build(&table, &agg, &IntensityThresholds::default());
        assert!(recs.highest_emitter.is_none());
        assert!(recs.lines().is_empty());
    }

    #[test]
    fn test_equivalences() {
        let eq = CarbonEquivalences::from_grams(4200.0);
        assert_eq!(eq.emission_kg, 4.2);
        assert!((eq.train_trips - 21.0).abs() < 1e-9);
        assert!((eq.return_flights - 0.002).abs() < 1e-9);
        assert!((eq.trees - 0.378).abs() < 1e-9);
    }
}
