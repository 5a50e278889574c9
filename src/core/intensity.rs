//! Carbon-intensity tiers and ranking

use crate::core::metrics::ModeStatsByMode;
use std::fmt;

/// Intensity thresholds (g CO2/km) and the recommended fleet target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityThresholds {
    /// Upper bound of the low tier
    pub low: f64,
    /// Upper bound of the moderate tier
    pub moderate: f64,
    /// Intensities above this are flagged as a priority
    pub high: f64,
    /// Recommended fleet intensity
    pub target: f64,
}

impl Default for IntensityThresholds {
    fn default() -> Self {
        Self {
            low: 15.0,
            moderate: 50.0,
            high: 100.0,
            target: 50.0,
        }
    }
}

impl IntensityThresholds {
    /// Validated thresholds
    ///
    /// # Errors
    /// Returns a message unless `0 <= low < moderate < high` and `target > 0`,
    /// all finite.
    pub fn new(low: f64, moderate: f64, high: f64, target: f64) -> Result<Self, String> {
        if ![low, moderate, high, target].iter().all(|v| v.is_finite()) {
            return Err("Intensity thresholds must be finite numbers".to_string());
        }
        if !(0.0 <= low && low < moderate && moderate < high) {
            return Err(format!(
                "Intensity thresholds must increase: low {low} < moderate {moderate} < high {high}"
            ));
        }
        if target <= 0.0 {
            return Err(format!("Target intensity must be positive, got {target}"));
        }
        Ok(Self {
            low,
            moderate,
            high,
            target,
        })
    }

    /// Tier of an intensity: low up to `low`, moderate up to `moderate`, high above
    #[must_use]
    pub fn tier(&self, g_per_km: f64) -> IntensityTier {
        if g_per_km <= self.low {
            IntensityTier::Low
        } else if g_per_km <= self.moderate {
            IntensityTier::Moderate
        } else {
            IntensityTier::High
        }
    }

    /// Whether an intensity exceeds the priority threshold
    #[must_use]
    pub fn is_priority(&self, g_per_km: f64) -> bool {
        g_per_km > self.high
    }

    /// Percentage reduction needed to bring `current` down to the target
    ///
    /// Zero when already at or below the target.
    #[must_use]
    pub fn required_reduction(&self, current: f64) -> f64 {
        if current <= self.target || current <= 0.0 {
            0.0
        } else {
            (current - self.target) / current * 100.0
        }
    }
}

/// Three-tier intensity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IntensityTier {
    /// At or below the low threshold
    Low,
    /// Between the low and moderate thresholds
    Moderate,
    /// Above the moderate threshold
    High,
}

impl IntensityTier {
    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

impl fmt::Display for IntensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the intensity ranking
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityRank {
    /// Mode name
    pub mode: String,
    /// Carbon intensity (g/km)
    pub g_per_km: f64,
    /// Tier label
    pub tier: IntensityTier,
}

/// Modes ranked cleanest first
///
/// Modes without an intensity (no distance) are left out. Equal intensities
/// keep mode-name order.
#[must_use]
pub fn rank_by_intensity(
    modes: &ModeStatsByMode,
    thresholds: &IntensityThresholds,
) -> Vec<IntensityRank> {
    let mut ranking: Vec<IntensityRank> = modes
        .values()
        .filter_map(|stats| {
            stats.intensity_g_per_km.map(|g_per_km| IntensityRank {
                mode: stats.mode.clone(),
                g_per_km,
                tier: thresholds.tier(g_per_km),
            })
        })
        .collect();
    ranking.sort_by(|a, b| a.g_per_km.total_cmp(&b.g_per_km));
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::compute_mode_stats;
    use crate::core::models::{TripRecord, TripTable};
    use chrono::NaiveDate;

    #[test]
    fn test_tier_boundaries() {
        let t = IntensityThresholds::default();
        assert_eq!(t.tier(0.0), IntensityTier::Low);
        assert_eq!(t.tier(15.0), IntensityTier::Low);
        assert_eq!(t.tier(15.1), IntensityTier::Moderate);
        assert_eq!(t.tier(50.0), IntensityTier::Moderate);
        assert_eq!(t.tier(50.1), IntensityTier::High);
        assert_eq!(t.tier(180.0), IntensityTier::High);
        assert!(!t.is_priority(100.0));
        assert!(t.is_priority(100.5));
    }

    #[test]
    fn test_new_rejects_unordered() {
        assert!(IntensityThresholds::new(50.0, 15.0, 100.0, 50.0).is_err());
        assert!(IntensityThresholds::new(15.0, 50.0, 100.0, 0.0).is_err());
        assert!(IntensityThresholds::new(15.0, 50.0, f64::NAN, 50.0).is_err());
        assert!(IntensityThresholds::new(10.0, 40.0, 90.0, 30.0).is_ok());
    }

    #[test]
    fn test_required_reduction() {
        let t = IntensityThresholds::default();
        assert_eq!(t.required_reduction(100.0), 50.0);
        assert_eq!(t.required_reduction(20.0), 0.0);
    }

    #[test]
    fn test_ranking_is_cleanest_first() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let table = TripTable::from_records(vec![
            TripRecord::new("u1", start, "car", Some(10.0), Some(15.0), Some(1900.0)),
            TripRecord::new("u1", start, "bike", Some(4.0), Some(20.0), Some(5.0)),
            TripRecord::new("u1", start, "bus", Some(8.0), Some(25.0), Some(240.0)),
            TripRecord::new("u1", start, "idle", Some(0.0), Some(5.0), Some(0.0)),
        ]);

        let ranking = rank_by_intensity(&compute_mode_stats(&table), &IntensityThresholds::default());
        let modes: Vec<&str> = ranking.iter().map(|r| r.mode.as_str()).collect();
        assert_eq!(modes, vec!["bike", "bus", "car"]);
        assert_eq!(ranking[0].tier, IntensityTier::Low);
        assert_eq!(ranking[1].tier, IntensityTier::Moderate);
        assert_eq!(ranking[2].tier, IntensityTier::High);
    }
}
