//! Distance categories, histograms and quantiles

use crate::core::models::TripTable;
use std::collections::BTreeMap;
use std::fmt;

/// Distance bucket with fixed edges 0, 1, 5, 10, 20, 50, 100 km
///
/// Buckets are closed on the right: 5.0 km is in `OneToFive`. Zero falls in
/// `UnderOne`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DistanceCategory {
    /// Up to 1 km
    UnderOne,
    /// Over 1 and up to 5 km
    OneToFive,
    /// Over 5 and up to 10 km
    FiveToTen,
    /// Over 10 and up to 20 km
    TenToTwenty,
    /// Over 20 and up to 50 km
    TwentyToFifty,
    /// Over 50 and up to 100 km
    FiftyToHundred,
    /// Over 100 km
    OverHundred,
}

impl DistanceCategory {
    /// Every category, shortest first
    pub const ALL: [Self; 7] = [
        Self::UnderOne,
        Self::OneToFive,
        Self::FiveToTen,
        Self::TenToTwenty,
        Self::TwentyToFifty,
        Self::FiftyToHundred,
        Self::OverHundred,
    ];

    /// Categorize a distance in km
    ///
    /// Negative and non-finite distances have no category.
    #[must_use]
    pub fn from_km(distance: f64) -> Option<Self> {
        if !distance.is_finite() || distance < 0.0 {
            return None;
        }
        let category = match distance {
            d if d <= 1.0 => Self::UnderOne,
            d if d <= 5.0 => Self::OneToFive,
            d if d <= 10.0 => Self::FiveToTen,
            d if d <= 20.0 => Self::TenToTwenty,
            d if d <= 50.0 => Self::TwentyToFifty,
            d if d <= 100.0 => Self::FiftyToHundred,
            _ => Self::OverHundred,
        };
        Some(category)
    }

    /// Short label used in charts and tables
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnderOne => "< 1 km",
            Self::OneToFive => "1-5 km",
            Self::FiveToTen => "5-10 km",
            Self::TenToTwenty => "10-20 km",
            Self::TwentyToFifty => "20-50 km",
            Self::FiftyToHundred => "50-100 km",
            Self::OverHundred => "> 100 km",
        }
    }
}

impl fmt::Display for DistanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trip count per distance category, every category present, shortest first
#[must_use]
pub fn category_counts(table: &TripTable) -> Vec<(DistanceCategory, usize)> {
    let mut counts = [0usize; 7];
    for category in table
        .iter()
        .filter_map(|t| t.distance_km)
        .filter_map(DistanceCategory::from_km)
    {
        counts[category as usize] += 1;
    }
    DistanceCategory::ALL.into_iter().zip(counts).collect()
}

/// Equal-width histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins
    pub edges: Vec<f64>,
    /// Values per bin
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Build a histogram of `values` with `bins` equal-width bins
    ///
    /// The last bin includes its right edge. A constant sample gets bins of
    /// width one centred on the value. Returns an empty histogram for an empty
    /// sample or zero bins.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn build(values: &[f64], bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return Self {
                edges: Vec::new(),
                counts: Vec::new(),
            };
        }

        let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for value in finite {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = (((value - min) / width).floor() as usize).min(bins - 1);
            counts[index] += 1;
        }

        Self { edges, counts }
    }

    /// Number of bins
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether the histogram has no bin
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Centre of each bin
    #[must_use]
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }
}

/// Quantile with linear interpolation between closest ranks
///
/// `sorted` must be ascending. `q` is clamped to `[0, 1]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Copy of `values` sorted ascending, non-finite values removed
#[must_use]
pub fn sorted_values(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Five-number summary of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    /// Smallest value
    pub min: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Largest value
    pub max: f64,
}

impl Quartiles {
    /// Summarize a sample, `None` when it is empty
    #[must_use]
    pub fn of(values: &[f64]) -> Option<Self> {
        let sorted = sorted_values(values);
        Some(Self {
            min: *sorted.first()?,
            q1: quantile(&sorted, 0.25)?,
            median: quantile(&sorted, 0.5)?,
            q3: quantile(&sorted, 0.75)?,
            max: *sorted.last()?,
        })
    }
}

/// Distance quartiles per mode; modes without distances are left out
#[must_use]
pub fn mode_distance_quartiles(table: &TripTable) -> BTreeMap<String, Quartiles> {
    let mut by_mode: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for trip in table {
        if let Some(distance) = trip.distance_km {
            by_mode.entry(trip.mode.as_str()).or_default().push(distance);
        }
    }
    by_mode
        .into_iter()
        .filter_map(|(mode, values)| Quartiles::of(&values).map(|q| (mode.to_string(), q)))
        .collect()
}

/// Empirical cumulative distribution: `(value, percent of values <= value)`
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cumulative_distribution(values: &[f64]) -> Vec<(f64, f64)> {
    let sorted = sorted_values(values);
    let total = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (*v, (i + 1) as f64 / total * 100.0))
        .collect()
}

/// Median of a sample
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(&sorted_values(values), 0.5)
}

/// Arithmetic mean of a sample
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_cover_edges() {
        assert_eq!(DistanceCategory::from_km(0.0), Some(DistanceCategory::UnderOne));
        assert_eq!(DistanceCategory::from_km(1.0), Some(DistanceCategory::UnderOne));
        assert_eq!(DistanceCategory::from_km(1.01), Some(DistanceCategory::OneToFive));
        assert_eq!(DistanceCategory::from_km(5.0), Some(DistanceCategory::OneToFive));
        assert_eq!(DistanceCategory::from_km(20.0), Some(DistanceCategory::TenToTwenty));
        assert_eq!(DistanceCategory::from_km(100.0), Some(DistanceCategory::FiftyToHundred));
        assert_eq!(DistanceCategory::from_km(100.5), Some(DistanceCategory::OverHundred));
        assert_eq!(DistanceCategory::from_km(-1.0), None);
        assert_eq!(DistanceCategory::from_km(f64::NAN), None);
    }

    #[test]
    fn test_every_non_negative_distance_has_exactly_one_category() {
        for tenth in 0..2_000 {
            let distance = f64::from(tenth) / 10.0;
            assert!(DistanceCategory::from_km(distance).is_some(), "{distance}");
        }
    }

    #[test]
    fn test_histogram_counts_all_values() {
        let values = [0.5, 1.0, 2.0, 3.5, 10.0];
        let hist = Histogram::build(&values, 4);

        assert_eq!(hist.len(), 4);
        assert_eq!(hist.edges.len(), 5);
        assert_eq!(hist.counts.iter().sum::<usize>(), values.len());
        assert_eq!(*hist.counts.last().unwrap(), 1);
    }

    #[test]
    fn test_histogram_constant_and_empty() {
        let hist = Histogram::build(&[3.0, 3.0], 10);
        assert_eq!(hist.counts.iter().sum::<usize>(), 2);
        assert!(Histogram::build(&[], 10).is_empty());
    }

    #[test]
    fn test_quartiles_interpolate() {
        let q = Quartiles::of(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(q.min, 1.0);
        assert_eq!(q.q1, 1.75);
        assert_eq!(q.median, 2.5);
        assert_eq!(q.q3, 3.25);
        assert_eq!(q.max, 4.0);
        assert!(Quartiles::of(&[]).is_none());
    }

    #[test]
    fn test_cumulative_distribution_ends_at_100() {
        let cdf = cumulative_distribution(&[3.0, 1.0, 2.0, 4.0]);
        assert_eq!(cdf.first(), Some(&(1.0, 25.0)));
        assert_eq!(cdf.last(), Some(&(4.0, 100.0)));
    }
}
