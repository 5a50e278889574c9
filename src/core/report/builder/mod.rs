//! Document builders, one per report kind
//!
//! The helpers here format numbers and assemble the blocks shared by several
//! reports (mode breakdowns, distance and temporal charts).

pub mod global;
pub mod narrative;
pub mod strategic;
pub mod user;

use crate::core::distribution::{
    category_counts, cumulative_distribution, mean, median, mode_distance_quartiles, quantile,
    sorted_values, Histogram,
};
use crate::core::intensity::{IntensityRank, IntensityThresholds, IntensityTier};
use crate::core::metrics::{grams_to_kg, Aggregates, GlobalStats};
use crate::core::models::TripTable;
use crate::core::recommendations::CarbonEquivalences;
use crate::core::report::document::{
    AxisKind, BarChart, Chart, ChartSpec, HeatmapChart, HistogramChart, KeyValues, LineChart,
    Marker, PieChart, Table, Tone,
};
use crate::core::temporal::{
    trips_per_day, trips_per_hour, trips_per_weekday, weekday_hour_matrix, WEEKDAYS,
};
use chrono::NaiveDateTime;

/// Placeholder for values that cannot be computed
pub const NOT_AVAILABLE: &str = "n/a";

/// Format a number with `decimals` digits and comma-grouped thousands
#[must_use]
pub fn fmt_num(value: f64, decimals: usize) -> String {
    let text = format!("{value:.decimals$}");
    let (sign, digits) = text
        .strip_prefix('-')
        .map_or(("", text.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = digits
        .split_once('.')
        .map_or((digits, None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Format an optional value with its unit, `n/a` when absent
#[must_use]
pub fn fmt_opt(value: Option<f64>, decimals: usize, unit: &str) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |v| with_unit(fmt_num(v, decimals), unit),
    )
}

fn with_unit(number: String, unit: &str) -> String {
    if unit.is_empty() {
        number
    } else {
        format!("{number} {unit}")
    }
}

/// Format an emission mass given in grams as kilograms
#[must_use]
pub fn fmt_kg(grams: f64) -> String {
    format!("{} kg", fmt_num(grams_to_kg(grams), 1))
}

/// Format an optional timestamp as a date
#[must_use]
pub fn fmt_date(value: Option<NaiveDateTime>) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |dt| dt.format("%Y-%m-%d").to_string(),
    )
}

/// Period covered by the statistics
#[must_use]
pub fn fmt_period(stats: &GlobalStats) -> String {
    match (stats.period_start, stats.period_end) {
        (Some(start), Some(end)) => format!("{} to {}", fmt_date(Some(start)), fmt_date(Some(end))),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Seconds since the Unix epoch, as a chart x value
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn timestamp_secs(dt: NaiveDateTime) -> f64 {
    dt.and_utc().timestamp() as f64
}

/// Tone used to colour an intensity tier
#[must_use]
pub const fn tier_tone(tier: IntensityTier) -> Tone {
    match tier {
        IntensityTier::Low => Tone::Good,
        IntensityTier::Moderate => Tone::Warning,
        IntensityTier::High => Tone::Critical,
    }
}

/// Headline statistics panel
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summary_panel(title: &str, stats: &GlobalStats) -> KeyValues {
    KeyValues::new(title)
        .row("Period", fmt_period(stats))
        .row("Active users", fmt_num(stats.user_count as f64, 0))
        .row("Trips", fmt_num(stats.trip_count as f64, 0))
        .row("Total distance", with_unit(fmt_num(stats.total_distance_km, 1), "km"))
        .row("Mean distance per trip", fmt_opt(stats.mean_distance_km, 2, "km"))
        .row(
            "Total duration",
            format!(
                "{} min ({} h)",
                fmt_num(stats.total_duration_min, 0),
                fmt_num(stats.total_duration_min / 60.0, 0)
            ),
        )
        .row("Mean duration per trip", fmt_opt(stats.mean_duration_min, 1, "min"))
        .row("Total CO2 emissions", fmt_kg(stats.total_emission_g))
        .row("Mean CO2 per trip", fmt_opt(stats.mean_emission_g, 1, "g"))
        .row("Carbon intensity", fmt_opt(stats.intensity_g_per_km(), 1, "g CO2/km"))
}

fn mode_names(agg: &Aggregates) -> Vec<String> {
    agg.modes.keys().cloned().collect()
}

/// Pie of trips per mode
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn trips_per_mode_pie(agg: &Aggregates) -> Chart {
    Chart::new(
        "Trips per mode",
        ChartSpec::Pie(PieChart {
            labels: mode_names(agg),
            values: agg.modes.values().map(|m| m.trip_count as f64).collect(),
        }),
    )
}

/// Pie of distance per mode
#[must_use]
pub fn distance_share_pie(agg: &Aggregates) -> Chart {
    Chart::new(
        "Distance modal share",
        ChartSpec::Pie(PieChart {
            labels: mode_names(agg),
            values: agg.modes.values().map(|m| m.total_distance_km).collect(),
        }),
    )
}

/// Pie of emissions per mode
#[must_use]
pub fn emission_share_pie(agg: &Aggregates) -> Chart {
    Chart::new(
        "CO2 emissions share",
        ChartSpec::Pie(PieChart {
            labels: mode_names(agg),
            values: agg.modes.values().map(|m| m.total_emission_g).collect(),
        }),
    )
}

/// Bars of trips per mode
#[must_use]
pub fn trips_per_mode_bars(agg: &Aggregates) -> Chart {
    #[allow(clippy::cast_precision_loss)]
    let values = agg.modes.values().map(|m| m.trip_count as f64).collect();
    Chart::new(
        "Number of trips per mode",
        ChartSpec::Bars(BarChart::new(mode_names(agg), values, "trips")),
    )
}

/// Bars of total distance per mode
#[must_use]
pub fn distance_per_mode_bars(agg: &Aggregates) -> Chart {
    let values = agg.modes.values().map(|m| m.total_distance_km).collect();
    Chart::new(
        "Total distance per mode",
        ChartSpec::Bars(BarChart::new(mode_names(agg), values, "km")),
    )
}

/// Bars of total emissions per mode, in kg
#[must_use]
pub fn emissions_per_mode_bars(agg: &Aggregates) -> Chart {
    let values = agg
        .modes
        .values()
        .map(|m| grams_to_kg(m.total_emission_g))
        .collect();
    Chart::new(
        "CO2 emissions per mode",
        ChartSpec::Bars(BarChart::new(mode_names(agg), values, "kg CO2")),
    )
}

/// Bars of mean trip duration per mode
#[must_use]
pub fn mean_duration_bars(agg: &Aggregates) -> Chart {
    let values = agg
        .modes
        .values()
        .map(|m| m.mean_duration_min.unwrap_or(0.0))
        .collect();
    Chart::new(
        "Mean duration per mode",
        ChartSpec::Bars(BarChart::new(mode_names(agg), values, "min")),
    )
}

/// Horizontal bars of the intensity ranking, coloured by tier
#[must_use]
pub fn intensity_bars(ranking: &[IntensityRank]) -> Chart {
    Chart::new(
        "Carbon intensity per mode",
        ChartSpec::Bars(
            BarChart::new(
                ranking.iter().map(|r| r.mode.clone()).collect(),
                ranking.iter().map(|r| r.g_per_km).collect(),
                "g CO2/km",
            )
            .horizontal()
            .with_tones(ranking.iter().map(|r| tier_tone(r.tier)).collect()),
        ),
    )
}

/// Table of the intensity ranking with tier labels
#[must_use]
pub fn intensity_table(ranking: &[IntensityRank], thresholds: &IntensityThresholds) -> Table {
    let mut table = Table::new(
        "Carbon intensity ranking (cleanest first)",
        &["Rank", "Mode", "g CO2/km", "Tier", "Priority"],
    );
    for (i, rank) in ranking.iter().enumerate() {
        table.push_row(vec![
            (i + 1).to_string(),
            rank.mode.clone(),
            fmt_num(rank.g_per_km, 1),
            rank.tier.to_string(),
            if thresholds.is_priority(rank.g_per_km) {
                "yes".to_string()
            } else {
                String::new()
            },
        ]);
    }
    table
}

/// Per-mode statistics table
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mode_table(agg: &Aggregates, thresholds: &IntensityThresholds) -> Table {
    let mut table = Table::new(
        "Statistics per mode",
        &[
            "Mode",
            "Trips",
            "Share",
            "Distance (km)",
            "Mean (km)",
            "Mean (min)",
            "CO2 (kg)",
            "Mean CO2 (g)",
            "g CO2/km",
            "Tier",
        ],
    );
    for stats in agg.modes.values() {
        table.push_row(vec![
            stats.mode.clone(),
            fmt_num(stats.trip_count as f64, 0),
            fmt_opt(agg.trip_share(&stats.mode), 1, "%"),
            fmt_num(stats.total_distance_km, 1),
            fmt_opt(stats.mean_distance_km, 2, ""),
            fmt_opt(stats.mean_duration_min, 1, ""),
            fmt_num(grams_to_kg(stats.total_emission_g), 2),
            fmt_opt(stats.mean_emission_g, 1, ""),
            fmt_opt(stats.intensity_g_per_km, 1, ""),
            stats
                .intensity_g_per_km
                .map_or_else(|| NOT_AVAILABLE.to_string(), |g| thresholds.tier(g).to_string()),
        ]);
    }
    table
}

/// Bars of trips per distance category
#[must_use]
pub fn category_bars(table: &TripTable) -> Chart {
    let counts = category_counts(table);
    #[allow(clippy::cast_precision_loss)]
    let values = counts.iter().map(|(_, n)| *n as f64).collect();
    Chart::new(
        "Trips per distance category",
        ChartSpec::Bars(BarChart::new(
            counts.iter().map(|(c, _)| c.label().to_string()).collect(),
            values,
            "trips",
        )),
    )
}

/// Histogram of trip distances with median and mean markers
#[must_use]
pub fn distance_histogram(table: &TripTable, bins: usize) -> Chart {
    let distances = table.distances();
    let hist = Histogram::build(&distances, bins);
    let mut markers = Vec::new();
    if let Some(m) = median(&distances) {
        markers.push(Marker::new("Median", m));
    }
    if let Some(m) = mean(&distances) {
        markers.push(Marker::new("Mean", m));
    }
    Chart::new(
        "Distance distribution",
        ChartSpec::Histogram(HistogramChart {
            edges: hist.edges,
            counts: hist.counts,
            x_label: "Distance (km)".to_string(),
            markers,
        }),
    )
}

/// Histogram of per-trip emissions
#[must_use]
pub fn emission_histogram(table: &TripTable, bins: usize) -> Chart {
    let emissions = table.emissions();
    let hist = Histogram::build(&emissions, bins);
    let markers = median(&emissions)
        .map(|m| vec![Marker::new("Median", m)])
        .unwrap_or_default();
    Chart::new(
        "CO2 per trip",
        ChartSpec::Histogram(HistogramChart {
            edges: hist.edges,
            counts: hist.counts,
            x_label: "CO2 (g)".to_string(),
            markers,
        }),
    )
}

/// Cumulative distance distribution with the 50 % and 90 % distances
#[must_use]
pub fn distance_cdf(table: &TripTable) -> Chart {
    let distances = table.distances();
    let sorted = sorted_values(&distances);
    let markers = [("50% of trips under", 0.5), ("90% of trips under", 0.9)]
        .into_iter()
        .filter_map(|(label, q)| quantile(&sorted, q).map(|v| Marker::new(label, v)))
        .collect();
    Chart::new(
        "Cumulative distance distribution",
        ChartSpec::Line(LineChart {
            points: cumulative_distribution(&distances),
            x_axis: AxisKind::Value,
            x_label: "Distance (km)".to_string(),
            y_label: "Trips (%)".to_string(),
            markers,
        }),
    )
}

/// Distance quartiles per mode
#[must_use]
pub fn quartile_table(table: &TripTable) -> Table {
    let mut out = Table::new(
        "Distance quartiles per mode (km)",
        &["Mode", "Min", "Q1", "Median", "Q3", "Max"],
    );
    for (mode, q) in mode_distance_quartiles(table) {
        out.push_row(vec![
            mode,
            fmt_num(q.min, 2),
            fmt_num(q.q1, 2),
            fmt_num(q.median, 2),
            fmt_num(q.q3, 2),
            fmt_num(q.max, 2),
        ]);
    }
    out
}

/// Line of trips per day
#[must_use]
pub fn trips_per_day_line(table: &TripTable) -> Chart {
    #[allow(clippy::cast_precision_loss)]
    let points = trips_per_day(table)
        .into_iter()
        .filter_map(|(day, n)| day.and_hms_opt(0, 0, 0).map(|dt| (timestamp_secs(dt), n as f64)))
        .collect();
    Chart::new(
        "Trips per day",
        ChartSpec::Line(LineChart {
            points,
            x_axis: AxisKind::Time,
            x_label: "Date".to_string(),
            y_label: "Trips".to_string(),
            markers: Vec::new(),
        }),
    )
}

/// Bars of trips per weekday
#[must_use]
pub fn weekday_bars(table: &TripTable) -> Chart {
    #[allow(clippy::cast_precision_loss)]
    let values = trips_per_weekday(table).iter().map(|n| *n as f64).collect();
    Chart::new(
        "Trips per weekday",
        ChartSpec::Bars(BarChart::new(
            WEEKDAYS.iter().map(|d| d[..3].to_string()).collect(),
            values,
            "trips",
        )),
    )
}

/// Bars of trips per hour of day
#[must_use]
pub fn hour_bars(table: &TripTable) -> Chart {
    #[allow(clippy::cast_precision_loss)]
    let values = trips_per_hour(table).iter().map(|n| *n as f64).collect();
    Chart::new(
        "Trips per hour",
        ChartSpec::Bars(BarChart::new(
            (0..24).map(|h| format!("{h}h")).collect(),
            values,
            "trips",
        )),
    )
}

/// Weekday by hour heatmap
#[must_use]
pub fn weekday_hour_heatmap(table: &TripTable) -> Chart {
    #[allow(clippy::cast_precision_loss)]
    let values = weekday_hour_matrix(table)
        .iter()
        .map(|row| row.iter().map(|n| *n as f64).collect())
        .collect();
    Chart::new(
        "Trips by weekday and hour",
        ChartSpec::Heatmap(HeatmapChart {
            row_labels: WEEKDAYS.iter().map(|d| d[..3].to_string()).collect(),
            column_labels: (0..24).map(|h| h.to_string()).collect(),
            values,
        }),
    )
}

/// Carbon balance panel with everyday equivalents
#[must_use]
pub fn carbon_balance_panel(total_emission_g: f64) -> KeyValues {
    let eq = CarbonEquivalences::from_grams(total_emission_g);
    KeyValues::new("Carbon balance")
        .row("Total CO2 emissions", fmt_kg(total_emission_g))
        .row("Paris-Lyon train trips", fmt_num(eq.train_trips, 0))
        .row("Paris-New York return flights", fmt_num(eq.return_flights, 2))
        .row("Beef produced", format!("{} kg", fmt_num(eq.beef_kg, 0)))
        .row("Trees for a one-year offset", fmt_num(eq.trees, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fmt_num_groups_thousands() {
        assert_eq!(fmt_num(1_234_567.891, 1), "1,234,567.9");
        assert_eq!(fmt_num(999.0, 0), "999");
        assert_eq!(fmt_num(-12_500.0, 0), "-12,500");
        assert_eq!(fmt_num(0.25, 2), "0.25");
    }

    #[test]
    fn test_fmt_opt_and_kg() {
        assert_eq!(fmt_opt(None, 1, "g CO2/km"), "n/a");
        assert_eq!(fmt_opt(Some(1.25), 2, "g CO2/km"), "1.25 g CO2/km");
        assert_eq!(fmt_kg(2500.0), "2.5 kg");
    }

    #[test]
    fn test_fmt_period() {
        let stats = crate::core::metrics::compute_global_stats(&TripTable::default());
        assert_eq!(fmt_period(&stats), "n/a");

        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap().and_hms_opt(10, 0, 0);
        assert_eq!(fmt_date(day), "2024-02-29");
    }
}
