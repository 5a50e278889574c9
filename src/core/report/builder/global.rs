//! Global mobility report over the whole dataset

use super::{
    carbon_balance_panel, category_bars, distance_cdf, distance_histogram, distance_per_mode_bars,
    distance_share_pie, emission_histogram, emission_share_pie, emissions_per_mode_bars, hour_bars,
    intensity_bars, mean_duration_bars, mode_table, quartile_table, summary_panel, timestamp_secs,
    trips_per_day_line, trips_per_mode_bars, trips_per_mode_pie, weekday_bars,
    weekday_hour_heatmap,
};
use crate::core::derive::{cumulative_emissions_g, mean_speed_by_mode};
use crate::core::distribution::{median, Histogram};
use crate::core::intensity::rank_by_intensity;
use crate::core::metrics::{grams_to_kg, Aggregates};
use crate::core::models::TripTable;
use crate::core::report::document::{
    AxisKind, BarChart, Chart, ChartSpec, HistogramChart, LineChart, Marker, Page, ReportDocument,
    ScatterChart, ScatterPoint,
};
use crate::core::report::{ReportContext, REPORT_AUTHOR};
use crate::core::users::{top_users, trips_per_user, UserRanking, UserTotals};

/// Document title
pub const TITLE: &str = "Greenmove - Global mobility report";

/// Build the six-page global report
#[must_use]
pub fn build(ctx: &ReportContext) -> ReportDocument {
    let agg = ctx.aggregates;
    let table = ctx.table;
    let ranking = rank_by_intensity(&agg.modes, ctx.thresholds);
    let bins = ctx.config.histogram_bins;

    let mut doc = ReportDocument::new(TITLE, "Mobility and CO2 emissions analysis", REPORT_AUTHOR);

    doc.push_page(
        Page::new("Overview")
            .with(summary_panel("Global statistics", &agg.global))
            .with(trips_per_mode_pie(agg))
            .with(trips_per_mode_bars(agg))
            .with(distance_per_mode_bars(agg))
            .with(emissions_per_mode_bars(agg))
            .with(mean_duration_bars(agg)),
    );

    doc.push_page(
        Page::new("Transport modes")
            .with(distance_emission_scatter(agg))
            .with(intensity_bars(&ranking))
            .with(speed_bars(table))
            .with(distance_share_pie(agg))
            .with(mode_table(agg, ctx.thresholds)),
    );

    doc.push_page(
        Page::new("Distances")
            .with(distance_histogram(table, bins))
            .with(quartile_table(table))
            .with(category_bars(table))
            .with(distance_cdf(table)),
    );

    doc.push_page(
        Page::new("Temporal patterns")
            .with(trips_per_day_line(table))
            .with(weekday_bars(table))
            .with(hour_bars(table))
            .with(weekday_hour_heatmap(table)),
    );

    doc.push_page(
        Page::new("CO2 emissions")
            .with(emission_share_pie(agg))
            .with(cumulative_emissions_line(table))
            .with(emission_histogram(table, bins))
            .with(intensity_bars(&ranking))
            .with(carbon_balance_panel(agg.global.total_emission_g)),
    );

    let n = ctx.config.top_n;
    doc.push_page(
        Page::new("Users")
            .with(top_user_bars(
                &format!("Top {n} users by trips"),
                &top_users(table, UserRanking::Trips, n),
                UserRanking::Trips,
            ))
            .with(top_user_bars(
                &format!("Top {n} users by distance"),
                &top_users(table, UserRanking::Distance, n),
                UserRanking::Distance,
            ))
            .with(top_user_bars(
                &format!("Top {n} users by CO2 emissions"),
                &top_users(table, UserRanking::Emissions, n),
                UserRanking::Emissions,
            ))
            .with(trips_per_user_histogram(table, bins)),
    );

    doc
}

fn distance_emission_scatter(agg: &Aggregates) -> Chart {
    let points = agg
        .modes
        .values()
        .filter_map(|m| {
            Some(ScatterPoint {
                label: m.mode.clone(),
                x: m.mean_distance_km?,
                y: m.mean_emission_g?,
            })
        })
        .collect();
    Chart::new(
        "Mean distance and mean CO2 per trip",
        ChartSpec::Scatter(ScatterChart {
            points,
            x_label: "Mean distance (km)".to_string(),
            y_label: "Mean CO2 (g)".to_string(),
        }),
    )
}

fn speed_bars(table: &TripTable) -> Chart {
    let speeds = mean_speed_by_mode(table);
    Chart::new(
        "Mean speed per mode",
        ChartSpec::Bars(BarChart::new(
            speeds.keys().cloned().collect(),
            speeds.values().copied().collect(),
            "km/h",
        )),
    )
}

fn cumulative_emissions_line(table: &TripTable) -> Chart {
    let points = cumulative_emissions_g(table)
        .into_iter()
        .map(|(at, grams)| (timestamp_secs(at), grams_to_kg(grams)))
        .collect();
    Chart::new(
        "Cumulative CO2 emissions",
        ChartSpec::Line(LineChart {
            points,
            x_axis: AxisKind::Time,
            x_label: "Date".to_string(),
            y_label: "CO2 (kg)".to_string(),
            markers: Vec::new(),
        }),
    )
}

#[allow(clippy::cast_precision_loss)]
fn top_user_bars(title: &str, users: &[UserTotals], by: UserRanking) -> Chart {
    let (values, unit) = match by {
        UserRanking::Trips => (users.iter().map(|u| u.trip_count as f64).collect(), "trips"),
        UserRanking::Distance => (users.iter().map(|u| u.total_distance_km).collect(), "km"),
        UserRanking::Emissions => (
            users.iter().map(|u| grams_to_kg(u.total_emission_g)).collect(),
            "kg CO2",
        ),
    };
    Chart::new(
        title,
        ChartSpec::Bars(
            BarChart::new(users.iter().map(|u| u.user.clone()).collect(), values, unit).horizontal(),
        ),
    )
}

#[allow(clippy::cast_precision_loss)]
fn trips_per_user_histogram(table: &TripTable, bins: usize) -> Chart {
    let counts: Vec<f64> = trips_per_user(table).into_iter().map(|n| n as f64).collect();
    let hist = Histogram::build(&counts, bins);
    let markers = median(&counts)
        .map(|m| vec![Marker::new("Median", m)])
        .unwrap_or_default();
    Chart::new(
        "Trips per user",
        ChartSpec::Histogram(HistogramChart {
            edges: hist.edges,
            counts: hist.counts,
            x_label: "Trips".to_string(),
            markers,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::intensity::IntensityThresholds;
    use crate::core::models::TripRecord;
    use crate::core::report::document::Block;
    use crate::core::report::RenderConfig;
    use chrono::NaiveDate;

    fn sample_table() -> TripTable {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        TripTable::from_records(vec![
            TripRecord::new("u1", day.and_hms_opt(8, 0, 0).unwrap(), "car", Some(12.0), Some(20.0), Some(2400.0)),
            TripRecord::new("u1", day.and_hms_opt(18, 0, 0).unwrap(), "bike", Some(4.0), Some(15.0), Some(20.0)),
            TripRecord::new("u2", day.and_hms_opt(9, 30, 0).unwrap(), "bus", Some(6.0), Some(25.0), Some(600.0)),
        ])
    }

    #[test]
    fn test_global_report_has_six_pages() {
        let table = sample_table();
        let agg = Aggregates::compute(&table);
        let thresholds = IntensityThresholds::default();
        let config = RenderConfig::default();
        let doc = build(&ReportContext::new(&table, &agg, &thresholds, &config));

        assert_eq!(doc.pages.len(), 6);
        assert_eq!(doc.title, TITLE);
        assert_eq!(doc.author, REPORT_AUTHOR);
        assert!(matches!(doc.pages[0].blocks[0], Block::KeyValues(_)));
        assert!(doc.charts().count() >= 20);
    }

    #[test]
    fn test_scatter_skips_modes_without_means() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(8, 0, 0).unwrap();
        let table = TripTable::from_records(vec![
            TripRecord::new("u1", day, "car", Some(10.0), None, Some(1500.0)),
            TripRecord::new("u1", day, "walk", Some(1.0), None, None),
        ]);
        let chart = distance_emission_scatter(&Aggregates::compute(&table));
        let ChartSpec::Scatter(scatter) = chart.spec else {
            panic!("expected a scatter chart");
        };
        assert_eq!(scatter.points.len(), 1);
        assert_eq!(scatter.points[0].label, "car");
    }
}
