//! Strategic analysis report
//!
//! Aimed at decision makers: how far the fleet is from the recommended
//! intensity target, which modes to act on first and where short car trips
//! could be shifted.

use super::{
    category_bars, distance_share_pie, fmt_kg, fmt_num, fmt_opt, hour_bars, intensity_bars,
    intensity_table, summary_panel, tier_tone, trips_per_mode_pie, weekday_hour_heatmap,
    NOT_AVAILABLE,
};
use crate::core::intensity::{rank_by_intensity, IntensityThresholds};
use crate::core::metrics::{grams_to_kg, percentage, Aggregates};
use crate::core::models::TripTable;
use crate::core::recommendations::{Recommendations, ShortCarTrips, GENERIC_RECOMMENDATIONS, SHORT_TRIP_KM};
use crate::core::report::document::{Bullets, Callout, KeyValues, Page, ReportDocument, Table, Tone};
use crate::core::report::{ReportContext, REPORT_AUTHOR};
use crate::core::temporal::{peak_index, trips_per_hour, trips_per_weekday, WEEKDAYS};

/// Document title
pub const TITLE: &str = "Greenmove - Strategic mobility analysis";

/// Build the strategic analysis report
#[must_use]
pub fn build(ctx: &ReportContext) -> ReportDocument {
    let agg = ctx.aggregates;
    let table = ctx.table;
    let thresholds = ctx.thresholds;
    let ranking = rank_by_intensity(&agg.modes, thresholds);
    let short_trips = ShortCarTrips::collect(table);

    let mut doc = ReportDocument::new(
        TITLE,
        "Carbon intensity, modal shares and reduction levers",
        REPORT_AUTHOR,
    );

    let mut summary = Page::new("Executive summary")
        .with(summary_panel("Key figures", &agg.global))
        .with(target_panel(agg, thresholds));
    summary.push(target_callout(agg, thresholds));
    doc.push_page(summary);

    doc.push_page(
        Page::new("Carbon intensity ranking")
            .with(thresholds_panel(thresholds))
            .with(intensity_bars(&ranking))
            .with(intensity_table(&ranking, thresholds)),
    );

    doc.push_page(
        Page::new("Modal shares")
            .with(trips_per_mode_pie(agg))
            .with(distance_share_pie(agg))
            .with(share_table(agg)),
    );

    let mut short = Page::new("Short trips")
        .with(category_bars(table))
        .with(short_trips_panel(&short_trips, agg));
    if short_trips.count() > 0 {
        short.push(Callout::new(
            Tone::Warning,
            format!(
                "Shifting the {} car trips under {SHORT_TRIP_KM} km to cycling or walking would save about {}.",
                short_trips.count(),
                fmt_kg(short_trips.total_emission_g)
            ),
        ));
    } else {
        short.push(Callout::new(
            Tone::Good,
            format!("No car trip under {SHORT_TRIP_KM} km was recorded."),
        ));
    }
    doc.push_page(short);

    doc.push_page(
        Page::new("Temporal peaks")
            .with(peaks_panel(table))
            .with(weekday_hour_heatmap(table))
            .with(hour_bars(table)),
    );

    let recommendations = Recommendations::build(table, agg, thresholds);
    doc.push_page(
        Page::new("Recommendations")
            .with(Bullets::new("Findings", recommendations.lines()))
            .with(Bullets::new(
                "General measures",
                GENERIC_RECOMMENDATIONS.iter().map(ToString::to_string).collect(),
            )),
    );

    doc
}

fn target_panel(agg: &Aggregates, thresholds: &IntensityThresholds) -> KeyValues {
    let current = agg.global.intensity_g_per_km();
    KeyValues::new("Intensity target")
        .row("Global intensity", fmt_opt(current, 1, "g CO2/km"))
        .row("Recommended target", format!("{} g CO2/km", fmt_num(thresholds.target, 0)))
        .row(
            "Required reduction",
            current.map_or_else(
                || NOT_AVAILABLE.to_string(),
                |g| format!("{}%", fmt_num(thresholds.required_reduction(g), 1)),
            ),
        )
}

fn target_callout(agg: &Aggregates, thresholds: &IntensityThresholds) -> Callout {
    match agg.global.intensity_g_per_km() {
        None => Callout::new(Tone::Neutral, "No distance recorded; the global intensity is not available."),
        Some(g) if g <= thresholds.target => Callout::new(
            Tone::Good,
            format!("The global intensity of {g:.1} g CO2/km meets the recommended target."),
        ),
        Some(g) => Callout::new(
            tier_tone(thresholds.tier(g)),
            format!(
                "The global intensity of {g:.1} g CO2/km must drop by {:.1}% to meet the recommended target.",
                thresholds.required_reduction(g)
            ),
        ),
    }
}

fn thresholds_panel(thresholds: &IntensityThresholds) -> KeyValues {
    KeyValues::new("Intensity tiers")
        .row("Low", format!("up to {} g CO2/km", fmt_num(thresholds.low, 0)))
        .row("Moderate", format!("up to {} g CO2/km", fmt_num(thresholds.moderate, 0)))
        .row("High", format!("above {} g CO2/km", fmt_num(thresholds.moderate, 0)))
        .row("Priority", format!("above {} g CO2/km", fmt_num(thresholds.high, 0)))
}

#[allow(clippy::cast_precision_loss)]
fn share_table(agg: &Aggregates) -> Table {
    let mut table = Table::new(
        "Modal shares",
        &["Mode", "Trips", "Trip share", "Distance share", "CO2 share"],
    );
    for stats in agg.modes.values() {
        table.push_row(vec![
            stats.mode.clone(),
            fmt_num(stats.trip_count as f64, 0),
            fmt_opt(agg.trip_share(&stats.mode), 1, "%"),
            fmt_opt(agg.distance_share(&stats.mode), 1, "%"),
            fmt_opt(agg.emission_share(&stats.mode), 1, "%"),
        ]);
    }
    table
}

fn short_trips_panel(short: &ShortCarTrips, agg: &Aggregates) -> KeyValues {
    KeyValues::new(format!("Car trips under {SHORT_TRIP_KM} km"))
        .row("Trips", short.count().to_string())
        .row("Distance", format!("{} km", fmt_num(short.total_distance_km, 1)))
        .row("CO2 emissions", fmt_kg(short.total_emission_g))
        .row(
            "Share of total CO2",
            fmt_opt(
                percentage(short.total_emission_g, agg.global.total_emission_g),
                1,
                "%",
            ),
        )
        .row(
            "Potential saving",
            format!("{} kg CO2", fmt_num(grams_to_kg(short.total_emission_g), 2)),
        )
}

fn peaks_panel(table: &TripTable) -> KeyValues {
    let weekday = peak_index(&trips_per_weekday(table))
        .map_or_else(|| NOT_AVAILABLE.to_string(), |i| WEEKDAYS[i].to_string());
    let hour = peak_index(&trips_per_hour(table))
        .map_or_else(|| NOT_AVAILABLE.to_string(), |h| format!("{h:02}:00-{:02}:00", h + 1));
    KeyValues::new("Peaks")
        .row("Busiest weekday", weekday)
        .row("Busiest hour", hour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::TripRecord;
    use crate::core::report::document::Block;
    use crate::core::report::RenderConfig;
    use chrono::NaiveDate;

    fn context_parts() -> (TripTable, Aggregates) {
        // 2024-03-04 is a Monday
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let table = TripTable::from_records(vec![
            TripRecord::new("u1", day.and_hms_opt(8, 10, 0).unwrap(), "car", Some(3.0), Some(10.0), Some(600.0)),
            TripRecord::new("u2", day.and_hms_opt(8, 40, 0).unwrap(), "car", Some(20.0), Some(30.0), Some(4000.0)),
            TripRecord::new("u2", day.and_hms_opt(17, 0, 0).unwrap(), "bike", Some(5.0), Some(20.0), Some(0.0)),
        ]);
        let agg = Aggregates::compute(&table);
        (table, agg)
    }

    #[test]
    fn test_strategic_report_pages() {
        let (table, agg) = context_parts();
        let thresholds = IntensityThresholds::default();
        let config = RenderConfig::default();
        let doc = build(&ReportContext::new(&table, &agg, &thresholds, &config));

        let headings: Vec<&str> = doc.pages.iter().map(|p| p.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec![
                "Executive summary",
                "Carbon intensity ranking",
                "Modal shares",
                "Short trips",
                "Temporal peaks",
                "Recommendations",
            ]
        );

        let callout = doc.pages[3].blocks.iter().find_map(|b| match b {
            Block::Callout(c) => Some(c),
            _ => None,
        });
        assert_eq!(callout.map(|c| c.tone), Some(Tone::Warning));
    }

    #[test]
    fn test_target_panel_reports_reduction() {
        let (_, agg) = context_parts();
        // 4600 g over 28 km
        let panel = target_panel(&agg, &IntensityThresholds::default());
        assert_eq!(panel.rows[0].1, "164.3 g CO2/km");
        assert_eq!(panel.rows[2].1, "69.6%");
    }

    #[test]
    fn test_peaks_panel() {
        let (table, _) = context_parts();
        let panel = peaks_panel(&table);
        assert_eq!(panel.rows[0].1, "Monday");
        assert_eq!(panel.rows[1].1, "08:00-09:00");

        let empty = peaks_panel(&TripTable::default());
        assert_eq!(empty.rows[0].1, NOT_AVAILABLE);
    }
}
