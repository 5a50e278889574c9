//! Personal report for one user

use super::{
    carbon_balance_panel, category_bars, distance_per_mode_bars, emissions_per_mode_bars,
    fmt_num, mode_table, summary_panel, timestamp_secs, trips_per_mode_pie, NOT_AVAILABLE,
};
use crate::core::derive::distance_over_time;
use crate::core::metrics::Aggregates;
use crate::core::models::TripTable;
use crate::core::recommendations::{Recommendations, GENERIC_RECOMMENDATIONS};
use crate::core::report::document::{AxisKind, Bullets, Chart, ChartSpec, LineChart, Page, ReportDocument};
use crate::core::report::{ReportContext, REPORT_AUTHOR};
use crate::core::users::favourite_mode;
use crate::error::{GreenmoveError, Result};

/// Build the report for `user` from that user's trips only
///
/// # Errors
/// Returns [`GreenmoveError::NoUserData`] when the user has no trip.
pub fn build(ctx: &ReportContext, user: &str) -> Result<ReportDocument> {
    let slice = ctx.table.for_user(user);
    if slice.is_empty() {
        return Err(GreenmoveError::NoUserData(user.to_string()));
    }
    let agg = Aggregates::compute(&slice);

    let mut doc = ReportDocument::new(
        format!("Greenmove - Report for user {user}"),
        format!("Personal mobility and CO2 emissions of user {user}"),
        REPORT_AUTHOR,
    );

    let favourite = favourite_mode(&slice).unwrap_or_else(|| NOT_AVAILABLE.to_string());
    doc.push_page(
        Page::new("Personal statistics")
            .with(summary_panel("Your statistics", &agg.global).row("Favourite mode", favourite))
            .with(trips_per_mode_pie(&agg))
            .with(mode_table(&agg, ctx.thresholds)),
    );

    doc.push_page(
        Page::new("Your transport modes")
            .with(distance_per_mode_bars(&agg))
            .with(emissions_per_mode_bars(&agg))
            .with(carbon_balance_panel(agg.global.total_emission_g)),
    );

    doc.push_page(
        Page::new("Your trips")
            .with(distance_over_time_line(&slice))
            .with(category_bars(&slice)),
    );

    let findings = Recommendations::build(&slice, &agg, ctx.thresholds).lines();
    let mut advice = Page::new("Personal recommendations");
    if !findings.is_empty() {
        advice.push(Bullets::new("Findings", findings));
    }
    advice.push(Bullets::new(
        "General recommendations",
        GENERIC_RECOMMENDATIONS.iter().map(ToString::to_string).collect(),
    ));
    doc.push_page(advice);

    logger::debug!(
        "User {user}: {} trip(s), {} km",
        slice.len(),
        fmt_num(agg.global.total_distance_km, 1)
    );
    Ok(doc)
}

fn distance_over_time_line(slice: &TripTable) -> Chart {
    Chart::new(
        "Distance per trip over time",
        ChartSpec::Line(LineChart {
            points: distance_over_time(slice)
                .into_iter()
                .map(|(at, km)| (timestamp_secs(at), km))
                .collect(),
            x_axis: AxisKind::Time,
            x_label: "Date".to_string(),
            y_label: "Distance (km)".to_string(),
            markers: Vec::new(),
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

    fn table() -> TripTable {
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        TripTable::from_records(vec![
            TripRecord::new("alice", day.and_hms_opt(8, 0, 0).unwrap(), "bike", Some(3.0), Some(12.0), Some(0.0)),
            TripRecord::new("alice", day.and_hms_opt(12, 0, 0).unwrap(), "bike", Some(2.0), Some(9.0), Some(0.0)),
            TripRecord::new("alice", day.and_hms_opt(18, 0, 0).unwrap(), "car", Some(15.0), Some(25.0), Some(3000.0)),
            TripRecord::new("bob", day.and_hms_opt(9, 0, 0).unwrap(), "train", Some(80.0), Some(60.0), Some(400.0)),
        ])
    }

    #[test]
    fn test_user_report_uses_only_that_user() {
        let table = table();
        let agg = Aggregates::compute(&table);
        let thresholds = IntensityThresholds::default();
        let config = RenderConfig::default();
        let doc = build(&ReportContext::new(&table, &agg, &thresholds, &config), "alice").unwrap();

        assert_eq!(doc.pages.len(), 4);
        let Block::KeyValues(panel) = &doc.pages[0].blocks[0] else {
            panic!("expected the statistics panel");
        };
        let trips = panel.rows.iter().find(|(k, _)| k == "Trips").map(|(_, v)| v.as_str());
        assert_eq!(trips, Some("3"));
        let favourite = panel.rows.last().map(|(_, v)| v.as_str());
        assert_eq!(favourite, Some("bike"));
        let Block::Chart(pie) = &doc.pages[0].blocks[1] else {
            panic!("expected the modes pie");
        };
        let ChartSpec::Pie(pie) = &pie.spec else {
            panic!("expected a pie chart");
        };
        assert_eq!(pie.labels, vec!["bike".to_string(), "car".to_string()]);
    }

    #[test]
    fn test_unknown_user_is_no_data() {
        let table = table();
        let agg = Aggregates::compute(&table);
        let thresholds = IntensityThresholds::default();
        let config = RenderConfig::default();
        let err = build(&ReportContext::new(&table, &agg, &thresholds, &config), "carol").unwrap_err();
        assert!(matches!(err, GreenmoveError::NoUserData(ref u) if u == "carol"));
        assert!(err.is_recoverable());
    }
}
