//! Plain-text narrative analysis

use super::{fmt_kg, fmt_num, fmt_opt, summary_panel};
use crate::core::intensity::rank_by_intensity;
use crate::core::metrics::ModeStats;
use crate::core::recommendations::{CarbonEquivalences, Recommendations, GENERIC_RECOMMENDATIONS};
use crate::core::report::document::{Block, Bullets, KeyValues, Page, ReportDocument};
use crate::core::report::{ReportContext, REPORT_AUTHOR};

/// Document title
pub const TITLE: &str = "GREENMOVE - MOBILITY AND CO2 EMISSIONS ANALYSIS";

/// Build the narrative: overview, modes, environmental impact, recommendations
#[must_use]
pub fn build(ctx: &ReportContext) -> ReportDocument {
    let agg = ctx.aggregates;
    let global = &agg.global;
    let mut doc = ReportDocument::new(TITLE, "Narrative analysis of trips and emissions", REPORT_AUTHOR);

    doc.push_page(Page::new("Overview").with(summary_panel("Global statistics", global)));

    let mut modes = Page::new("Analysis by transport mode");
    for stats in agg.modes.values() {
        modes.push(mode_panel(stats));
    }
    doc.push_page(modes);

    let eq = CarbonEquivalences::from_grams(global.total_emission_g);
    let ranking = rank_by_intensity(&agg.modes, ctx.thresholds);
    let mut impact = Page::new("Environmental impact");
    impact.push(Block::Paragraphs(vec![format!(
        "The recorded trips emitted {} of CO2, which is equivalent to:",
        fmt_kg(global.total_emission_g)
    )]));
    impact.push(Bullets::new("Equivalences", eq.lines()));
    impact.push(Bullets::new(
        "Modes ranked from cleanest to most polluting",
        ranking
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {}: {:.1} g CO2/km ({})", i + 1, r.mode, r.g_per_km, r.tier))
            .collect(),
    ));
    doc.push_page(impact);

    let findings = Recommendations::build(ctx.table, agg, ctx.thresholds).lines();
    let mut advice = Page::new("Recommendations");
    if !findings.is_empty() {
        advice.push(Bullets::new("Findings", findings));
    }
    advice.push(Bullets::new(
        "General recommendations",
        GENERIC_RECOMMENDATIONS.iter().map(ToString::to_string).collect(),
    ));
    doc.push_page(advice);

    doc
}

#[allow(clippy::cast_precision_loss)]
fn mode_panel(stats: &ModeStats) -> KeyValues {
    KeyValues::new(stats.mode.to_uppercase())
        .row("Number of trips", fmt_num(stats.trip_count as f64, 0))
        .row("Total distance", format!("{} km", fmt_num(stats.total_distance_km, 2)))
        .row("Mean distance", fmt_opt(stats.mean_distance_km, 2, "km"))
        .row("Mean duration", fmt_opt(stats.mean_duration_min, 2, "min"))
        .row("Total CO2", fmt_kg(stats.total_emission_g))
        .row("Mean CO2 per trip", fmt_opt(stats.mean_emission_g, 2, "g"))
        .row("Carbon intensity", fmt_opt(stats.intensity_g_per_km, 2, "g CO2/km"))
}
