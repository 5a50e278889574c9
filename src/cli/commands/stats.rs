//! Console statistics (`--stats`)

use greenmove_analytics::core::metrics::{grams_to_kg, percentage, Aggregates, ModeStats};
use greenmove_analytics::core::report::builder::{fmt_kg, fmt_num, fmt_opt, fmt_period};
use std::fmt::Write;

/// Print the statistics of `agg` to stdout
pub fn print(agg: &Aggregates) {
    print!("{}", render(agg));
}

/// Statistics as console text
#[allow(clippy::cast_precision_loss)]
pub fn render(agg: &Aggregates) -> String {
    let banner = "=".repeat(80);
    let g = &agg.global;
    let mut out = String::new();

    let _ = writeln!(out, "\n{banner}");
    let _ = writeln!(out, "GREENMOVE STATISTICS");
    let _ = writeln!(out, "{banner}");

    let _ = writeln!(out, "\nOverview");
    let _ = writeln!(out, "   Period : {}", fmt_period(g));
    let _ = writeln!(out, "   Users : {}", fmt_num(g.user_count as f64, 0));
    let _ = writeln!(out, "   Trips : {}", fmt_num(g.trip_count as f64, 0));

    let _ = writeln!(out, "\nDistances");
    let _ = writeln!(out, "   Total : {} km", fmt_num(g.total_distance_km, 1));
    let _ = writeln!(out, "   Mean : {}/trip", fmt_opt(g.mean_distance_km, 2, "km"));

    let _ = writeln!(out, "\nDurations");
    let _ = writeln!(
        out,
        "   Total : {} min ({} h)",
        fmt_num(g.total_duration_min, 0),
        fmt_num(g.total_duration_min / 60.0, 1)
    );
    let _ = writeln!(out, "   Mean : {}/trip", fmt_opt(g.mean_duration_min, 1, "min"));

    let _ = writeln!(out, "\nCO2 emissions");
    let _ = writeln!(out, "   Total : {}", fmt_kg(g.total_emission_g));
    let _ = writeln!(out, "   Mean : {}/trip", fmt_opt(g.mean_emission_g, 1, "g"));

    let _ = writeln!(out, "\nBy transport mode:");
    let mut modes: Vec<&ModeStats> = agg.modes.values().collect();
    modes.sort_by(|a, b| b.trip_count.cmp(&a.trip_count).then_with(|| a.mode.cmp(&b.mode)));
    for m in modes {
        let pct = percentage(m.trip_count as f64, g.trip_count as f64).unwrap_or(0.0);
        let _ = writeln!(
            out,
            "   {:<15} : {:>6} trips ({pct:>5.1}%) - {:>8.1} km - {:>6.1} kg CO2",
            m.mode,
            m.trip_count,
            m.total_distance_km,
            grams_to_kg(m.total_emission_g)
        );
    }

    let _ = writeln!(out, "{banner}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use greenmove_analytics::core::models::{TripRecord, TripTable};

    #[test]
    fn test_stats_lines() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let table = TripTable::from_records(vec![
            TripRecord::new("u1", day.and_hms_opt(8, 0, 0).unwrap(), "car", Some(10.0), Some(20.0), Some(2000.0)),
            TripRecord::new("u1", day.and_hms_opt(9, 0, 0).unwrap(), "bike", Some(3.0), Some(12.0), Some(0.0)),
            TripRecord::new("u2", day.and_hms_opt(17, 0, 0).unwrap(), "bike", Some(5.0), Some(18.0), Some(0.0)),
        ]);
        let text = render(&Aggregates::compute(&table));

        assert!(text.contains("   Period : 2024-03-04 to 2024-03-04"));
        assert!(text.contains("   Trips : 3"));
        assert!(text.contains("   Total : 18.0 km"));
        assert!(text.contains("   Total : 2.0 kg"));

        let bike = text.find("   bike").unwrap();
        let car = text.find("   car").unwrap();
        assert!(bike < car);
        assert!(text.contains(&format!("   {:<15} : {:>6} trips ({:>5.1}%)", "bike", 2, 66.7)));
    }
}
