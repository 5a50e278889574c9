//! Plain text report generator
//!
//! Writes a report as fixed-width text. Charts become ranked tables since a
//! terminal cannot show them.

use crate::core::report::charts::{axis_label, compact};
use crate::core::report::document::{
    Block, Bullets, Chart, ChartSpec, KeyValues, ReportDocument, Table,
};
use crate::core::report::{RenderConfig, ReportGenerator};
use crate::error::Result;
use std::fmt::Write;

/// Width of banners and rules
const LINE_WIDTH: usize = 80;

/// Plain text report generator
pub struct TextReporter;

impl TextReporter {
    /// Create a new text reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the document as a string
    #[must_use]
    pub fn render_string(&self, doc: &ReportDocument, config: &RenderConfig) -> String {
        let banner = "=".repeat(LINE_WIDTH);
        let rule = "-".repeat(LINE_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{banner}");
        let _ = writeln!(out, "{}", doc.title);
        let _ = writeln!(out, "{banner}");

        for (i, page) in doc.pages.iter().enumerate() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}. {}", i + 1, page.heading.to_uppercase());
            let _ = writeln!(out, "{rule}");
            for block in &page.blocks {
                let _ = writeln!(out);
                Self::write_block(&mut out, block, config);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "{banner}");
        let _ = writeln!(out, "Generated on {}", doc.created_label());
        let _ = writeln!(out, "{banner}");
        out
    }

    fn write_block(out: &mut String, block: &Block, config: &RenderConfig) {
        match block {
            Block::KeyValues(panel) => Self::write_key_values(out, panel),
            Block::Chart(chart) => Self::write_chart(out, chart, config),
            Block::Table(table) => Self::write_table(out, table),
            Block::Paragraphs(paragraphs) => {
                for paragraph in paragraphs {
                    let _ = writeln!(out, "{paragraph}");
                }
            }
            Block::Bullets(list) => Self::write_bullets(out, list),
            Block::Callout(callout) => {
                let _ = writeln!(out, ">> {}", callout.text);
            }
        }
    }

    fn write_key_values(out: &mut String, panel: &KeyValues) {
        let _ = writeln!(out, "{}", panel.title);
        let width = panel
            .rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);
        for (label, value) in &panel.rows {
            let _ = writeln!(out, "  • {label:<width$} : {value}");
        }
    }

    fn write_bullets(out: &mut String, list: &Bullets) {
        let _ = writeln!(out, "{}", list.title);
        for item in &list.items {
            let _ = writeln!(out, "  • {item}");
        }
    }

    fn write_table(out: &mut String, table: &Table) {
        let _ = writeln!(out, "{}", table.title);
        write_columns(out, &table.headers, &table.rows);
    }

    fn write_chart(out: &mut String, chart: &Chart, config: &RenderConfig) {
        let _ = writeln!(out, "[{}]", chart.title);
        let (headers, rows): (Vec<&str>, Vec<Vec<String>>) = match &chart.spec {
            ChartSpec::Bars(bars) => {
                let mut ranked: Vec<(&String, f64)> =
                    bars.labels.iter().zip(bars.values.iter().copied()).collect();
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
                (
                    vec!["Rank", "Label", bars.unit.as_str()],
                    ranked
                        .into_iter()
                        .enumerate()
                        .map(|(i, (label, v))| vec![(i + 1).to_string(), label.clone(), compact(v)])
                        .collect(),
                )
            }
            ChartSpec::Pie(pie) => {
                let mut ranked: Vec<(&String, f64, f64)> = pie
                    .labels
                    .iter()
                    .zip(pie.values.iter().copied())
                    .zip(pie.shares())
                    .map(|((label, v), share)| (label, v, share))
                    .collect();
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
                (
                    vec!["Rank", "Label", "Value", "Share"],
                    ranked
                        .into_iter()
                        .enumerate()
                        .map(|(i, (label, v, share))| {
                            vec![(i + 1).to_string(), label.clone(), compact(v), format!("{share:.1}%")]
                        })
                        .collect(),
                )
            }
            ChartSpec::Line(line) => {
                let step = (line.points.len() / config.top_n.max(1)).max(1);
                let mut rows: Vec<Vec<String>> = line
                    .points
                    .iter()
                    .step_by(step)
                    .map(|(x, y)| vec![axis_label(line.x_axis, *x), compact(*y)])
                    .collect();
                if let Some((x, y)) = line.points.last() {
                    if (line.points.len() - 1) % step != 0 {
                        rows.push(vec![axis_label(line.x_axis, *x), compact(*y)]);
                    }
                }
                for marker in &line.markers {
                    rows.push(vec![marker.label.clone(), axis_label(line.x_axis, marker.value)]);
                }
                (vec![line.x_label.as_str(), line.y_label.as_str()], rows)
            }
            ChartSpec::Histogram(hist) => {
                let mut rows: Vec<Vec<String>> = hist
                    .counts
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| **n > 0)
                    .map(|(i, n)| {
                        vec![
                            format!("{} - {}", compact(hist.edges[i]), compact(hist.edges[i + 1])),
                            n.to_string(),
                        ]
                    })
                    .collect();
                for marker in &hist.markers {
                    rows.push(vec![marker.label.clone(), compact(marker.value)]);
                }
                (vec![hist.x_label.as_str(), "Count"], rows)
            }
            ChartSpec::Heatmap(heat) => {
                let mut cells: Vec<(String, String, f64)> = heat
                    .row_labels
                    .iter()
                    .zip(&heat.values)
                    .flat_map(|(row, values)| {
                        heat.column_labels
                            .iter()
                            .zip(values)
                            .map(move |(col, v)| (row.clone(), col.clone(), *v))
                    })
                    .filter(|(_, _, v)| *v > 0.0)
                    .collect();
                cells.sort_by(|a, b| b.2.total_cmp(&a.2));
                cells.truncate(config.top_n);
                (
                    vec!["Row", "Column", "Value"],
                    cells
                        .into_iter()
                        .map(|(row, col, v)| vec![row, col, compact(v)])
                        .collect(),
                )
            }
            ChartSpec::Scatter(scatter) => (
                vec!["Label", scatter.x_label.as_str(), scatter.y_label.as_str()],
                scatter
                    .points
                    .iter()
                    .map(|p| vec![p.label.clone(), compact(p.x), compact(p.y)])
                    .collect(),
            ),
        };

        if rows.is_empty() {
            let _ = writeln!(out, "  (no data)");
        } else {
            let headers: Vec<String> = headers.into_iter().map(ToString::to_string).collect();
            write_columns(out, &headers, &rows);
        }
    }
}

/// Write rows as left-aligned columns under a header
fn write_columns(out: &mut String, headers: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let _ = writeln!(out, "  {}", format_row(headers));
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "  {}", "-".repeat(total));
    for row in rows {
        let _ = writeln!(out, "  {}", format_row(row));
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TextReporter {
    fn render(&self, doc: &ReportDocument, config: &RenderConfig) -> Result<Vec<u8>> {
        Ok(self.render_string(doc, config).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::document::{BarChart, Page};

    fn doc() -> ReportDocument {
        let mut doc = ReportDocument::new("TITLE", "Subject", "Author");
        doc.push_page(
            Page::new("Overview")
                .with(KeyValues::new("Global statistics").row("Trips", "3").row("Total distance", "12 km"))
                .with(Chart::new(
                    "Trips per mode",
                    ChartSpec::Bars(BarChart::new(
                        vec!["bike".into(), "car".into()],
                        vec![1.0, 2.0],
                        "trips",
                    )),
                )),
        );
        doc
    }

    #[test]
    fn test_text_layout() {
        let text = TextReporter::new().render_string(&doc(), &RenderConfig::default());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "=".repeat(80));
        assert_eq!(lines[1], "TITLE");
        assert!(text.contains("1. OVERVIEW"));
        assert!(text.contains(&format!("  • {:<14} : 3", "Trips")));
        assert!(lines[lines.len() - 2].starts_with("Generated on "));
    }

    #[test]
    fn test_bars_are_ranked() {
        let text = TextReporter::new().render_string(&doc(), &RenderConfig::default());
        let car = text.find("1     car").unwrap();
        let bike = text.find("2     bike").unwrap();
        assert!(car < bike);
    }
}
