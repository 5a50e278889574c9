//! PDF report generator
//!
//! Lays a document out on landscape pages and draws every chart natively as
//! vector graphics, so no browser or image library is involved.

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use super::pdf_canvas::{
    fit, lighten, text_width, wrap, Align, Canvas, Rgb8, ACCENT, INK, MUTED, RULE,
};
use crate::core::report::charts::{axis_label, compact};
use crate::core::report::document::{
    value_range, AxisKind, BarChart, Block, Bullets, Callout, Chart, ChartSpec, HeatmapChart,
    HistogramChart, KeyValues, LineChart, Marker, PieChart, ReportDocument, ScatterChart, Table,
};
use crate::core::report::{RenderConfig, ReportGenerator};
use crate::error::Result;
use std::f32::consts::{FRAC_PI_2, TAU};

const BODY: f32 = 9.0;
const SMALL: f32 = 7.0;
const TABLE_TEXT: f32 = 7.5;
const ROW: f32 = 5.0;
const CHART_HEIGHT: f32 = 82.0;
const GAP: f32 = 4.0;
const MARKER_COLORS: [Rgb8; 3] = [(220, 38, 38), (22, 163, 74), (124, 58, 237)];
const HEAT_LOW: Rgb8 = (240, 253, 244);

/// PDF report generator with native vector charts
pub struct PdfReporter;

impl PdfReporter {
    /// Create a new PDF reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Lay out and serialize the document
    ///
    /// # Errors
    /// Returns an error if the PDF cannot be assembled or written.
    pub fn render_bytes(&self, doc: &ReportDocument, config: &RenderConfig) -> Result<Vec<u8>> {
        let footer = format!("{} | Generated on {}", doc.author, doc.created_label());
        let mut canvas = Canvas::new(
            &doc.title,
            config.page_width_mm,
            config.page_height_mm,
            &footer,
        )?;
        canvas.title(&doc.title, &doc.subject);

        for page in &doc.pages {
            canvas.start_page(&page.heading);
            for block in &page.blocks {
                draw_block(&mut canvas, block, config);
            }
        }

        logger::debug!("PDF laid out on {} page(s)", canvas.page_count());
        canvas.finish(&doc.author, &doc.subject)
    }
}

impl Default for PdfReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for PdfReporter {
    fn render(&self, doc: &ReportDocument, config: &RenderConfig) -> Result<Vec<u8>> {
        self.render_bytes(doc, config)
    }
}

fn draw_block(canvas: &mut Canvas, block: &Block, config: &RenderConfig) {
    match block {
        Block::KeyValues(panel) => draw_key_values(canvas, panel),
        Block::Chart(chart) => draw_chart_block(canvas, chart, config),
        Block::Table(table) => draw_table(canvas, table),
        Block::Paragraphs(paragraphs) => {
            for paragraph in paragraphs {
                for line in wrap(paragraph, BODY, canvas.content_width()) {
                    canvas.ensure_space(ROW);
                    canvas.advance(ROW);
                    canvas.text(&line, BODY, canvas.left(), canvas.cursor(), false, INK, Align::Left);
                }
            }
            canvas.advance(GAP);
        }
        Block::Bullets(list) => draw_bullets(canvas, list),
        Block::Callout(callout) => draw_callout(canvas, callout),
    }
}

fn block_title(canvas: &mut Canvas, title: &str) {
    canvas.advance(6.0);
    canvas.text(title, 11.0, canvas.left(), canvas.cursor(), true, INK, Align::Left);
    canvas.advance(1.5);
}

fn draw_key_values(canvas: &mut Canvas, panel: &KeyValues) {
    canvas.ensure_space(7.5 + ROW * panel.rows.len().min(4) as f32);
    block_title(canvas, &panel.title);
    let label_x = canvas.left() + 2.0;
    let value_x = canvas.left() + 75.0;
    for (label, value) in &panel.rows {
        canvas.ensure_space(ROW);
        canvas.advance(ROW);
        let y = canvas.cursor();
        canvas.text(&fit(label, BODY, 70.0), BODY, label_x, y, false, MUTED, Align::Left);
        canvas.text(value, BODY, value_x, y, true, INK, Align::Left);
    }
    canvas.advance(GAP);
}

fn draw_bullets(canvas: &mut Canvas, list: &Bullets) {
    canvas.ensure_space(7.5 + ROW);
    block_title(canvas, &list.title);
    let indent = canvas.left() + 6.0;
    let width = canvas.content_width() - 6.0;
    for item in &list.items {
        for (i, line) in wrap(item, BODY, width).iter().enumerate() {
            canvas.ensure_space(ROW);
            canvas.advance(ROW);
            if i == 0 {
                canvas.text("-", BODY, canvas.left() + 2.0, canvas.cursor(), true, ACCENT, Align::Left);
            }
            canvas.text(line, BODY, indent, canvas.cursor(), false, INK, Align::Left);
        }
    }
    canvas.advance(GAP);
}

fn draw_callout(canvas: &mut Canvas, callout: &Callout) {
    let tone = callout.tone.rgb();
    let lines = wrap(&callout.text, BODY, canvas.content_width() - 10.0);
    let height = lines.len() as f32 * ROW + 4.0;
    canvas.ensure_space(height + GAP + 2.0);
    canvas.advance(2.0);
    let top = canvas.cursor();
    let left = canvas.left();
    let right = left + canvas.content_width();
    canvas.fill_rect(left, top - height, right, top, lighten(tone, 0.85));
    canvas.fill_rect(left, top - height, left + 1.5, top, tone);
    for line in &lines {
        canvas.advance(ROW);
        canvas.text(line, BODY, left + 5.0, canvas.cursor(), false, INK, Align::Left);
    }
    canvas.advance(4.0 + GAP);
}

fn draw_table(canvas: &mut Canvas, table: &Table) {
    let columns = table.headers.len().max(1);
    let mut chars: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    chars.resize(columns, 1);
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate().take(columns) {
            chars[i] = chars[i].max(cell.chars().count());
        }
    }
    let total: usize = chars.iter().map(|c| c + 2).sum();
    let width = canvas.content_width();
    let widths: Vec<f32> = chars
        .iter()
        .map(|c| (*c + 2) as f32 / total as f32 * width)
        .collect();

    canvas.ensure_space(7.5 + 3.0 * ROW);
    block_title(canvas, &table.title);
    draw_table_row(canvas, &table.headers, &widths, true);
    for row in &table.rows {
        let page = canvas.page_count();
        canvas.ensure_space(ROW + 1.0);
        if canvas.page_count() != page {
            draw_table_row(canvas, &table.headers, &widths, true);
        }
        draw_table_row(canvas, row, &widths, false);
    }
    canvas.advance(GAP);
}

fn draw_table_row(canvas: &mut Canvas, cells: &[String], widths: &[f32], header: bool) {
    canvas.advance(ROW + 1.0);
    let y = canvas.cursor();
    let left = canvas.left();
    if header {
        canvas.fill_rect(left, y - 1.8, left + canvas.content_width(), y + 3.8, (241, 245, 249));
    }
    let mut x = left + 1.0;
    for (cell, width) in cells.iter().zip(widths) {
        canvas.text(&fit(cell, TABLE_TEXT, width - 1.5), TABLE_TEXT, x, y, header, INK, Align::Left);
        x += width;
    }
    canvas.line(
        &[(left, y - 1.8), (left + canvas.content_width(), y - 1.8)],
        RULE,
        0.3,
    );
}

/// Rectangle in page coordinates, origin bottom-left
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Frame {
    fn top(self) -> f32 {
        self.y + self.h
    }

    fn right(self) -> f32 {
        self.x + self.w
    }

    fn inset(self, left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            x: self.x + left,
            y: self.y + bottom,
            w: (self.w - left - right).max(1.0),
            h: (self.h - bottom - top).max(1.0),
        }
    }

    fn map_x(self, v: f64, lo: f64, hi: f64) -> f32 {
        self.x + ((v - lo) / (hi - lo)) as f32 * self.w
    }

    fn map_y(self, v: f64, lo: f64, hi: f64) -> f32 {
        self.y + ((v - lo) / (hi - lo)) as f32 * self.h
    }
}

fn ticks(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    (0..=n).map(|i| lo + (hi - lo) * i as f64 / n as f64).collect()
}

/// Value range starting at zero, never empty
fn zero_based(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let max = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);
    (0.0, if max > 0.0 { max } else { 1.0 })
}

fn has_data(spec: &ChartSpec) -> bool {
    match spec {
        ChartSpec::Bars(bars) => bars.values.iter().any(|v| v.is_finite() && *v != 0.0),
        ChartSpec::Pie(pie) => pie.values.iter().sum::<f64>() > 0.0,
        ChartSpec::Line(line) => !line.points.is_empty(),
        ChartSpec::Histogram(hist) => hist.counts.iter().any(|n| *n > 0),
        ChartSpec::Heatmap(heat) => heat.max_value() > 0.0,
        ChartSpec::Scatter(scatter) => !scatter.points.is_empty(),
    }
}

fn draw_chart_block(canvas: &mut Canvas, chart: &Chart, config: &RenderConfig) {
    let height = CHART_HEIGHT.min(canvas.page_capacity());
    canvas.ensure_space(height + GAP);
    let top = canvas.cursor();
    let frame = Frame {
        x: canvas.left(),
        y: top - height,
        w: canvas.content_width(),
        h: height,
    };

    canvas.text(&chart.title, 10.5, frame.x, top - 4.5, true, INK, Align::Left);
    let area = frame.inset(0.0, 0.0, 0.0, 8.0);

    if has_data(&chart.spec) {
        match &chart.spec {
            ChartSpec::Bars(bars) if bars.horizontal => draw_hbars(canvas, bars, area, config),
            ChartSpec::Bars(bars) => draw_bars(canvas, bars, area, config),
            ChartSpec::Pie(pie) => draw_pie(canvas, pie, area, config),
            ChartSpec::Line(line) => draw_line(canvas, line, area, config),
            ChartSpec::Histogram(hist) => draw_histogram(canvas, hist, area, config),
            ChartSpec::Heatmap(heat) => draw_heatmap(canvas, heat, area),
            ChartSpec::Scatter(scatter) => draw_scatter(canvas, scatter, area, config),
        }
    } else {
        canvas.text(
            "No data",
            BODY,
            area.x + area.w / 2.0,
            area.y + area.h / 2.0,
            false,
            MUTED,
            Align::Center,
        );
    }

    canvas.advance(height + GAP);
}

/// Horizontal gridlines with labels on the left of `plot`
fn value_axis(canvas: &Canvas, plot: Frame, lo: f64, hi: f64, label: &str) {
    for value in ticks(lo, hi, 4) {
        let y = plot.map_y(value, lo, hi);
        canvas.line(&[(plot.x, y), (plot.right(), y)], RULE, 0.3);
        canvas.text(&compact(value), SMALL, plot.x - 1.5, y - 1.0, false, MUTED, Align::Right);
    }
    canvas.text(label, SMALL, plot.x, plot.top() + 2.0, false, MUTED, Align::Left);
    canvas.line(&[(plot.x, plot.y), (plot.x, plot.top())], MUTED, 0.5);
}

/// Tick labels under `plot` for a numeric or time x axis
fn x_axis(canvas: &Canvas, plot: Frame, lo: f64, hi: f64, kind: AxisKind, label: &str) {
    canvas.line(&[(plot.x, plot.y), (plot.right(), plot.y)], MUTED, 0.5);
    for value in ticks(lo, hi, 4) {
        let x = plot.map_x(value, lo, hi);
        canvas.line(&[(x, plot.y), (x, plot.y - 1.0)], MUTED, 0.4);
        canvas.text(&axis_label(kind, value), SMALL, x, plot.y - 4.0, false, MUTED, Align::Center);
    }
    canvas.text(label, SMALL, plot.x + plot.w / 2.0, plot.y - 8.5, false, MUTED, Align::Center);
}

fn draw_markers(canvas: &Canvas, plot: Frame, markers: &[Marker], lo: f64, hi: f64, kind: AxisKind) {
    let mut legend_y = plot.top() - 1.0;
    for (i, marker) in markers.iter().enumerate() {
        if !(lo..=hi).contains(&marker.value) {
            continue;
        }
        let color = MARKER_COLORS[i % MARKER_COLORS.len()];
        let x = plot.map_x(marker.value, lo, hi);
        canvas.line(&[(x, plot.y), (x, plot.top())], color, 0.9);
        let text = format!("{}: {}", marker.label, axis_label(kind, marker.value));
        canvas.text(&text, SMALL, plot.right() - 1.0, legend_y - 2.5, true, color, Align::Right);
        legend_y -= 4.0;
    }
}

fn bar_color(bars: &BarChart, index: usize, config: &RenderConfig) -> Rgb8 {
    bars.tones
        .get(index)
        .map_or_else(|| config.color(index), |tone| tone.rgb())
}

fn draw_bars(canvas: &Canvas, bars: &BarChart, area: Frame, config: &RenderConfig) {
    let plot = area.inset(16.0, 9.0, 4.0, 4.0);
    let (lo, hi) = zero_based(bars.values.iter().copied());
    value_axis(canvas, plot, lo, hi, &bars.unit);
    canvas.line(&[(plot.x, plot.y), (plot.right(), plot.y)], MUTED, 0.5);

    let slot = plot.w / bars.values.len().max(1) as f32;
    for (i, value) in bars.values.iter().enumerate() {
        let x = plot.x + slot * i as f32;
        let top = plot.map_y(value.max(0.0), lo, hi);
        canvas.fill_rect(x + slot * 0.15, plot.y, x + slot * 0.85, top, bar_color(bars, i, config));

        let center = x + slot / 2.0;
        let label = bars.labels.get(i).map_or("", String::as_str);
        canvas.text(&fit(label, SMALL, slot - 0.5), SMALL, center, plot.y - 4.0, false, INK, Align::Center);
        let value_text = compact(*value);
        if text_width(&value_text, SMALL - 1.0) < slot {
            canvas.text(&value_text, SMALL - 1.0, center, top + 1.2, false, MUTED, Align::Center);
        }
    }
}

fn draw_hbars(canvas: &Canvas, bars: &BarChart, area: Frame, config: &RenderConfig) {
    let plot = area.inset(38.0, 9.0, 14.0, 2.0);
    let (lo, hi) = zero_based(bars.values.iter().copied());
    x_axis(canvas, plot, lo, hi, AxisKind::Value, &bars.unit);

    let slot = plot.h / bars.values.len().max(1) as f32;
    let label_size = SMALL.min(slot * 2.2);
    for (i, value) in bars.values.iter().enumerate() {
        let y_top = plot.top() - slot * i as f32;
        let right = plot.map_x(value.max(0.0), lo, hi);
        canvas.fill_rect(plot.x, y_top - slot * 0.85, right, y_top - slot * 0.15, bar_color(bars, i, config));

        let baseline = y_top - slot / 2.0 - label_size * 0.12;
        let label = bars.labels.get(i).map_or("", String::as_str);
        canvas.text(&fit(label, label_size, 36.0), label_size, plot.x - 1.5, baseline, false, INK, Align::Right);
        canvas.text(&compact(*value), label_size, right + 1.0, baseline, false, MUTED, Align::Left);
    }
}

fn draw_pie(canvas: &Canvas, pie: &PieChart, area: Frame, config: &RenderConfig) {
    let radius = (area.h / 2.0 - 2.0).min(area.w / 4.0);
    let cx = area.x + radius + 8.0;
    let cy = area.y + area.h / 2.0;
    let shares = pie.shares();

    let mut angle = FRAC_PI_2;
    for (i, share) in shares.iter().enumerate() {
        let sweep = (*share as f32 / 100.0) * TAU;
        if sweep <= 0.0 {
            continue;
        }
        let steps = ((sweep / TAU) * 120.0).ceil().max(2.0) as usize;
        let mut points = vec![(cx, cy)];
        for s in 0..=steps {
            let a = angle - sweep * s as f32 / steps as f32;
            points.push((cx + radius * a.cos(), cy + radius * a.sin()));
        }
        canvas.fill_polygon(&points, config.color(i));
        angle -= sweep;
    }

    let legend_x = cx + radius + 14.0;
    let rows = ((area.h - 4.0) / ROW).floor().max(1.0) as usize;
    let mut y = area.top() - 4.0;
    for (i, (label, share)) in pie.labels.iter().zip(&shares).enumerate().take(rows) {
        canvas.fill_rect(legend_x, y - 0.5, legend_x + 3.0, y + 2.5, config.color(i));
        canvas.text(
            &format!("{} ({share:.1}%)", fit(label, SMALL + 1.0, 60.0)),
            SMALL + 1.0,
            legend_x + 5.0,
            y,
            false,
            INK,
            Align::Left,
        );
        y -= ROW;
    }
}

fn draw_line(canvas: &Canvas, line: &LineChart, area: Frame, config: &RenderConfig) {
    let plot = area.inset(16.0, 12.0, 4.0, 4.0);
    let (x_lo, x_hi) = value_range(
        line.points
            .iter()
            .map(|(x, _)| *x)
            .chain(line.markers.iter().map(|m| m.value)),
    );
    let (y_lo, y_hi) = zero_based(line.points.iter().map(|(_, y)| *y));
    value_axis(canvas, plot, y_lo, y_hi, &line.y_label);
    x_axis(canvas, plot, x_lo, x_hi, line.x_axis, &line.x_label);

    let points: Vec<(f32, f32)> = line
        .points
        .iter()
        .map(|(x, y)| (plot.map_x(*x, x_lo, x_hi), plot.map_y(*y, y_lo, y_hi)))
        .collect();
    if points.len() == 1 {
        let (x, y) = points[0];
        canvas.fill_rect(x - 0.8, y - 0.8, x + 0.8, y + 0.8, config.color(0));
    } else {
        canvas.line(&points, config.color(0), 1.1);
    }
    draw_markers(canvas, plot, &line.markers, x_lo, x_hi, line.x_axis);
}

fn draw_histogram(canvas: &Canvas, hist: &HistogramChart, area: Frame, config: &RenderConfig) {
    let plot = area.inset(16.0, 12.0, 4.0, 4.0);
    let (x_lo, x_hi) = value_range(hist.edges.iter().copied());
    let (y_lo, y_hi) = zero_based(hist.counts.iter().map(|n| *n as f64));
    value_axis(canvas, plot, y_lo, y_hi, "Count");
    x_axis(canvas, plot, x_lo, x_hi, AxisKind::Value, &hist.x_label);

    for (i, count) in hist.counts.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let (Some(start), Some(end)) = (hist.edges.get(i), hist.edges.get(i + 1)) else {
            continue;
        };
        canvas.fill_rect(
            plot.map_x(*start, x_lo, x_hi),
            plot.y,
            plot.map_x(*end, x_lo, x_hi) - 0.2,
            plot.map_y(*count as f64, y_lo, y_hi),
            config.color(0),
        );
    }
    draw_markers(canvas, plot, &hist.markers, x_lo, x_hi, AxisKind::Value);
}

fn heat_color(t: f64) -> Rgb8 {
    let t = t.clamp(0.0, 1.0) as f32;
    let mix = |lo: u8, hi: u8| -> u8 { (f32::from(lo) + (f32::from(hi) - f32::from(lo)) * t).round() as u8 };
    (
        mix(HEAT_LOW.0, ACCENT.0),
        mix(HEAT_LOW.1, ACCENT.1),
        mix(HEAT_LOW.2, ACCENT.2),
    )
}

fn draw_heatmap(canvas: &Canvas, heat: &HeatmapChart, area: Frame) {
    let plot = area.inset(14.0, 7.0, 4.0, 2.0);
    let rows = heat.row_labels.len().max(1);
    let columns = heat.column_labels.len().max(1);
    let cell_w = plot.w / columns as f32;
    let cell_h = plot.h / rows as f32;
    let max = heat.max_value();

    for (r, values) in heat.values.iter().enumerate() {
        let y_top = plot.top() - cell_h * r as f32;
        for (c, value) in values.iter().enumerate() {
            let x = plot.x + cell_w * c as f32;
            canvas.fill_rect(x, y_top - cell_h, x + cell_w - 0.3, y_top - 0.3, heat_color(value / max));
        }
        if let Some(label) = heat.row_labels.get(r) {
            canvas.text(label, SMALL, plot.x - 1.5, y_top - cell_h / 2.0 - 1.0, false, INK, Align::Right);
        }
    }

    let every = if columns > 12 { 2 } else { 1 };
    for (c, label) in heat.column_labels.iter().enumerate().step_by(every) {
        let x = plot.x + cell_w * (c as f32 + 0.5);
        canvas.text(label, SMALL, x, plot.y - 4.0, false, MUTED, Align::Center);
    }
    canvas.text(
        &format!("max {}", compact(max)),
        SMALL,
        plot.right(),
        plot.top() + 2.5,
        false,
        MUTED,
        Align::Right,
    );
}

fn draw_scatter(canvas: &Canvas, scatter: &ScatterChart, area: Frame, config: &RenderConfig) {
    let plot = area.inset(16.0, 12.0, 24.0, 4.0);
    let (x_lo, x_hi) = zero_based(scatter.points.iter().map(|p| p.x));
    let (y_lo, y_hi) = zero_based(scatter.points.iter().map(|p| p.y));
    value_axis(canvas, plot, y_lo, y_hi, &scatter.y_label);
    x_axis(canvas, plot, x_lo, x_hi, AxisKind::Value, &scatter.x_label);

    for (i, point) in scatter.points.iter().enumerate() {
        let x = plot.map_x(point.x, x_lo, x_hi);
        let y = plot.map_y(point.y, y_lo, y_hi);
        canvas.fill_rect(x - 1.2, y - 1.2, x + 1.2, y + 1.2, config.color(i));
        canvas.text(&point.label, SMALL, x + 2.0, y + 1.5, false, INK, Align::Left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::document::{Page, ScatterPoint, Tone};

    fn doc_with_every_block() -> ReportDocument {
        let mut table = Table::new("Modes", &["Mode", "Trips"]);
        for i in 0..60 {
            table.push_row(vec![format!("mode {i}"), i.to_string()]);
        }
        let mut doc = ReportDocument::new("Greenmove - Test", "CO₂ subject", "Greenmove Analytics");
        doc.push_page(
            Page::new("Overview")
                .with(KeyValues::new("Statistics").row("Trips", "60"))
                .with(Chart::new(
                    "Bars",
                    ChartSpec::Bars(BarChart::new(vec!["a".into(), "b".into()], vec![1.0, 3.0], "trips")),
                ))
                .with(Chart::new(
                    "Horizontal",
                    ChartSpec::Bars(
                        BarChart::new(vec!["a".into()], vec![2.0], "km").horizontal(),
                    ),
                ))
                .with(Chart::new(
                    "Pie",
                    ChartSpec::Pie(PieChart {
                        labels: vec!["a".into(), "b".into()],
                        values: vec![1.0, 1.0],
                    }),
                ))
                .with(Chart::new(
                    "Histogram",
                    ChartSpec::Histogram(HistogramChart {
                        edges: vec![0.0, 1.0, 2.0],
                        counts: vec![3, 1],
                        x_label: "km".into(),
                        markers: vec![Marker::new("Median", 0.8)],
                    }),
                ))
                .with(Chart::new(
                    "Scatter",
                    ChartSpec::Scatter(ScatterChart {
                        points: vec![ScatterPoint {
                            label: "car".into(),
                            x: 10.0,
                            y: 1800.0,
                        }],
                        x_label: "km".into(),
                        y_label: "g".into(),
                    }),
                ))
                .with(Callout::new(Tone::Critical, "Above target"))
                .with(table),
        );
        doc.push_page(Page::new("Empty").with(Chart::new(
            "Nothing",
            ChartSpec::Line(LineChart {
                points: vec![],
                x_axis: AxisKind::Time,
                x_label: "Date".into(),
                y_label: "Trips".into(),
                markers: vec![],
            }),
        )));
        doc
    }

    #[test]
    fn test_pdf_bytes() {
        let bytes = PdfReporter::new()
            .render_bytes(&doc_with_every_block(), &RenderConfig::default())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn test_has_data() {
        assert!(!has_data(&ChartSpec::Pie(PieChart {
            labels: vec!["a".into()],
            values: vec![0.0],
        })));
        assert!(has_data(&ChartSpec::Bars(BarChart::new(
            vec!["a".into()],
            vec![2.0],
            "km"
        ))));
    }

    #[test]
    fn test_zero_based_range() {
        assert_eq!(zero_based([3.0, 7.5]), (0.0, 7.5));
        assert_eq!(zero_based(Vec::<f64>::new()), (0.0, 1.0));
        assert_eq!(heat_color(0.0), HEAT_LOW);
        assert_eq!(heat_color(1.0), ACCENT);
    }
}
