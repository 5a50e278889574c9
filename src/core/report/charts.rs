//! SVG chart rendering with `plotters`
//!
//! Each [`ChartSpec`] is drawn into an in-memory SVG string. The HTML encoder
//! embeds the result as a base64 data URI.

#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use crate::core::report::document::{
    value_range, AxisKind, BarChart, Chart, ChartSpec, HeatmapChart, HistogramChart, LineChart,
    Marker, PieChart, ScatterChart,
};
use crate::core::report::RenderConfig;
use crate::error::{GreenmoveError, Result};
use chrono::DateTime;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

const FONT: &str = "sans-serif";
const MARKER_COLORS: [RGBColor; 3] = [
    RGBColor(220, 38, 38),
    RGBColor(22, 163, 74),
    RGBColor(124, 58, 237),
];

fn chart_err<E: std::fmt::Display>(e: E) -> GreenmoveError {
    GreenmoveError::Chart(e.to_string())
}

const fn rgb(color: (u8, u8, u8)) -> RGBColor {
    RGBColor(color.0, color.1, color.2)
}

/// Short axis label for a value
#[must_use]
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.0}k", value / 1000.0)
    } else if abs >= 100.0 || value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

/// Label of an x value, as a date when the axis holds timestamps
#[must_use]
pub fn axis_label(kind: AxisKind, value: f64) -> String {
    match kind {
        AxisKind::Value => compact(value),
        AxisKind::Time => DateTime::from_timestamp(value as i64, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
    }
}

fn segment_label(labels: &[String], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

/// Render a chart as an SVG document
///
/// # Errors
/// Returns [`GreenmoveError::Chart`] if plotting fails.
pub fn render_svg(chart: &Chart, config: &RenderConfig) -> Result<String> {
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (config.chart_width, config.chart_height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        match &chart.spec {
            ChartSpec::Bars(bars) if bars.horizontal => draw_hbars(&root, &chart.title, bars, config)?,
            ChartSpec::Bars(bars) => draw_bars(&root, &chart.title, bars, config)?,
            ChartSpec::Pie(pie) => draw_pie(&root, &chart.title, pie, config)?,
            ChartSpec::Line(line) => draw_line(&root, &chart.title, line, config)?,
            ChartSpec::Histogram(hist) => draw_histogram(&root, &chart.title, hist, config)?,
            ChartSpec::Heatmap(heat) => draw_heatmap(&root, &chart.title, heat, config)?,
            ChartSpec::Scatter(scatter) => draw_scatter(&root, &chart.title, scatter, config)?,
        }

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

fn draw_empty(root: &Area, title: &str) -> Result<()> {
    let area = root.titled(title, (FONT, 20)).map_err(chart_err)?;
    let (w, h) = area.dim_in_pixel();
    area.draw_text(
        "No data",
        &TextStyle::from((FONT, 16).into_font()).color(&RGBColor(100, 116, 139)),
        (w as i32 / 2 - 30, h as i32 / 2),
    )
    .map_err(chart_err)?;
    Ok(())
}

fn bar_color(bars: &BarChart, index: usize, config: &RenderConfig) -> RGBColor {
    bars.tones
        .get(index)
        .map_or_else(|| rgb(config.color(index)), |tone| rgb(tone.rgb()))
}

fn bar_top(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

fn draw_bars(root: &Area, title: &str, bars: &BarChart, config: &RenderConfig) -> Result<()> {
    let n = bars.values.len();
    if n == 0 {
        return draw_empty(root, title);
    }
    let labels = &bars.labels;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0usize..n - 1).into_segmented(), 0f64..bar_top(&bars.values))
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|v| segment_label(labels, v))
        .y_desc(bars.unit.as_str())
        .y_label_formatter(&|v| compact(*v))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(bars.values.iter().enumerate().map(|(i, v)| {
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
                bar_color(bars, i, config).filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))
        .map_err(chart_err)?;

    Ok(())
}

fn draw_hbars(root: &Area, title: &str, bars: &BarChart, config: &RenderConfig) -> Result<()> {
    let n = bars.values.len();
    if n == 0 {
        return draw_empty(root, title);
    }
    // First bar at the top.
    let labels: Vec<String> = bars.labels.iter().rev().cloned().collect();

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(130)
        .build_cartesian_2d(0f64..bar_top(&bars.values), (0usize..n - 1).into_segmented())
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|v| segment_label(&labels, v))
        .x_desc(bars.unit.as_str())
        .x_label_formatter(&|v| compact(*v))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(bars.values.iter().enumerate().map(|(i, v)| {
            let row = n - 1 - i;
            let mut bar = Rectangle::new(
                [(0.0, SegmentValue::Exact(row)), (*v, SegmentValue::Exact(row + 1))],
                bar_color(bars, i, config).filled(),
            );
            bar.set_margin(4, 4, 0, 0);
            bar
        }))
        .map_err(chart_err)?;

    Ok(())
}

fn draw_pie(root: &Area, title: &str, pie: &PieChart, config: &RenderConfig) -> Result<()> {
    let shares = pie.shares();
    if shares.iter().all(|s| *s <= 0.0) {
        return draw_empty(root, title);
    }

    let area = root.titled(title, (FONT, 20)).map_err(chart_err)?;
    let (w, h) = area.dim_in_pixel();
    let radius = f64::from(h.min(w / 2)) * 0.42;
    let center = ((w / 3) as i32, (h / 2) as i32);
    let legend_x = (w as f64 * 0.64) as i32;
    let label_style = TextStyle::from((FONT, 14).into_font()).color(&BLACK);

    let mut angle = -90.0;
    for (i, (label, share)) in pie.labels.iter().zip(&shares).enumerate() {
        let color = rgb(config.color(i));
        let sweep = share * 3.6;
        if sweep > 0.0 {
            area.draw(&Polygon::new(slice_points(center, radius, angle, sweep), color.filled()))
                .map_err(chart_err)?;
        }
        angle += sweep;

        let y = 20 + i as i32 * 24;
        area.draw(&Rectangle::new([(legend_x, y), (legend_x + 14, y + 14)], color.filled()))
            .map_err(chart_err)?;
        area.draw_text(&format!("{label} ({share:.1}%)"), &label_style, (legend_x + 22, y))
            .map_err(chart_err)?;
    }

    Ok(())
}

fn slice_points(center: (i32, i32), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep / 2.0).ceil().max(2.0) as usize;
    let mut points = vec![center];
    for i in 0..=steps {
        let rad = (start + sweep * i as f64 / steps as f64).to_radians();
        points.push((
            center.0 + (radius * rad.cos()) as i32,
            center.1 + (radius * rad.sin()) as i32,
        ));
    }
    points
}

fn draw_line(root: &Area, title: &str, line: &LineChart, config: &RenderConfig) -> Result<()> {
    if line.points.is_empty() {
        return draw_empty(root, title);
    }
    let (x_min, x_max) = value_range(
        line.points
            .iter()
            .map(|p| p.0)
            .chain(line.markers.iter().map(|m| m.value)),
    );
    let (y_min, y_max) = value_range(line.points.iter().map(|p| p.1).chain([0.0]));
    let kind = line.x_axis;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max * 1.05)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(6)
        .x_desc(line.x_label.as_str())
        .y_desc(line.y_label.as_str())
        .x_label_formatter(&|x| axis_label(kind, *x))
        .y_label_formatter(&|y| compact(*y))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            line.points.iter().copied(),
            rgb(config.color(0)).stroke_width(2),
        ))
        .map_err(chart_err)?;

    draw_markers(&mut chart, &line.markers, (y_min, y_max * 1.05))
}

fn draw_markers<'a>(
    chart: &mut ChartContext<'a, SVGBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    markers: &[Marker],
    y_span: (f64, f64),
) -> Result<()> {
    if markers.is_empty() {
        return Ok(());
    }
    for (i, marker) in markers.iter().enumerate() {
        let color = MARKER_COLORS[i % MARKER_COLORS.len()];
        chart
            .draw_series(LineSeries::new(
                vec![(marker.value, y_span.0), (marker.value, y_span.1)],
                color.stroke_width(2),
            ))
            .map_err(chart_err)?
            .label(format!("{}: {}", marker.label, compact(marker.value)))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;
    Ok(())
}

fn draw_histogram(root: &Area, title: &str, hist: &HistogramChart, config: &RenderConfig) -> Result<()> {
    let (Some(first), Some(last)) = (hist.edges.first(), hist.edges.last()) else {
        return draw_empty(root, title);
    };
    let max_count = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let x_min = hist.markers.iter().map(|m| m.value).fold(*first, f64::min);
    let x_max = hist.markers.iter().map(|m| m.value).fold(*last, f64::max);
    let x_max = if x_max > x_min { x_max } else { x_min + 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..max_count * 1.1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(hist.x_label.as_str())
        .y_desc("Trips")
        .x_label_formatter(&|x| compact(*x))
        .y_label_formatter(&|y| compact(*y))
        .draw()
        .map_err(chart_err)?;

    let color = rgb(config.color(0));
    chart
        .draw_series(hist.edges.windows(2).zip(&hist.counts).map(|(edge, count)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], *count as f64)], color.mix(0.8).filled())
        }))
        .map_err(chart_err)?;

    draw_markers(&mut chart, &hist.markers, (0.0, max_count * 1.1))
}

fn draw_heatmap(root: &Area, title: &str, heat: &HeatmapChart, config: &RenderConfig) -> Result<()> {
    let rows = heat.row_labels.len();
    let cols = heat.column_labels.len();
    if rows == 0 || cols == 0 {
        return draw_empty(root, title);
    }
    let max = heat.max_value();
    let base = rgb(config.color(3));
    // First row at the top.
    let row_labels: Vec<String> = heat.row_labels.iter().rev().cloned().collect();
    let column_labels = &heat.column_labels;

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(90)
        .build_cartesian_2d((0usize..cols - 1).into_segmented(), (0usize..rows - 1).into_segmented())
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(cols)
        .y_labels(rows)
        .x_label_formatter(&|v| segment_label(column_labels, v))
        .y_label_formatter(&|v| segment_label(&row_labels, v))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(heat.values.iter().enumerate().flat_map(|(r, values)| {
            let row = rows - 1 - r;
            values.iter().enumerate().map(move |(c, value)| {
                let weight = if max > 0.0 { value / max } else { 0.0 };
                Rectangle::new(
                    [
                        (SegmentValue::Exact(c), SegmentValue::Exact(row)),
                        (SegmentValue::Exact(c + 1), SegmentValue::Exact(row + 1)),
                    ],
                    base.mix(0.05 + 0.95 * weight).filled(),
                )
            })
        }))
        .map_err(chart_err)?;

    Ok(())
}

fn draw_scatter(root: &Area, title: &str, scatter: &ScatterChart, config: &RenderConfig) -> Result<()> {
    if scatter.points.is_empty() {
        return draw_empty(root, title);
    }
    let (x_min, x_max) = value_range(scatter.points.iter().map(|p| p.x).chain([0.0]));
    let (y_min, y_max) = value_range(scatter.points.iter().map(|p| p.y).chain([0.0]));

    let mut chart = ChartBuilder::on(root)
        .caption(title, (FONT, 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max * 1.15, y_min..y_max * 1.15)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc(scatter.x_label.as_str())
        .y_desc(scatter.y_label.as_str())
        .x_label_formatter(&|x| compact(*x))
        .y_label_formatter(&|y| compact(*y))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(scatter.points.iter().enumerate().map(|(i, p)| {
            EmptyElement::at((p.x, p.y))
                + Circle::new((0, 0), 6, rgb(config.color(i)).filled())
                + Text::new(p.label.clone(), (8, -14), (FONT, 13).into_font())
        }))
        .map_err(chart_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::document::{PieChart, ScatterPoint};

    #[test]
    fn test_compact_labels() {
        assert_eq!(compact(12.0), "12");
        assert_eq!(compact(2.5), "2.5");
        assert_eq!(compact(1500.0), "1500");
        assert_eq!(compact(25_000.0), "25k");
        assert_eq!(compact(3_200_000.0), "3.2M");
    }

    #[test]
    fn test_time_axis_label() {
        assert_eq!(axis_label(AxisKind::Time, 1_704_067_200.0), "2024-01-01");
    }

    #[test]
    fn test_render_bar_chart_svg() {
        let chart = Chart::new(
            "Trips per mode",
            ChartSpec::Bars(BarChart::new(
                vec!["bike".into(), "car".into()],
                vec![3.0, 5.0],
                "trips",
            )),
        );
        let svg = render_svg(&chart, &RenderConfig::default()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Trips per mode"));
    }

    #[test]
    fn test_render_pie_and_scatter_svg() {
        let config = RenderConfig::default();
        let pie = Chart::new(
            "Share",
            ChartSpec::Pie(PieChart {
                labels: vec!["bus".into(), "walk".into()],
                values: vec![2.0, 1.0],
            }),
        );
        assert!(render_svg(&pie, &config).unwrap().contains("<polygon"));

        let scatter = Chart::new(
            "Distance vs emission",
            ChartSpec::Scatter(ScatterChart {
                points: vec![ScatterPoint {
                    label: "car".into(),
                    x: 12.0,
                    y: 1800.0,
                }],
                x_label: "km".into(),
                y_label: "g".into(),
            }),
        );
        assert!(render_svg(&scatter, &config).unwrap().contains("<circle"));
    }

    #[test]
    fn test_empty_chart_says_no_data() {
        let chart = Chart::new(
            "Empty",
            ChartSpec::Bars(BarChart::new(Vec::new(), Vec::new(), "trips")),
        );
        assert!(render_svg(&chart, &RenderConfig::default()).unwrap().contains("No data"));
    }
}
