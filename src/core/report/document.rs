//! Format-neutral report document
//!
//! Builders fill a [`ReportDocument`] once; each format encoder walks the same
//! pages and blocks.

use chrono::{Local, NaiveDateTime};

/// A complete report: metadata and pages
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    /// Document title
    pub title: String,
    /// Document subject, stored in the file metadata
    pub subject: String,
    /// Author, stored in the file metadata
    pub author: String,
    /// Creation time (local)
    pub created: NaiveDateTime,
    /// Pages in reading order
    pub pages: Vec<Page>,
}

impl ReportDocument {
    /// Create an empty document stamped with the current local time
    #[must_use]
    pub fn new(title: impl Into<String>, subject: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subject: subject.into(),
            author: author.into(),
            created: Local::now().naive_local(),
            pages: Vec::new(),
        }
    }

    /// Append a page
    pub fn push_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Every chart of the document, in reading order
    pub fn charts(&self) -> impl Iterator<Item = &Chart> {
        self.pages.iter().flat_map(|page| {
            page.blocks.iter().filter_map(|block| match block {
                Block::Chart(chart) => Some(chart),
                _ => None,
            })
        })
    }

    /// Creation time formatted for footers
    #[must_use]
    pub fn created_label(&self) -> String {
        self.created.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// One page: a heading and its blocks
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Page heading
    pub heading: String,
    /// Content blocks
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create an empty page
    #[must_use]
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            blocks: Vec::new(),
        }
    }

    /// Add a block, builder style
    #[must_use]
    pub fn with(mut self, block: impl Into<Block>) -> Self {
        self.blocks.push(block.into());
        self
    }

    /// Add a block
    pub fn push(&mut self, block: impl Into<Block>) {
        self.blocks.push(block.into());
    }
}

/// Content block
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Labelled values
    KeyValues(KeyValues),
    /// A chart
    Chart(Chart),
    /// A table
    Table(Table),
    /// Free text, one entry per paragraph
    Paragraphs(Vec<String>),
    /// A titled bullet list
    Bullets(Bullets),
    /// A highlighted sentence
    Callout(Callout),
}

/// Labelled values panel
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValues {
    /// Panel title
    pub title: String,
    /// `(label, value)` rows
    pub rows: Vec<(String, String)>,
}

impl KeyValues {
    /// Create an empty panel
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Add a row, builder style
    #[must_use]
    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push((label.into(), value.into()));
        self
    }
}

/// Table with a header row
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table title
    pub title: String,
    /// Column headers
    pub headers: Vec<String>,
    /// Rows of cells, one cell per header
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given headers
    #[must_use]
    pub fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row
    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }
}

/// Titled bullet list
#[derive(Debug, Clone, PartialEq)]
pub struct Bullets {
    /// List title
    pub title: String,
    /// Items
    pub items: Vec<String>,
}

impl Bullets {
    /// Create a list
    #[must_use]
    pub fn new(title: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }
}

/// Highlighted sentence
#[derive(Debug, Clone, PartialEq)]
pub struct Callout {
    /// Colour family
    pub tone: Tone,
    /// Text
    pub text: String,
}

impl Callout {
    /// Create a callout
    #[must_use]
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Semantic colour of a bar or callout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// No judgement
    Neutral,
    /// Favourable
    Good,
    /// Worth watching
    Warning,
    /// Needs action
    Critical,
}

impl Tone {
    /// RGB colour of the tone
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Neutral => (100, 116, 139),
            Self::Good => (16, 185, 129),
            Self::Warning => (245, 158, 11),
            Self::Critical => (244, 63, 94),
        }
    }

    /// CSS class suffix
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// Titled chart
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Chart title
    pub title: String,
    /// What to draw
    pub spec: ChartSpec,
}

impl Chart {
    /// Create a chart
    #[must_use]
    pub fn new(title: impl Into<String>, spec: ChartSpec) -> Self {
        Self {
            title: title.into(),
            spec,
        }
    }
}

/// Chart kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    /// Bars, one per label
    Bars(BarChart),
    /// Pie with percentage labels
    Pie(PieChart),
    /// Connected points
    Line(LineChart),
    /// Pre-binned histogram
    Histogram(HistogramChart),
    /// Density grid
    Heatmap(HeatmapChart),
    /// Labelled points
    Scatter(ScatterChart),
}

/// Bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    /// Bar labels
    pub labels: Vec<String>,
    /// Bar values
    pub values: Vec<f64>,
    /// Value unit, shown on the axis
    pub unit: String,
    /// Draw bars horizontally
    pub horizontal: bool,
    /// Colour per bar; empty means palette order
    pub tones: Vec<Tone>,
}

impl BarChart {
    /// Vertical bars coloured from the palette
    #[must_use]
    pub fn new(labels: Vec<String>, values: Vec<f64>, unit: impl Into<String>) -> Self {
        Self {
            labels,
            values,
            unit: unit.into(),
            horizontal: false,
            tones: Vec::new(),
        }
    }

    /// Draw horizontally
    #[must_use]
    pub const fn horizontal(mut self) -> Self {
        self.horizontal = true;
        self
    }

    /// Colour each bar by tone
    #[must_use]
    pub fn with_tones(mut self, tones: Vec<Tone>) -> Self {
        self.tones = tones;
        self
    }
}

/// Pie chart
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    /// Slice labels
    pub labels: Vec<String>,
    /// Slice values
    pub values: Vec<f64>,
}

impl PieChart {
    /// Share of each slice in percent; all zero when the total is zero
    #[must_use]
    pub fn shares(&self) -> Vec<f64> {
        let total: f64 = self.values.iter().sum();
        self.values
            .iter()
            .map(|v| if total > 0.0 { v / total * 100.0 } else { 0.0 })
            .collect()
    }
}

/// How x values of a line chart are labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Plain numbers
    Value,
    /// Seconds since the Unix epoch, labelled as dates
    Time,
}

/// Vertical reference line
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Legend text
    pub label: String,
    /// Position on the x axis
    pub value: f64,
}

impl Marker {
    /// Create a marker
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Line chart
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    /// Points in x order
    pub points: Vec<(f64, f64)>,
    /// Labelling of x values
    pub x_axis: AxisKind,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
    /// Reference lines
    pub markers: Vec<Marker>,
}

/// Histogram over pre-computed bins
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    /// Bin edges, one more than counts
    pub edges: Vec<f64>,
    /// Count per bin
    pub counts: Vec<usize>,
    /// X axis description
    pub x_label: String,
    /// Reference lines
    pub markers: Vec<Marker>,
}

/// Heatmap grid
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapChart {
    /// Row labels, top to bottom
    pub row_labels: Vec<String>,
    /// Column labels, left to right
    pub column_labels: Vec<String>,
    /// Values, one row per row label
    pub values: Vec<Vec<f64>>,
}

impl HeatmapChart {
    /// Largest cell value, zero for an empty grid
    #[must_use]
    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }
}

/// Scatter point with a label
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    /// Point label
    pub label: String,
    /// X value
    pub x: f64,
    /// Y value
    pub y: f64,
}

/// Scatter chart
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    /// Points
    pub points: Vec<ScatterPoint>,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
}

impl From<KeyValues> for Block {
    fn from(value: KeyValues) -> Self {
        Self::KeyValues(value)
    }
}

impl From<Chart> for Block {
    fn from(value: Chart) -> Self {
        Self::Chart(value)
    }
}

impl From<Table> for Block {
    fn from(value: Table) -> Self {
        Self::Table(value)
    }
}

impl From<Bullets> for Block {
    fn from(value: Bullets) -> Self {
        Self::Bullets(value)
    }
}

impl From<Callout> for Block {
    fn from(value: Callout) -> Self {
        Self::Callout(value)
    }
}

/// Value range covered by a set of numbers, widened when degenerate
#[must_use]
pub fn value_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        (0.0, 1.0)
    } else if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pie_shares() {
        let pie = PieChart {
            labels: vec!["car".into(), "bike".into()],
            values: vec![3.0, 1.0],
        };
        assert_eq!(pie.shares(), vec![75.0, 25.0]);

        let empty = PieChart {
            labels: vec!["walk".into()],
            values: vec![0.0],
        };
        assert_eq!(empty.shares(), vec![0.0]);
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range([2.0, 5.0, 3.0]), (2.0, 5.0));
        assert_eq!(value_range([4.0]), (3.5, 4.5));
        assert_eq!(value_range(Vec::<f64>::new()), (0.0, 1.0));
    }

    #[test]
    fn test_document_collects_charts() {
        let mut doc = ReportDocument::new("Title", "Subject", "Author");
        doc.push_page(
            Page::new("One")
                .with(KeyValues::new("Panel").row("Trips", "3"))
                .with(Chart::new(
                    "Pie",
                    ChartSpec::Pie(PieChart {
                        labels: vec![],
                        values: vec![],
                    }),
                )),
        );
        assert_eq!(doc.charts().count(), 1);
        assert_eq!(doc.pages[0].blocks.len(), 2);
    }
}
