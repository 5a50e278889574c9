//! HTML report generator
//!
//! Generates self-contained HTML documents. Every chart is rendered to SVG and
//! embedded as a base64 data URI, so the file can be opened or mailed alone.

use crate::core::report::charts::render_svg;
use crate::core::report::document::{Block, ReportDocument};
use crate::core::report::{RenderConfig, ReportGenerator};
use crate::error::Result;
use askama::Template;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// HTML report generator with embedded SVG charts
pub struct HtmlReporter;

/// One labelled value of a panel
struct KeyValue {
    key: String,
    value: String,
}

/// A document block flattened for the template
///
/// `kind` selects which of the other fields are filled.
struct BlockView {
    kind: &'static str,
    title: String,
    rows: Vec<KeyValue>,
    headers: Vec<String>,
    cells: Vec<Vec<String>>,
    items: Vec<String>,
    tone: &'static str,
    image: String,
}

impl BlockView {
    fn empty(kind: &'static str, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            rows: Vec::new(),
            headers: Vec::new(),
            cells: Vec::new(),
            items: Vec::new(),
            tone: "neutral",
            image: String::new(),
        }
    }
}

struct PageView {
    heading: String,
    blocks: Vec<BlockView>,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    title: &'a str,
    subject: &'a str,
    author: &'a str,
    created: String,
    version: &'static str,
    pages: Vec<PageView>,
}

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the document as an HTML string
    ///
    /// # Errors
    /// Returns an error if a chart or the template cannot be rendered.
    pub fn render_string(&self, doc: &ReportDocument, config: &RenderConfig) -> Result<String> {
        let pages = doc
            .pages
            .iter()
            .map(|page| {
                Ok(PageView {
                    heading: page.heading.clone(),
                    blocks: page
                        .blocks
                        .iter()
                        .map(|block| Self::block_view(block, config))
                        .collect::<Result<Vec<_>>>()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let template = ReportTemplate {
            title: &doc.title,
            subject: &doc.subject,
            author: &doc.author,
            created: doc.created_label(),
            version: crate::get_version(),
            pages,
        };
        Ok(template.render()?)
    }

    fn block_view(block: &Block, config: &RenderConfig) -> Result<BlockView> {
        let view = match block {
            Block::KeyValues(panel) => BlockView {
                rows: panel
                    .rows
                    .iter()
                    .map(|(key, value)| KeyValue {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .collect(),
                ..BlockView::empty("panel", panel.title.clone())
            },
            Block::Chart(chart) => {
                let svg = render_svg(chart, config)?;
                BlockView {
                    image: format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg)),
                    ..BlockView::empty("chart", chart.title.clone())
                }
            }
            Block::Table(table) => BlockView {
                headers: table.headers.clone(),
                cells: table.rows.clone(),
                ..BlockView::empty("table", table.title.clone())
            },
            Block::Paragraphs(paragraphs) => BlockView {
                items: paragraphs.clone(),
                ..BlockView::empty("text", "")
            },
            Block::Bullets(list) => BlockView {
                items: list.items.clone(),
                ..BlockView::empty("list", list.title.clone())
            },
            Block::Callout(callout) => BlockView {
                items: vec![callout.text.clone()],
                tone: callout.tone.css_class(),
                ..BlockView::empty("callout", "")
            },
        };
        Ok(view)
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn render(&self, doc: &ReportDocument, config: &RenderConfig) -> Result<Vec<u8>> {
        Ok(self.render_string(doc, config)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::document::{
        BarChart, Callout, Chart, ChartSpec, KeyValues, Page, Table, Tone,
    };

    fn doc() -> ReportDocument {
        let mut table = Table::new("Per mode", &["Mode", "Trips"]);
        table.push_row(vec!["bike".into(), "2".into()]);
        let mut doc = ReportDocument::new("Report <test>", "Subject", "Greenmove Analytics");
        doc.push_page(
            Page::new("Overview")
                .with(KeyValues::new("Statistics").row("Trips", "2"))
                .with(Chart::new(
                    "Trips per mode",
                    ChartSpec::Bars(BarChart::new(vec!["bike".into()], vec![2.0], "trips")),
                ))
                .with(table)
                .with(Callout::new(Tone::Good, "On target")),
        );
        doc
    }

    #[test]
    fn test_html_embeds_charts_as_data_uri() {
        let html = HtmlReporter::new()
            .render_string(&doc(), &RenderConfig::default())
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("src=\"data:image/svg+xml;base64,"));
        assert!(html.contains("<meta name=\"author\" content=\"Greenmove Analytics\">"));
        assert!(html.contains("callout good"));
        assert!(html.contains("<td>bike</td>"));
    }

    #[test]
    fn test_html_escapes_text() {
        let html = HtmlReporter::new()
            .render_string(&doc(), &RenderConfig::default())
            .unwrap();
        assert!(html.contains("Report &lt;test&gt;"));
        assert!(!html.contains("Report <test>"));
    }
}
