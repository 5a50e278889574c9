//! Report generation for trip analytics
//!
//! Reports are produced in two steps: a builder turns the trip table and its
//! aggregates into a [`ReportDocument`], then a [`ReportGenerator`] encodes the
//! document as PDF, HTML or plain text.

pub mod builder;
pub mod charts;
pub mod document;
pub mod formats;

use crate::core::intensity::IntensityThresholds;
use crate::core::metrics::Aggregates;
use crate::core::models::TripTable;
use crate::error::Result;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

pub use document::ReportDocument;
pub use formats::{HtmlReporter, OutputFormat, PdfReporter, ReportFormat, TextReporter};

/// Author written into every document's metadata
pub const REPORT_AUTHOR: &str = "Greenmove Analytics";

/// Rendering settings passed explicitly to builders and encoders
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Series colours, cycled in order
    pub palette: Vec<(u8, u8, u8)>,
    /// Chart width in pixels (HTML)
    pub chart_width: u32,
    /// Chart height in pixels (HTML)
    pub chart_height: u32,
    /// Page width in millimetres (PDF)
    pub page_width_mm: f32,
    /// Page height in millimetres (PDF)
    pub page_height_mm: f32,
    /// Length of ranked lists
    pub top_n: usize,
    /// Number of histogram bins
    pub histogram_bins: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                (59, 130, 246),
                (16, 185, 129),
                (245, 158, 11),
                (244, 63, 94),
                (139, 92, 246),
                (236, 72, 153),
                (20, 184, 166),
                (249, 115, 22),
                (132, 204, 22),
                (100, 116, 139),
            ],
            chart_width: 760,
            chart_height: 420,
            // A4 landscape
            page_width_mm: 297.0,
            page_height_mm: 210.0,
            top_n: 10,
            histogram_bins: 50,
        }
    }
}

impl RenderConfig {
    /// Palette colour for series `index`
    #[must_use]
    pub fn color(&self, index: usize) -> (u8, u8, u8) {
        if self.palette.is_empty() {
            (59, 130, 246)
        } else {
            self.palette[index % self.palette.len()]
        }
    }
}

/// Which artifact to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    /// Multi-page chart report over the whole dataset
    Global,
    /// Strategic analysis: intensity, modal shares, short trips, peaks
    Strategic,
    /// Plain-text narrative with recommendations
    Narrative,
    /// Personal report for one user
    User(String),
}

impl ReportKind {
    /// Default file name for this artifact in `format`
    #[must_use]
    pub fn default_file_name(&self, format: ReportFormat) -> String {
        let ext = format.extension();
        match self {
            Self::Global => format!("greenmove_global_report.{ext}"),
            Self::Strategic | Self::Narrative => format!("greenmove_analysis.{ext}"),
            Self::User(user) => format!("greenmove_user_{}.{ext}", sanitize_file_stem(user)),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global report"),
            Self::Strategic => write!(f, "analysis report"),
            Self::Narrative => write!(f, "text analysis"),
            Self::User(user) => write!(f, "report for user {user}"),
        }
    }
}

/// Percent-encode bytes that are unsafe in file names
///
/// ASCII alphanumerics, `-`, `_` and `.` pass through; every other byte
/// becomes `%XX`. Distinct ids always give distinct stems.
#[must_use]
pub fn sanitize_file_stem(raw: &str) -> String {
    let mut stem = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
            stem.push(char::from(byte));
        } else {
            let _ = write!(stem, "%{byte:02X}");
        }
    }
    stem
}

/// Data context for report generation
///
/// Everything a builder reads; nothing here is mutated.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    /// Loaded trips
    pub table: &'a TripTable,
    /// Aggregates of `table`
    pub aggregates: &'a Aggregates,
    /// Intensity tiers and target
    pub thresholds: &'a IntensityThresholds,
    /// Rendering settings
    pub config: &'a RenderConfig,
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub const fn new(
        table: &'a TripTable,
        aggregates: &'a Aggregates,
        thresholds: &'a IntensityThresholds,
        config: &'a RenderConfig,
    ) -> Self {
        Self {
            table,
            aggregates,
            thresholds,
            config,
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Encode a document
    ///
    /// # Errors
    /// Returns an error if a chart, the template or the PDF cannot be produced.
    fn render(&self, doc: &ReportDocument, config: &RenderConfig) -> Result<Vec<u8>>;

    /// Encode a document and write it to `output_path`
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails.
    fn generate(&self, doc: &ReportDocument, config: &RenderConfig, output_path: &Path) -> Result<()> {
        let bytes = self.render(doc, config)?;
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, bytes)?;
        Ok(())
    }
}

/// Result of one report invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The artifact was written
    Written(PathBuf),
    /// Nothing was written
    Skipped {
        /// Why the report was skipped
        reason: String,
    },
}

/// Build the document for `kind`
///
/// # Errors
/// Returns [`NoUserData`](crate::error::GreenmoveError::NoUserData) when a user report addresses a user
/// without trips.
pub fn build_document(ctx: &ReportContext, kind: &ReportKind) -> Result<ReportDocument> {
    match kind {
        ReportKind::Global => Ok(builder::global::build(ctx)),
        ReportKind::Strategic => Ok(builder::strategic::build(ctx)),
        ReportKind::Narrative => Ok(builder::narrative::build(ctx)),
        ReportKind::User(user) => builder::user::build(ctx, user),
    }
}

/// Build and write one report
///
/// A user without trips yields [`ReportOutcome::Skipped`] and no file.
///
/// # Errors
/// Returns an error if encoding or writing fails.
pub fn generate_report(
    ctx: &ReportContext,
    kind: &ReportKind,
    format: ReportFormat,
    output_path: &Path,
) -> Result<ReportOutcome> {
    let doc = match build_document(ctx, kind) {
        Ok(doc) => doc,
        Err(e) if e.is_recoverable() => {
            logger::warn!("Skipping {kind}: {e}");
            return Ok(ReportOutcome::Skipped {
                reason: e.to_string(),
            });
        }
        Err(e) => return Err(e),
    };

    logger::debug!(
        "Rendering {kind} as {format}: {} page(s), {} chart(s)",
        doc.pages.len(),
        doc.charts().count()
    );
    format.generator().generate(&doc, ctx.config, output_path)?;
    logger::info!("Wrote {}", output_path.display());
    Ok(ReportOutcome::Written(output_path.to_path_buf()))
}

/// Where to write a report
///
/// An explicit file keeps its name but takes the extension of `format`, so one
/// `-o` value serves every requested format. Otherwise the default name of
/// `kind` is placed in `dir`.
#[must_use]
pub fn resolve_output_path(
    explicit: Option<&Path>,
    dir: &Path,
    kind: &ReportKind,
    format: ReportFormat,
) -> PathBuf {
    explicit.map_or_else(
        || dir.join(kind.default_file_name(format)),
        |path| path.with_extension(format.extension()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_names() {
        assert_eq!(
            ReportKind::Global.default_file_name(ReportFormat::Pdf),
            "greenmove_global_report.pdf"
        );
        assert_eq!(
            ReportKind::Strategic.default_file_name(ReportFormat::Html),
            "greenmove_analysis.html"
        );
        assert_eq!(
            ReportKind::Narrative.default_file_name(ReportFormat::Text),
            "greenmove_analysis.txt"
        );
        assert_eq!(
            ReportKind::User("ab/12 x".into()).default_file_name(ReportFormat::Pdf),
            "greenmove_user_ab%2F12%20x.pdf"
        );
    }

    #[test]
    fn test_user_file_stems_do_not_collide() {
        let ids = ["a@b.com", "a_b.com", "a%40b.com", "usér-3/é", "us_r-3__", ""];
        let stems: std::collections::BTreeSet<String> =
            ids.iter().map(|id| sanitize_file_stem(id)).collect();
        assert_eq!(stems.len(), ids.len());
        assert_eq!(sanitize_file_stem("a@b.com"), "a%40b.com");
        assert_eq!(sanitize_file_stem("usér-3"), "us%C3%A9r-3");
        assert_eq!(sanitize_file_stem("u-42_x.y"), "u-42_x.y");
    }

    #[test]
    fn test_resolve_output_path() {
        let dir = Path::new("out");
        assert_eq!(
            resolve_output_path(None, dir, &ReportKind::Global, ReportFormat::Html),
            PathBuf::from("out/greenmove_global_report.html")
        );
        assert_eq!(
            resolve_output_path(
                Some(Path::new("custom/report.pdf")),
                dir,
                &ReportKind::Global,
                ReportFormat::Html
            ),
            PathBuf::from("custom/report.html")
        );
    }

    #[test]
    fn test_palette_cycles() {
        let config = RenderConfig::default();
        assert_eq!(config.color(0), config.color(config.palette.len()));
    }
}
