//! Report format implementations
//!
//! Provides encoders for the supported formats: PDF, HTML and plain text.

pub mod html;
pub mod pdf;
mod pdf_canvas;
pub mod text;

pub use html::HtmlReporter;
pub use pdf::PdfReporter;
pub use text::TextReporter;

use crate::core::report::ReportGenerator;
use std::fmt;
use std::str::FromStr;

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Multi-page PDF with vector charts
    Pdf,
    /// Self-contained HTML with inline SVG charts
    Html,
    /// Plain text narrative
    Text,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Text => "txt",
        }
    }

    /// Encoder for this format
    #[must_use]
    pub fn generator(&self) -> Box<dyn ReportGenerator> {
        match self {
            Self::Pdf => Box::new(PdfReporter::new()),
            Self::Html => Box::new(HtmlReporter::new()),
            Self::Text => Box::new(TextReporter::new()),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "html" | "htm" => Ok(Self::Html),
            "txt" | "text" => Ok(Self::Text),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Html => write!(f, "html"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Formats requested on the command line for document reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// PDF only
    #[default]
    Pdf,
    /// HTML only
    Html,
    /// PDF and HTML
    Both,
}

impl OutputFormat {
    /// Concrete formats to produce, PDF first
    #[must_use]
    pub fn formats(self) -> Vec<ReportFormat> {
        match self {
            Self::Pdf => vec![ReportFormat::Pdf],
            Self::Html => vec![ReportFormat::Html],
            Self::Both => vec![ReportFormat::Pdf, ReportFormat::Html],
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "html" | "htm" => Ok(Self::Html),
            "both" => Ok(Self::Both),
            _ => Err(format!("Unknown output format: {s} (expected pdf, html or both)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Html => write!(f, "html"),
            Self::Both => write!(f, "both"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_parse() {
        assert_eq!("PDF".parse::<ReportFormat>(), Ok(ReportFormat::Pdf));
        assert_eq!("htm".parse::<ReportFormat>(), Ok(ReportFormat::Html));
        assert_eq!("text".parse::<ReportFormat>(), Ok(ReportFormat::Text));
        assert!("docx".parse::<ReportFormat>().is_err());
        assert_eq!(ReportFormat::Text.extension(), "txt");
    }

    #[test]
    fn test_output_format_expands() {
        assert_eq!(
            "both".parse::<OutputFormat>().map(OutputFormat::formats),
            Ok(vec![ReportFormat::Pdf, ReportFormat::Html])
        );
        assert_eq!(OutputFormat::default().formats(), vec![ReportFormat::Pdf]);
        assert!("svg".parse::<OutputFormat>().is_err());
    }
}
