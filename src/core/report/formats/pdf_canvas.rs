//! Page flow and drawing primitives on top of `printpdf`
//!
//! Coordinates are millimetres from the bottom-left corner of the page. The
//! canvas keeps a vertical cursor that content blocks consume from the top;
//! when a block does not fit, a continuation page is opened.

#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use crate::error::{GreenmoveError, Result};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Polygon, Rect, Rgb,
};
use printpdf::path::{PaintMode, WindingOrder};
use std::io::{BufWriter, Cursor};

/// Page margin on every side
pub const MARGIN: f32 = 15.0;
/// Height reserved for the footer
const FOOTER_HEIGHT: f32 = 10.0;
/// Average Helvetica advance, in mm per point of font size
const CHAR_WIDTH: f32 = 0.176;

/// 8-bit RGB colour
pub type Rgb8 = (u8, u8, u8);

/// Body text colour
pub const INK: Rgb8 = (15, 23, 42);
/// Secondary text colour
pub const MUTED: Rgb8 = (100, 116, 139);
/// Rules and axes
pub const RULE: Rgb8 = (203, 213, 225);
/// Accent used by headings
pub const ACCENT: Rgb8 = (4, 120, 87);

fn pdf_err<E: std::fmt::Display>(e: E) -> GreenmoveError {
    GreenmoveError::Pdf(e.to_string())
}

fn color(rgb: Rgb8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(rgb.0) / 255.0,
        f32::from(rgb.1) / 255.0,
        f32::from(rgb.2) / 255.0,
        None,
    ))
}

fn point(x: f32, y: f32) -> (Point, bool) {
    (Point::new(Mm(x), Mm(y)), false)
}

/// Blend a colour toward white; `amount` 1.0 gives white
#[must_use]
pub fn lighten(rgb: Rgb8, amount: f32) -> Rgb8 {
    let mix = |c: u8| -> u8 {
        let c = f32::from(c);
        (c + (255.0 - c) * amount.clamp(0.0, 1.0)).round() as u8
    };
    (mix(rgb.0), mix(rgb.1), mix(rgb.2))
}

/// Replace characters the built-in fonts cannot show
#[must_use]
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            c if c.is_ascii() => c,
            '₂' => '2',
            '–' | '—' | '−' | '•' | '·' => '-',
            '’' | '‘' => '\'',
            '“' | '”' => '"',
            'à' | 'â' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            _ => '?',
        })
        .collect()
}

/// Estimated width of `text` at `size` points
#[must_use]
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * CHAR_WIDTH
}

/// Truncate `text` so it fits in `width` at `size` points
#[must_use]
pub fn fit(text: &str, size: f32, width: f32) -> String {
    let max_chars = (width / (size * CHAR_WIDTH)).floor().max(0.0) as usize;
    if text.chars().count() <= max_chars {
        text.to_string()
    } else if max_chars <= 2 {
        text.chars().take(max_chars).collect()
    } else {
        let mut short: String = text.chars().take(max_chars - 2).collect();
        short.push_str("..");
        short
    }
}

/// Greedy word wrap to lines that fit in `width` at `size` points
#[must_use]
pub fn wrap(text: &str, size: f32, width: f32) -> Vec<String> {
    let max_chars = ((width / (size * CHAR_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Text alignment relative to the x coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// Text starts at x
    Left,
    /// Text is centred on x
    Center,
    /// Text ends at x
    Right,
}

/// A PDF under construction with a flowing vertical cursor
pub struct Canvas {
    doc: PdfDocumentReference,
    page: PdfPageIndex,
    layer: PdfLayerIndex,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    width: f32,
    height: f32,
    y: f32,
    page_count: usize,
    footer: String,
    heading: String,
    fresh: bool,
}

impl Canvas {
    /// Open a document with one empty page
    ///
    /// # Errors
    /// Returns an error if the built-in fonts cannot be registered.
    pub fn new(title: &str, width: f32, height: f32, footer: &str) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(sanitize(title), Mm(width), Mm(height), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        let canvas = Self {
            doc,
            page,
            layer,
            regular,
            bold,
            width,
            height,
            y: height - MARGIN,
            page_count: 1,
            footer: sanitize(footer),
            heading: String::new(),
            fresh: true,
        };
        canvas.draw_footer();
        Ok(canvas)
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc.get_page(self.page).get_layer(self.layer)
    }

    /// Vertical cursor
    #[must_use]
    pub const fn cursor(&self) -> f32 {
        self.y
    }

    /// Move the cursor down by `dy`
    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    /// Left edge of the content area
    #[must_use]
    pub const fn left(&self) -> f32 {
        MARGIN
    }

    /// Width of the content area
    #[must_use]
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * MARGIN
    }

    /// Height available on an empty page below a heading
    #[must_use]
    pub fn page_capacity(&self) -> f32 {
        self.height - 2.0 * MARGIN - FOOTER_HEIGHT - 14.0
    }

    /// Number of pages so far
    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    fn add_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(self.width), Mm(self.height), "Layer 1");
        self.page = page;
        self.layer = layer;
        self.page_count += 1;
        self.y = self.height - MARGIN;
        self.fresh = true;
        self.draw_footer();
    }

    fn draw_footer(&self) {
        let y = MARGIN - 5.0;
        self.line(&[(MARGIN, y + 4.0), (self.width - MARGIN, y + 4.0)], RULE, 0.5);
        self.text(&self.footer, 7.5, MARGIN, y, false, MUTED, Align::Left);
        self.text(
            &format!("Page {}", self.page_count),
            7.5,
            self.width - MARGIN,
            y,
            false,
            MUTED,
            Align::Right,
        );
    }

    fn draw_heading(&mut self, text: &str) {
        self.advance(7.0);
        self.text(text, 16.0, MARGIN, self.y, true, ACCENT, Align::Left);
        self.advance(3.0);
        self.line(&[(MARGIN, self.y), (self.width - MARGIN, self.y)], ACCENT, 1.0);
        self.advance(4.0);
        self.fresh = false;
    }

    /// Draw the document title at the top of the first page
    ///
    /// The page stays open for the first [`start_page`](Self::start_page).
    pub fn title(&mut self, title: &str, subtitle: &str) {
        self.advance(9.0);
        self.text(title, 22.0, MARGIN, self.y, true, INK, Align::Left);
        self.advance(6.5);
        self.text(subtitle, 10.5, MARGIN, self.y, false, MUTED, Align::Left);
        self.advance(4.0);
    }

    /// Start a report page: a fresh PDF page with `heading`
    pub fn start_page(&mut self, heading: &str) {
        if !self.fresh {
            self.add_page();
        }
        self.heading = sanitize(heading);
        let heading = self.heading.clone();
        self.draw_heading(&heading);
    }

    /// Make sure `needed` mm remain above the footer, opening a continuation
    /// page otherwise
    pub fn ensure_space(&mut self, needed: f32) {
        if self.y - needed < MARGIN + FOOTER_HEIGHT {
            self.add_page();
            let heading = format!("{} (continued)", self.heading);
            self.draw_heading(&heading);
        }
    }

    /// Draw a text line with its baseline at `y`
    #[allow(clippy::too_many_arguments)]
    pub fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool, rgb: Rgb8, align: Align) {
        let text = sanitize(text);
        let x = match align {
            Align::Left => x,
            Align::Center => x - text_width(&text, size) / 2.0,
            Align::Right => x - text_width(&text, size),
        };
        let layer = self.layer();
        layer.set_fill_color(color(rgb));
        let font = if bold { &self.bold } else { &self.regular };
        layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    /// Fill an axis-aligned rectangle given two opposite corners
    pub fn fill_rect(&self, x0: f32, y0: f32, x1: f32, y1: f32, rgb: Rgb8) {
        let layer = self.layer();
        layer.set_fill_color(color(rgb));
        layer.add_rect(Rect::new(
            Mm(x0.min(x1)),
            Mm(y0.min(y1)),
            Mm(x0.max(x1)),
            Mm(y0.max(y1)),
        ));
    }

    /// Stroke an open polyline
    pub fn line(&self, points: &[(f32, f32)], rgb: Rgb8, thickness: f32) {
        if points.len() < 2 {
            return;
        }
        let layer = self.layer();
        layer.set_outline_color(color(rgb));
        layer.set_outline_thickness(thickness);
        layer.add_line(Line {
            points: points.iter().map(|&(x, y)| point(x, y)).collect(),
            is_closed: false,
        });
    }

    /// Fill a closed polygon
    pub fn fill_polygon(&self, points: &[(f32, f32)], rgb: Rgb8) {
        if points.len() < 3 {
            return;
        }
        let layer = self.layer();
        layer.set_fill_color(color(rgb));
        layer.add_polygon(Polygon {
            rings: vec![points.iter().map(|&(x, y)| point(x, y)).collect()],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Serialize the document with its metadata
    ///
    /// # Errors
    /// Returns an error if the document cannot be written.
    pub fn finish(self, author: &str, subject: &str) -> Result<Vec<u8>> {
        let doc = self
            .doc
            .with_author(sanitize(author))
            .with_subject(sanitize(subject))
            .with_creator(format!("greenmove {}", crate::get_version()));
        let mut buf = BufWriter::new(Cursor::new(Vec::new()));
        doc.save(&mut buf).map_err(pdf_err)?;
        let cursor = buf.into_inner().map_err(pdf_err)?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_ascii() {
        assert_eq!(sanitize("CO₂ – 5 km • ok"), "CO2 - 5 km - ok");
        assert_eq!(sanitize("Déplacement"), "Deplacement");
        assert_eq!(sanitize("汽车"), "??");
    }

    #[test]
    fn test_fit_truncates() {
        assert_eq!(fit("bike", 10.0, 100.0), "bike");
        // 10 pt gives 1.76 mm per char: 10 mm holds 5 chars
        assert_eq!(fit("motorcycle", 10.0, 10.0), "mot..");
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        // 20 chars per line
        let lines = wrap("one two three four five six seven", 10.0, 36.0);
        assert_eq!(lines, vec!["one two three four", "five six seven"]);
        assert!(wrap("", 10.0, 36.0).is_empty());
    }

    #[test]
    fn test_lighten() {
        assert_eq!(lighten((0, 100, 255), 1.0), (255, 255, 255));
        assert_eq!(lighten((0, 100, 255), 0.0), (0, 100, 255));
    }

    #[test]
    fn test_canvas_produces_pdf() {
        let mut canvas = Canvas::new("Test", 297.0, 210.0, "footer").unwrap();
        canvas.start_page("First");
        canvas.fill_rect(20.0, 20.0, 40.0, 40.0, ACCENT);
        canvas.ensure_space(500.0);
        assert_eq!(canvas.page_count(), 2);
        let bytes = canvas.finish("Author", "Subject").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
