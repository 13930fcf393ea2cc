//! PDF bytes to a single text blob, one segment per page.
//!
//! Bills put many rows inside one `BT ... ET` block and move between them
//! with `Td`/`TD`/`T*`, so lines are rebuilt from the text-positioning
//! operators: a vertical move starts a new line, a horizontal move on the
//! same baseline inserts a space.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};

use crate::error::ExtractionError;

/// Baselines closer than this (text space units) are the same line
const SAME_LINE_EPSILON: f32 = 0.5;

/// `TJ` adjustments past this (thousandths of an em) read as a word gap
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Anything that can turn PDF bytes into per-page text, first page first
pub trait PageTextSource {
    fn page_texts(&self, pdf: &[u8]) -> Result<Vec<String>, ExtractionError>;
}

/// `lopdf`-backed page text extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfPages;

impl PageTextSource for LopdfPages {
    fn page_texts(&self, pdf: &[u8]) -> Result<Vec<String>, ExtractionError> {
        let doc =
            Document::load_mem(pdf).map_err(|e| ExtractionError::InvalidPdf(e.to_string()))?;

        // get_pages is keyed by 1-based page number, already in order
        let pages = doc
            .get_pages()
            .into_iter()
            .map(|(page_num, page_id)| {
                let text = page_text(&doc, page_num, page_id);
                if text.trim().is_empty() {
                    tracing::warn!(page = page_num, "page has no extractable text");
                }
                text
            })
            .collect();

        Ok(pages)
    }
}

fn page_text(doc: &Document, page_num: u32, page_id: ObjectId) -> String {
    let content = match doc.get_page_content(page_id) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(page = page_num, error = %e, "unreadable content stream");
            return String::new();
        }
    };
    let content = match Content::decode(&content) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(page = page_num, error = %e, "undecodable content stream");
            return String::new();
        }
    };

    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    text_lines(&content.operations, |font, bytes| {
        fonts
            .get(font)
            .and_then(|f| f.get_font_encoding(doc).ok())
            .and_then(|enc| Document::decode_text(&enc, bytes).ok())
            .unwrap_or_else(|| decode_raw(bytes))
    })
}

/// Best-effort decoding for strings whose font encoding is unknown
fn decode_raw(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct LineBuilder {
    lines: Vec<String>,
    current: String,
    /// Baseline of the text cursor
    y: f32,
    /// Baseline of `current`, set by its first glyphs
    line_y: Option<f32>,
    leading: f32,
}

impl LineBuilder {
    fn move_to(&mut self, y: f32) {
        self.y = y;
        if self.current.is_empty() {
            return;
        }
        match self.line_y {
            Some(line_y) if (line_y - y).abs() > SAME_LINE_EPSILON => self.break_line(),
            _ => self.space(),
        }
    }

    fn space(&mut self) {
        if !self.current.is_empty() && !self.current.ends_with(char::is_whitespace) {
            self.current.push(' ');
        }
    }

    fn show(&mut self, text: &str) {
        if self.current.is_empty() {
            self.line_y = Some(self.y);
        }
        self.current.push_str(text);
    }

    fn break_line(&mut self) {
        let line = self.current.trim_end();
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
        self.current.clear();
        self.line_y = None;
    }

    fn next_line(&mut self) {
        self.break_line();
        self.y -= self.leading;
    }

    fn finish(mut self) -> String {
        self.break_line();
        self.lines.join("\n")
    }
}

/// Rebuild text lines from a page's content operations.
///
/// `decode` turns a shown string into text given the current font resource name.
pub fn text_lines<F>(operations: &[Operation], decode: F) -> String
where
    F: Fn(&[u8], &[u8]) -> String,
{
    let mut b = LineBuilder::default();
    let mut font: Vec<u8> = Vec::new();

    for op in operations {
        let args = &op.operands;
        match op.operator.as_str() {
            "BT" => b.y = 0.0,
            "Tf" => {
                if let Some(Object::Name(name)) = args.first() {
                    font = name.clone();
                }
            }
            "TL" => {
                if let Some(leading) = args.first().and_then(number) {
                    b.leading = leading;
                }
            }
            "Td" => {
                if let Some(ty) = args.get(1).and_then(number) {
                    b.move_to(b.y + ty);
                }
            }
            "TD" => {
                if let Some(ty) = args.get(1).and_then(number) {
                    b.leading = -ty;
                    b.move_to(b.y + ty);
                }
            }
            "Tm" => {
                if let Some(f) = args.get(5).and_then(number) {
                    b.move_to(f);
                }
            }
            "T*" => b.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = args.first() {
                    b.show(&decode(&font, bytes));
                }
            }
            "'" => {
                b.next_line();
                if let Some(Object::String(bytes, _)) = args.first() {
                    b.show(&decode(&font, bytes));
                }
            }
            "\"" => {
                b.next_line();
                if let Some(Object::String(bytes, _)) = args.get(2) {
                    b.show(&decode(&font, bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = args.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => b.show(&decode(&font, bytes)),
                            other => {
                                if number(other).is_some_and(|n| -n > TJ_SPACE_THRESHOLD) {
                                    b.space();
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    b.finish()
}

/// Joins page texts with newlines
#[derive(Debug, Clone, Default)]
pub struct TextExtractor<S = LopdfPages> {
    pages: S,
}

impl<S: PageTextSource> TextExtractor<S> {
    pub fn new(pages: S) -> Self {
        Self { pages }
    }

    pub fn extract(&self, pdf: &[u8]) -> Result<String, ExtractionError> {
        Ok(self.pages.page_texts(pdf)?.join("\n"))
    }
}

/// Extract all page text from `pdf` using lopdf.
pub fn extract_text(pdf: &[u8]) -> Result<String, ExtractionError> {
    TextExtractor::new(LopdfPages).extract(pdf)
}
