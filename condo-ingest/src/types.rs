use condo_core::LineItem;
use serde::Serialize;

/// Scanner position relative to the itemized-charges block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    OutsideDetail,
    InDetail,
}

/// One line of extracted text and its ordinal within the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLine<'a> {
    pub position: usize,
    pub raw: &'a str,
}

/// Why an in-section line produced no item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum SkipReason {
    Blank,
    HorizontalRule,
    StopWord(String),
    NoAmount,
    NumericLabel,
    LabelTooLong,
    LabelTooShort,
    NoWord,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    pub position: usize,
    pub line: String,
    pub reason: SkipReason,
}

/// Items plus rejected in-section lines, for rule debugging
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub items: Vec<LineItem>,
    pub skipped: Vec<SkippedLine>,
    /// How many times the section header opened a detail block.
    /// More than one means trailing text after a terminator was scanned again.
    pub sections_opened: usize,
}
