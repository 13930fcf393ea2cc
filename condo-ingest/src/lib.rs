//! condo-ingest: bill text extraction (PDF to text) and the itemized-charge scanner.

pub mod error;
pub mod parsers;
pub mod pdf_text;
pub mod rules;
pub mod source;
pub mod types;

#[cfg(test)]
mod test_pdf;

pub use error::ExtractionError;
pub use parsers::condo_bill::{BillScanner, clean_label};
pub use pdf_text::{LopdfPages, PageTextSource, TextExtractor, extract_text};
pub use rules::ScanRules;
pub use source::{BillDocument, BillSource, DirectorySource};
pub use types::{ScanReport, ScanState, SkipReason, SkippedLine, TextLine};

use condo_core::LineItem;

/// Extract the text of `pdf` and scan it for line items stamped with `period`.
pub fn process_bill(
    pdf: &[u8],
    period: &str,
    scanner: &BillScanner,
) -> Result<Vec<LineItem>, ExtractionError> {
    let text = extract_text(pdf)?;
    let items = scanner.scan(&text, period);
    tracing::info!(period, items = items.len(), "bill scanned");
    Ok(items)
}
