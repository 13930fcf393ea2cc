use thiserror::Error;

/// Failure to read a document as a PDF container.
///
/// Pages without a text layer are not errors; they extract as empty text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("not a readable PDF: {0}")]
    InvalidPdf(String),
}
