use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid label rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid label rule: {0}")]
    Rule(String),
}
