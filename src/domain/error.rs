use thiserror::Error;

/// Reasons a source line is rejected instead of becoming a record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Line is blank")]
    Blank,

    #[error("Expected at least 3 fields, found {found}")]
    MissingFields { found: usize },

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Negative price: {0}")]
    NegativePrice(String),

    #[error("Price has too many decimal places: {0}")]
    PriceTooPrecise(String),

    #[error("Line is not valid UTF-8")]
    InvalidUtf8,
}
