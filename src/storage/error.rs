use std::path::PathBuf;
use thiserror::Error;

use crate::io::IoError;

/// Errors returned by the paginated reader
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Page number must be greater than zero, got {0}")]
    InvalidPageNumber(i64),

    #[error("Page size must be greater than zero, got {0}")]
    InvalidPageSize(i64),

    #[error("Sorted file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read sorted file: {0}")]
    Internal(#[from] IoError),
}

impl PageError {
    /// Whether the caller supplied out-of-range pagination parameters
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidPageNumber(_) | Self::InvalidPageSize(_))
    }
}
