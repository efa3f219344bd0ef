use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::RecordError;
use crate::io::IoError;

/// Policy for surfacing source lines that fail validation
///
/// Rejected lines never abort a run; the policy only decides how they are
/// reported.
pub trait ErrorPolicy: Send + Sync {
    fn handle_rejected(&self, error: &IoError);
}

/// Log each rejected line as a warning and keep going
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipErrors;

impl ErrorPolicy for SkipErrors {
    fn handle_rejected(&self, error: &IoError) {
        match error {
            IoError::Rejected {
                reason: RecordError::Blank,
                line,
                ..
            } => debug!(line, "Skipping blank line"),
            IoError::Rejected {
                line,
                content,
                reason,
            } => warn!(line, content = %content, reason = %reason, "Invalid product data, skipping line"),
            other => warn!(error = %other, "Unreadable line, skipping"),
        }
    }
}

/// Skip rejected lines without logging
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSkip;

impl ErrorPolicy for SilentSkip {
    fn handle_rejected(&self, _error: &IoError) {}
}

/// Reasons a materialization run ends without publishing its views
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to read source: {0}")]
    Source(#[source] IoError),

    #[error("Failed to write sorted output: {0}")]
    Sink(#[source] IoError),

    #[error("Materialization cancelled after {records_written} records")]
    Cancelled { records_written: u64 },

    #[error("Sort task failed: {0}")]
    Task(String),
}

impl PipelineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
