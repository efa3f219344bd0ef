use std::io;
use thiserror::Error;

use crate::config::ConfigError;
use crate::io::IoError;
use crate::storage::PageError;
use crate::streaming::PipelineError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Record IO error: {0}")]
    RecordIo(#[from] IoError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Materialization error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Page error: {0}")]
    Page(#[from] PageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
