//! Prelude module for convenient imports
//!
//! Import everything you need with: `use catalog::prelude::*;`

// Domain types
pub use crate::domain::{Price, Record, RecordError, SortKey};

// Config types
pub use crate::config::{
    AppConfig, ConfigError, LogConfig, LogFormat, LogLevel, PipelineConfig, ReaderConfig,
    StorageConfig,
};

// Engine types
pub use crate::engine::{SortedBatch, sort_batch};

// IO types
pub use crate::io::{IoError, MultiSinkWriter, RecordStream, parse_line};

// Storage types
pub use crate::storage::{DataLayout, Page, PageError, PageQuery, PageReader};

// Streaming types
pub use crate::streaming::{
    ErrorPolicy, MaterializationPipeline, MaterializationReport, PipelineError, PipelineState,
    SilentSkip, SkipErrors,
};

// App types
pub use crate::app::{AppError, CliApp, init_tracing};
