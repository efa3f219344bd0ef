pub mod error;
pub mod pipeline;

// Re-export commonly used types
pub use error::{ErrorPolicy, PipelineError, SilentSkip, SkipErrors};
pub use pipeline::{MaterializationPipeline, MaterializationReport, PipelineState};
