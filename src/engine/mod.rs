pub mod sorter;

// Re-export commonly used types
pub use sorter::{SortedBatch, sort_batch};
