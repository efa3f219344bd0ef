pub mod error;
pub mod price;
pub mod record;

// Re-export commonly used types
pub use error::RecordError;
pub use price::Price;
pub use record::{Record, SortKey};
