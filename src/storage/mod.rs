pub mod error;
pub mod layout;
pub mod pager;

// Re-export commonly used types
pub use error::PageError;
pub use layout::DataLayout;
pub use pager::{Page, PageQuery, PageReader};
