pub mod error;
pub mod parse;
pub mod record_reader;
pub mod record_writer;

// Re-export commonly used types
pub use error::IoError;
pub use parse::{parse_fields, parse_line};
pub use record_reader::RecordStream;
pub use record_writer::MultiSinkWriter;
