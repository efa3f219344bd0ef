use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::RecordError;

/// IO-level errors for reading and writing record files
#[derive(Error, Debug)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("IO error on {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Rejected line {line} ({content:?}): {reason}")]
    Rejected {
        line: u64,
        content: String,
        #[source]
        reason: RecordError,
    },
}

impl IoError {
    /// Attach the path an I/O failure happened on
    pub fn at_path(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }

    /// Whether reading can continue past this error
    ///
    /// Rejected lines, including invalid UTF-8, only affect a single line.
    /// Operating system I/O failures do not recover.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = IoError::Rejected {
            line: 4,
            content: "bad,line".to_string(),
            reason: RecordError::MissingFields { found: 2 },
        };
        assert_eq!(
            err.to_string(),
            "Rejected line 4 (\"bad,line\"): Expected at least 3 fields, found 2"
        );

        let err = IoError::at_path(
            "/data/out.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "IO error on /data/out.txt: denied");
    }

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let wrapped = IoError::from(io_err);

        match wrapped {
            IoError::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn rejections_are_recoverable() {
        let err = IoError::Rejected {
            line: 1,
            content: String::new(),
            reason: RecordError::Blank,
        };
        assert!(err.is_recoverable());
    }

    #[test]
    fn os_errors_are_not_recoverable() {
        let err = IoError::from(io::Error::other("disk gone"));
        assert!(!err.is_recoverable());

        let err = IoError::at_path("x", io::Error::other("disk gone"));
        assert!(!err.is_recoverable());
    }
}
