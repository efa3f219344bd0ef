use std::io;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{Stream, StreamExt, future};
use tokio::fs::File;
use tokio::io::AsyncRead;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead};

use super::error::IoError;
use super::parse::parse_line;
use crate::domain::{Record, RecordError};

/// Async stream of records from comma-separated input
///
/// Reads incrementally, so memory stays bounded by one line regardless of
/// input size. Empty lines are skipped. Lines that fail validation are
/// yielded as [`IoError::Rejected`] carrying the 1-based physical line number
/// and the line content; the stream keeps going after them.
pub struct RecordStream {
    inner: Pin<Box<dyn Stream<Item = Result<Record, IoError>> + Send>>,
}

impl RecordStream {
    /// Create a new record stream from an async reader
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        // Split on LF only; a trailing CR is stripped per line.
        let lines = FramedRead::new(reader, AnyDelimiterCodec::new(b"\n".to_vec(), Vec::new()));

        let mut line_number = 0u64;
        let stream = lines.filter_map(move |frame| {
            line_number += 1;
            let item = match frame {
                Ok(bytes) => decode_line(line_number, &bytes),
                Err(e) => Some(Err(framing_error(e))),
            };
            future::ready(item)
        });

        Self {
            inner: Box::pin(stream),
        }
    }

    /// Create a new record stream from a file path
    ///
    /// ```rust,ignore
    /// let stream = RecordStream::from_file("Data/products.txt").await?;
    /// ```
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let file = File::open(path)
            .await
            .map_err(|e| IoError::at_path(path, e))?;
        Ok(Self::new(file))
    }
}

/// Parse one physical line; `None` for an empty line
fn decode_line(line: u64, bytes: &[u8]) -> Option<Result<Record, IoError>> {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    if bytes.is_empty() {
        return None;
    }

    let result = match std::str::from_utf8(bytes) {
        Ok(text) => parse_line(text).map_err(|reason| IoError::Rejected {
            line,
            content: text.to_string(),
            reason,
        }),
        Err(_) => Err(IoError::Rejected {
            line,
            content: String::from_utf8_lossy(bytes).into_owned(),
            reason: RecordError::InvalidUtf8,
        }),
    };
    Some(result)
}

fn framing_error(e: AnyDelimiterCodecError) -> IoError {
    match e {
        AnyDelimiterCodecError::Io(e) => IoError::Io(e),
        other => IoError::Io(io::Error::new(io::ErrorKind::InvalidData, other)),
    }
}

impl Stream for RecordStream {
    type Item = Result<Record, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
