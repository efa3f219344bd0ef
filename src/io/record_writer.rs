use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use super::error::IoError;
use crate::domain::SortKey;
use crate::engine::SortedBatch;

struct Sink {
    key: SortKey,
    path: PathBuf,
    writer: BufWriter<File>,
    lines: u64,
}

/// Appends each batch's three orderings to three output files
///
/// Files are truncated on creation. Every batch is flushed before
/// [`MultiSinkWriter::write_batch`] returns. Output is a concatenation of
/// per-batch sorted runs; records are never re-sorted across batches.
pub struct MultiSinkWriter {
    sinks: Vec<Sink>,
}

impl MultiSinkWriter {
    /// Create (or truncate) one output file per sort key
    pub async fn create<I, P>(targets: I) -> Result<Self, IoError>
    where
        I: IntoIterator<Item = (SortKey, P)>,
        P: AsRef<Path>,
    {
        let mut sinks = Vec::new();
        for (key, path) in targets {
            let path = path.as_ref().to_path_buf();
            let file = File::create(&path)
                .await
                .map_err(|e| IoError::at_path(&path, e))?;
            sinks.push(Sink {
                key,
                path,
                writer: BufWriter::new(file),
                lines: 0,
            });
        }
        Ok(Self { sinks })
    }

    /// Append one batch to every sink in that sink's sort order
    ///
    /// Stops at the first failing sink. Lines already written to other sinks
    /// for this batch stay written.
    pub async fn write_batch(&mut self, batch: &SortedBatch) -> Result<(), IoError> {
        for sink in &mut self.sinks {
            for record in batch.ordered(sink.key) {
                let line = format!("{}\n", record);
                sink.writer
                    .write_all(line.as_bytes())
                    .await
                    .map_err(|e| IoError::at_path(&sink.path, e))?;
            }
            sink.writer
                .flush()
                .await
                .map_err(|e| IoError::at_path(&sink.path, e))?;
            sink.lines += batch.len() as u64;
        }

        debug!(records = batch.len(), "Batch written to all sinks");
        Ok(())
    }

    /// Lines written so far to the sink for `key`
    pub fn lines_written(&self, key: SortKey) -> u64 {
        self.sinks
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.lines)
            .unwrap_or_default()
    }

    /// Flush and sync every sink to disk, returning the written paths
    pub async fn finish(self) -> Result<Vec<PathBuf>, IoError> {
        let mut paths = Vec::with_capacity(self.sinks.len());
        for mut sink in self.sinks {
            sink.writer
                .flush()
                .await
                .map_err(|e| IoError::at_path(&sink.path, e))?;
            sink.writer
                .into_inner()
                .sync_all()
                .await
                .map_err(|e| IoError::at_path(&sink.path, e))?;
            paths.push(sink.path);
        }
        Ok(paths)
    }
}
