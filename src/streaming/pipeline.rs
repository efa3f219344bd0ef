use std::io;
use std::path::PathBuf;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::error::{ErrorPolicy, PipelineError, SkipErrors};
use crate::config::PipelineConfig;
use crate::domain::{Record, RecordError, SortKey};
use crate::engine::sort_batch;
use crate::io::{IoError, MultiSinkWriter, RecordStream};
use crate::storage::DataLayout;

/// Cap on the up-front allocation for a batch; larger batches grow as needed
const MAX_PREALLOCATED_RECORDS: usize = 64 * 1024;

/// Lifecycle of one materialization run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Reading,
    Sorting,
    Writing,
    Flushing,
    Done,
    Failed,
    Cancelled,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Cancelled)
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializationReport {
    /// Valid records written to each view
    pub records_written: u64,
    /// Non-blank source lines that failed validation
    pub lines_rejected: u64,
    pub batches_written: u64,
    /// Paths of the views, in [`SortKey::ALL`] order
    pub outputs: Vec<PathBuf>,
}

/// Reads the source file once and materializes the three sorted views
///
/// Records are accumulated into batches of `batch_size`; each full batch is
/// sorted three ways and appended to the views before the next one starts.
/// Views are concatenations of per-batch sorted runs: they are globally
/// sorted only when the whole source fits in one batch or the source is
/// already ordered at batch granularity.
///
/// Cancellation is checked before the first batch and after every batch
/// write, never in the middle of one.
pub struct MaterializationPipeline<P = SkipErrors> {
    layout: DataLayout,
    config: PipelineConfig,
    policy: P,
    state: watch::Sender<PipelineState>,
}

impl MaterializationPipeline<SkipErrors> {
    /// Create a pipeline that logs rejected lines as warnings
    pub fn new(layout: DataLayout, config: PipelineConfig) -> Self {
        Self::with_policy(layout, config, SkipErrors)
    }
}

impl<P: ErrorPolicy> MaterializationPipeline<P> {
    pub fn with_policy(layout: DataLayout, config: PipelineConfig, policy: P) -> Self {
        let (state, _) = watch::channel(PipelineState::Idle);
        Self {
            layout,
            config,
            policy,
            state,
        }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    pub fn state(&self) -> PipelineState {
        *self.state.borrow()
    }

    /// Watch state transitions from another task
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state.subscribe()
    }

    /// Run materialization on a background task
    pub fn spawn(
        self,
        cancel: CancellationToken,
    ) -> JoinHandle<Result<MaterializationReport, PipelineError>>
    where
        P: 'static,
    {
        tokio::spawn(async move {
            info!("Materialization task starting");
            let result = self.run(&cancel).await;
            info!("Materialization task stopping");
            result
        })
    }

    /// Run one materialization end to end
    ///
    /// On failure or cancellation, staging files are removed and the
    /// previously published views are left untouched. Without atomic
    /// publishing, whatever was written in place before the failure stays.
    pub async fn run(
        &self,
        cancel: &CancellationToken,
    ) -> Result<MaterializationReport, PipelineError> {
        info!(
            source = %self.layout.source_path().display(),
            batch_size = self.config.batch_size,
            atomic_publish = self.config.atomic_publish,
            "Materialization starting"
        );

        let result = self.materialize(cancel).await;

        match &result {
            Ok(report) => {
                self.set_state(PipelineState::Done);
                info!(
                    records = report.records_written,
                    rejected = report.lines_rejected,
                    batches = report.batches_written,
                    "Successfully generated sorted product files"
                );
            }
            Err(e) => {
                if self.config.atomic_publish {
                    self.layout.discard_staging().await;
                }
                if e.is_cancelled() {
                    self.set_state(PipelineState::Cancelled);
                    warn!(error = %e, "Materialization cancelled");
                } else {
                    self.set_state(PipelineState::Failed);
                    error!(error = %e, "Materialization failed");
                }
            }
        }

        result
    }

    async fn materialize(
        &self,
        cancel: &CancellationToken,
    ) -> Result<MaterializationReport, PipelineError> {
        let mut report = MaterializationReport::default();
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled { records_written: 0 });
        }

        let source = self.layout.source_path();
        let mut stream = match RecordStream::from_file(&source).await {
            Ok(stream) => stream,
            Err(IoError::Path { source: e, .. }) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PipelineError::SourceNotFound(source));
            }
            Err(e) => return Err(PipelineError::Source(e)),
        };
        self.set_state(PipelineState::Reading);

        self.layout
            .ensure_data_dir()
            .await
            .map_err(PipelineError::Sink)?;
        let targets = SortKey::ALL.map(|key| {
            let path = if self.config.atomic_publish {
                self.layout.staging_path(key)
            } else {
                self.layout.sorted_path(key)
            };
            (key, path)
        });
        let mut writer = MultiSinkWriter::create(targets)
            .await
            .map_err(PipelineError::Sink)?;

        let batch_size = self.config.batch_size.max(1);
        let mut batch = Vec::with_capacity(batch_size.min(MAX_PREALLOCATED_RECORDS));

        while let Some(result) = stream.next().await {
            match result {
                Ok(record) => {
                    batch.push(record);
                    if batch.len() >= batch_size {
                        batch = self.write_batch(batch, &mut writer, &mut report).await?;
                        if cancel.is_cancelled() {
                            return Err(PipelineError::Cancelled {
                                records_written: report.records_written,
                            });
                        }
                    }
                }
                Err(e) if e.is_recoverable() => {
                    if !matches!(
                        e,
                        IoError::Rejected {
                            reason: RecordError::Blank,
                            ..
                        }
                    ) {
                        report.lines_rejected += 1;
                    }
                    self.policy.handle_rejected(&e);
                }
                Err(e) => return Err(PipelineError::Source(e)),
            }
        }

        if !batch.is_empty() {
            self.write_batch(batch, &mut writer, &mut report).await?;
        }

        self.set_state(PipelineState::Flushing);
        writer.finish().await.map_err(PipelineError::Sink)?;
        if self.config.atomic_publish {
            self.layout.publish().await.map_err(PipelineError::Sink)?;
        }
        report.outputs = SortKey::ALL
            .iter()
            .map(|key| self.layout.sorted_path(*key))
            .collect();

        Ok(report)
    }

    /// Sort and write one batch, returning the emptied buffer for reuse
    async fn write_batch(
        &self,
        batch: Vec<Record>,
        writer: &mut MultiSinkWriter,
        report: &mut MaterializationReport,
    ) -> Result<Vec<Record>, PipelineError> {
        self.set_state(PipelineState::Sorting);
        let sorted = tokio::task::spawn_blocking(move || sort_batch(batch))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))?;

        self.set_state(PipelineState::Writing);
        writer
            .write_batch(&sorted)
            .await
            .map_err(PipelineError::Sink)?;

        report.records_written += sorted.len() as u64;
        report.batches_written += 1;
        debug!(
            batch = report.batches_written,
            records = sorted.len(),
            total = report.records_written,
            "Batch materialized"
        );

        self.set_state(PipelineState::Reading);
        let mut records = sorted.into_records();
        records.clear();
        Ok(records)
    }

    fn set_state(&self, next: PipelineState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!(from = ?previous, to = ?next, "Pipeline state change");
        }
    }
}
