use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::StorageConfig;
use crate::domain::SortKey;
use crate::io::IoError;

const STAGING_SUFFIX: &str = ".tmp";

/// File locations under the data directory
///
/// Sorted views are written to staging paths first and renamed over the
/// published names only once a run has completed, so readers opening a
/// published file see either the previous complete view or the new one.
#[derive(Debug, Clone)]
pub struct DataLayout {
    data_dir: PathBuf,
    source_file: PathBuf,
}

impl DataLayout {
    pub fn new(data_dir: impl Into<PathBuf>, source_file: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            source_file: source_file.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.data_dir, &config.source_file)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Source path; an absolute `source_file` is used as is
    pub fn source_path(&self) -> PathBuf {
        self.data_dir.join(&self.source_file)
    }

    /// Published path of the view sorted by `key`
    pub fn sorted_path(&self, key: SortKey) -> PathBuf {
        self.data_dir.join(key.file_name())
    }

    /// Staging path the view sorted by `key` is written to before publishing
    pub fn staging_path(&self, key: SortKey) -> PathBuf {
        self.data_dir
            .join(format!("{}{}", key.file_name(), STAGING_SUFFIX))
    }

    pub async fn ensure_data_dir(&self) -> Result<(), IoError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|e| IoError::at_path(&self.data_dir, e))
    }

    /// Rename every staging file over its published path
    ///
    /// Each rename is atomic on its own, but the three are not atomic as a
    /// group: if a later rename fails, views renamed before it are already
    /// new while the rest are still old. Every view is always a complete file.
    pub async fn publish(&self) -> Result<(), IoError> {
        for key in SortKey::ALL {
            let staging = self.staging_path(key);
            let target = self.sorted_path(key);
            tokio::fs::rename(&staging, &target)
                .await
                .map_err(|e| IoError::at_path(&staging, e))?;
            debug!(path = %target.display(), "Published sorted view");
        }
        Ok(())
    }

    /// Best-effort removal of leftover staging files
    pub async fn discard_staging(&self) {
        for key in SortKey::ALL {
            let staging = self.staging_path(key);
            match tokio::fs::remove_file(&staging).await {
                Ok(()) => debug!(path = %staging.display(), "Removed staging file"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %staging.display(), error = %e, "Failed to remove staging file"),
            }
        }
    }
}
