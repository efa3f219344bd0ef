//! Runtime configuration
//!
//! Built once at startup and handed to the pipeline and reader constructors.
//! Every field has a default, so an empty or missing file is valid.
//!
//! ```toml
//! [storage]
//! data_dir = "Data"
//! source_file = "products.txt"
//!
//! [pipeline]
//! batch_size = 1000
//! atomic_publish = true
//!
//! [reader]
//! default_page_size = 10
//! default_sort_key = "id"
//!
//! [log]
//! level = "info"
//! ```

pub mod logging;

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::SortKey;

pub use logging::{LogConfig, LogFormat, LogLevel};

pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Where source and sorted files live
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// Source file name, resolved against `data_dir` unless absolute
    pub source_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("Data"),
            source_file: PathBuf::from("products.txt"),
        }
    }
}

/// Materialization settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub batch_size: usize,
    /// Write to staging files and rename them into place on success
    pub atomic_publish: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            atomic_publish: true,
        }
    }
}

/// Defaults applied to page queries that omit parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    pub default_page_size: u64,
    pub default_sort_key: SortKey,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            default_sort_key: SortKey::Id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub pipeline: PipelineConfig,
    pub reader: ReaderConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Load from a TOML file and validate
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse TOML content and validate
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.batch_size must be greater than zero".to_string(),
            ));
        }
        if self.reader.default_page_size == 0 {
            return Err(ConfigError::Invalid(
                "reader.default_page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();

        assert_eq!(config.storage.data_dir, PathBuf::from("Data"));
        assert_eq!(config.storage.source_file, PathBuf::from("products.txt"));
        assert_eq!(config.pipeline.batch_size, 1000);
        assert!(config.pipeline.atomic_publish);
        assert_eq!(config.reader.default_page_size, 10);
        assert_eq!(config.reader.default_sort_key, SortKey::Id);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.pipeline.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn parses_all_sections() {
        let config = AppConfig::parse(
            r#"
[storage]
data_dir = "/srv/catalog"
source_file = "feed.txt"

[pipeline]
batch_size = 250
atomic_publish = false

[reader]
default_page_size = 25
default_sort_key = "price"

[log]
level = "warn"
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/catalog"));
        assert_eq!(config.storage.source_file, PathBuf::from("feed.txt"));
        assert_eq!(config.pipeline.batch_size, 250);
        assert!(!config.pipeline.atomic_publish);
        assert_eq!(config.reader.default_page_size, 25);
        assert_eq!(config.reader.default_sort_key, SortKey::Price);
        assert_eq!(config.log.level, LogLevel::Warn);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn rejects_zero_batch_size() {
        let result = AppConfig::parse("[pipeline]\nbatch_size = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_page_size() {
        let result = AppConfig::parse("[reader]\ndefault_page_size = 0");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_malformed_toml() {
        let result = AppConfig::parse("[pipeline\nbatch_size = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::from_file(dir.path().join("catalog.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
