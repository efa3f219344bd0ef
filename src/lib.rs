//! Product catalog materialization
//!
//! Reads a comma-separated product source once, writes three sorted views of
//! it (by id, name and price) and serves fixed-size pages from those views
//! without loading them into memory.
//!
//! ```no_run
//! use catalog::prelude::*;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), AppError> {
//! let config = AppConfig::default();
//! let layout = DataLayout::from_config(&config.storage);
//!
//! MaterializationPipeline::new(layout.clone(), config.pipeline.clone())
//!     .run(&CancellationToken::new())
//!     .await?;
//!
//! let page = PageReader::new(layout, config.reader.clone())
//!     .get_page(SortKey::Price, 1, 10)
//!     .await?;
//! println!("{} records on page 1", page.items.len());
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod domain;
pub mod engine;
pub mod io;
pub mod prelude;
pub mod storage;
pub mod streaming;
