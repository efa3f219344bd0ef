use std::io;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::fs::File;
use tracing::{debug, error, trace};

use super::error::PageError;
use super::layout::DataLayout;
use crate::config::ReaderConfig;
use crate::domain::{Record, SortKey};
use crate::io::{IoError, RecordStream};

/// Cap on the up-front allocation for a page; larger pages grow as needed
const MAX_PREALLOCATED_ITEMS: usize = 1024;

/// One page of a sorted view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub sort_key: SortKey,
    pub page_number: u64,
    pub page_size: u64,
    pub items: Vec<Record>,
}

/// Page request as it arrives from a transport layer
///
/// Missing fields fall back to page 1 and the configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageQuery {
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
}

/// Serves pages from the sorted views without loading whole files
///
/// Cheap to clone; each call opens its own read handle, so any number of
/// calls may run concurrently.
#[derive(Debug, Clone)]
pub struct PageReader {
    layout: DataLayout,
    defaults: ReaderConfig,
}

impl PageReader {
    pub fn new(layout: DataLayout, defaults: ReaderConfig) -> Self {
        Self { layout, defaults }
    }

    /// Resolve a transport query against the defaults and fetch the page
    pub async fn query(&self, query: &PageQuery) -> Result<Page, PageError> {
        let sort_key = query
            .sort_by
            .as_deref()
            .map(SortKey::from_query)
            .unwrap_or(self.defaults.default_sort_key);
        let page_number = query.page_number.unwrap_or(1);
        let page_size = query.page_size.unwrap_or_else(|| {
            i64::try_from(self.defaults.default_page_size).unwrap_or(i64::MAX)
        });

        self.get_page(sort_key, page_number, page_size).await
    }

    /// Fetch page `page_number` (1-based) of `page_size` records
    ///
    /// Skips `(page_number - 1) * page_size` valid lines, collects up to
    /// `page_size` more and stops reading. Lines that fail validation count
    /// toward neither. A page past the end of the file is empty, not an error.
    pub async fn get_page(
        &self,
        sort_key: SortKey,
        page_number: i64,
        page_size: i64,
    ) -> Result<Page, PageError> {
        if page_number < 1 {
            return Err(PageError::InvalidPageNumber(page_number));
        }
        if page_size < 1 {
            return Err(PageError::InvalidPageSize(page_size));
        }
        let page_number = page_number as u64;
        let page_size = page_size as u64;

        let path = self.layout.sorted_path(sort_key);
        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                error!(path = %path.display(), "Sorted file not found");
                return Err(PageError::NotFound(path));
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to open sorted file");
                return Err(PageError::Internal(IoError::at_path(path, e)));
            }
        };

        let to_skip = (page_number - 1).saturating_mul(page_size);
        let capacity = usize::try_from(page_size)
            .unwrap_or(usize::MAX)
            .min(MAX_PREALLOCATED_ITEMS);
        let mut items = Vec::with_capacity(capacity);
        let mut skipped = 0u64;

        let mut stream = RecordStream::new(file);
        while let Some(result) = stream.next().await {
            match result {
                Ok(record) if skipped < to_skip => {
                    skipped += 1;
                    trace!(id = record.id, "Skipping record before page");
                }
                Ok(record) => {
                    items.push(record);
                    if items.len() as u64 == page_size {
                        break;
                    }
                }
                Err(e) if e.is_recoverable() => {
                    debug!(path = %path.display(), error = %e, "Skipping invalid line");
                }
                Err(e) => {
                    error!(path = %path.display(), error = %e, "Error reading sorted file");
                    return Err(PageError::Internal(e));
                }
            }
        }

        Ok(Page {
            sort_key,
            page_number,
            page_size,
            items,
        })
    }
}
