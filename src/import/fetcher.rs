use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::RecordSource;
use crate::db::queries::MAX_ROWS;
use crate::error::{DtakoError, Result};
use crate::filter::RecordFilter;
use crate::models::Record;

/// Reads records from the production store under a deadline.
pub struct Fetcher<R: Record> {
    source: Option<Arc<dyn RecordSource<R>>>,
    timeout: Duration,
}

impl<R: Record> Clone for Fetcher<R> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            timeout: self.timeout,
        }
    }
}

impl<R: Record> Fetcher<R> {
    pub fn new(source: Option<Arc<dyn RecordSource<R>>>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    fn source(&self) -> Result<&Arc<dyn RecordSource<R>>> {
        self.source.as_ref().ok_or(DtakoError::SourceUnavailable)
    }

    /// Newest first, never more than [`MAX_ROWS`].
    pub async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<R>> {
        let source = self.source()?;
        let mut records = tokio::time::timeout(self.timeout, source.select(filter))
            .await
            .map_err(|_| DtakoError::Timeout(self.timeout))??;

        records.sort_by(|a, b| b.order_key().cmp(&a.order_key()));
        records.truncate(MAX_ROWS);
        debug!("Fetched {} {}", records.len(), R::KIND_PLURAL);
        Ok(records)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<R>> {
        let source = self.source()?;
        tokio::time::timeout(self.timeout, source.find_by_id(id))
            .await
            .map_err(|_| DtakoError::Timeout(self.timeout))?
    }
}
