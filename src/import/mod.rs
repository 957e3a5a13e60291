//! Copying records from the production store into the local store.
//!
//! The stores sit behind [`RecordSource`] and [`RecordSink`] so the workflow
//! runs the same against MySQL and in-memory fakes.

pub mod fetcher;
pub mod orchestrator;
pub mod upserter;

pub use fetcher::Fetcher;
pub use orchestrator::{ImportScope, Importer};
pub use upserter::Upserter;

use async_trait::async_trait;

use crate::error::{Result, SinkError};
use crate::filter::RecordFilter;
use crate::models::Record;

/// Read side: the production store.
#[async_trait]
pub trait RecordSource<R: Record>: Send + Sync {
    /// Records inside the filter window, newest first, at most 100.
    async fn select(&self, filter: &RecordFilter) -> Result<Vec<R>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<R>>;
}

/// Write side: the local store.
#[async_trait]
pub trait RecordSink<R: Record>: Send + Sync {
    /// Inserts the record, or updates the row with the same id in place.
    async fn upsert(&self, record: &R) -> std::result::Result<(), SinkError>;
}
