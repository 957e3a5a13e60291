use std::sync::Arc;

use super::RecordSink;
use crate::error::RecordError;
use crate::models::Record;

/// Writes one record at a time into the local store.
pub struct Upserter<R: Record> {
    sink: Arc<dyn RecordSink<R>>,
}

impl<R: Record> Clone for Upserter<R> {
    fn clone(&self) -> Self {
        Self {
            sink: self.sink.clone(),
        }
    }
}

impl<R: Record> Upserter<R> {
    pub fn new(sink: Arc<dyn RecordSink<R>>) -> Self {
        Self { sink }
    }

    pub async fn upsert(&self, record: &R) -> Result<(), RecordError> {
        self.sink.upsert(record).await.map_err(|err| RecordError {
            kind: R::KIND,
            id: record.record_id(),
            message: err.to_string(),
        })
    }
}
