use std::time::Duration;

use thiserror::Error;

use crate::db::StoreRole;

#[derive(Error, Debug)]
pub enum DtakoError {
    #[error("failed to connect to {role} database: {source}")]
    Connection {
        role: StoreRole,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("from_date {from} cannot be after to_date {to}")]
    InvalidRange { from: String, to: String },

    #[error("invalid {field}: {value}")]
    InvalidFilter { field: &'static str, value: String },

    #[error("production database not available")]
    SourceUnavailable,

    #[error("query against production database timed out after {0:?}")]
    Timeout(Duration),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, DtakoError>;

/// Failure to write one record during the import write phase.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to import {kind} {id}: {message}")]
pub struct RecordError {
    pub kind: &'static str,
    pub id: String,
    pub message: String,
}

/// A record that cannot be encoded for the destination store.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: String },

    #[error("end_time {end} is before start_time {start}")]
    EndBeforeStart { start: String, end: String },
}

/// Why a single upsert failed.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Store(#[from] DtakoError),
}

impl From<sqlx::Error> for SinkError {
    fn from(err: sqlx::Error) -> Self {
        Self::Store(DtakoError::Database(err))
    }
}
