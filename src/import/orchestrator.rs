use std::fmt;

use chrono::Utc;
use tracing::{error, info, warn};

use super::{Fetcher, Upserter};
use crate::error::{DtakoError, Result};
use crate::filter::{self, RecordFilter};
use crate::models::{DrivingEvent, FerryCrossing, ImportRequest, ImportSummary, Record, TripRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    Validating,
    Fetching,
    Writing,
    Completed,
    Rejected,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::Writing => "writing",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// How an import request narrows the window for one record kind.
pub trait ImportScope: Record {
    /// Adds the kind's optional filter, validating it first.
    fn scope(filter: RecordFilter, request: &ImportRequest) -> Result<RecordFilter>;

    /// Summary message suffix describing the applied filter.
    fn describe(filter: &RecordFilter) -> String;
}

impl ImportScope for TripRow {
    fn scope(filter: RecordFilter, _request: &ImportRequest) -> Result<RecordFilter> {
        Ok(filter)
    }

    fn describe(_filter: &RecordFilter) -> String {
        String::new()
    }
}

impl ImportScope for DrivingEvent {
    fn scope(filter: RecordFilter, request: &ImportRequest) -> Result<RecordFilter> {
        filter::validate_import_category(request.event_type.as_deref())?;
        Ok(filter.with_category(request.event_type.clone()))
    }

    fn describe(filter: &RecordFilter) -> String {
        match &filter.category {
            Some(category) => format!(" (type: {})", category),
            None => String::new(),
        }
    }
}

impl ImportScope for FerryCrossing {
    fn scope(filter: RecordFilter, request: &ImportRequest) -> Result<RecordFilter> {
        Ok(filter.with_free_text(request.ferry_company.clone()))
    }

    fn describe(filter: &RecordFilter) -> String {
        match &filter.free_text {
            Some(company) => format!(" (ferry company: {})", company),
            None => String::new(),
        }
    }
}

/// Copies one record kind from production into the local store.
///
/// Validation runs before any store is touched. A fetch failure rejects the
/// whole import. Write failures are collected per record and never stop the
/// remaining writes.
pub struct Importer<R: Record> {
    fetcher: Fetcher<R>,
    upserter: Upserter<R>,
}

impl<R: ImportScope> Importer<R> {
    pub fn new(fetcher: Fetcher<R>, upserter: Upserter<R>) -> Self {
        Self { fetcher, upserter }
    }

    pub async fn import(&self, request: &ImportRequest) -> Result<ImportSummary> {
        enter::<R>(ImportPhase::Validating);
        let filter = Self::validate(request).map_err(reject::<R>)?;

        enter::<R>(ImportPhase::Fetching);
        let records = self.fetcher.fetch(&filter).await.map_err(reject::<R>)?;

        enter::<R>(ImportPhase::Writing);
        let mut imported = 0;
        let mut errors = Vec::new();
        for record in &records {
            match self.upserter.upsert(record).await {
                Ok(()) => imported += 1,
                Err(err) => {
                    warn!("{}", err);
                    errors.push(err.to_string());
                }
            }
        }

        enter::<R>(ImportPhase::Completed);
        let message = format!(
            "Imported {} {} from {} to {}{}",
            imported,
            R::KIND_PLURAL,
            filter.from().format(filter::DATE_FORMAT),
            filter.to().format(filter::DATE_FORMAT),
            R::describe(&filter)
        );
        info!("{} ({} fetched, {} failed)", message, records.len(), errors.len());

        Ok(ImportSummary {
            success: imported > 0,
            imported_count: imported,
            message,
            imported_at: Utc::now(),
            errors,
        })
    }

    fn validate(request: &ImportRequest) -> Result<RecordFilter> {
        let from = filter::parse_date("from_date", &request.from_date)?;
        let to = filter::parse_date("to_date", &request.to_date)?;
        R::scope(RecordFilter::new(from, to)?, request)
    }
}

fn enter<R: Record>(phase: ImportPhase) {
    info!("Import of {}: {}", R::KIND_PLURAL, phase);
}

fn reject<R: Record>(err: DtakoError) -> DtakoError {
    error!("Import of {} {}: {}", R::KIND_PLURAL, ImportPhase::Rejected, err);
    err
}
