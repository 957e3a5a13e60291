//! In-memory stores for exercising the import workflow without MySQL.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::db::queries;
use crate::db::repository::SqlRecord;
use crate::db::schema::SchemaMapping;
use crate::error::{DtakoError, Result, SinkError};
use crate::filter::RecordFilter;
use crate::import::{RecordSink, RecordSource};
use crate::models::{DrivingEvent, FerryCrossing, Record, TripRow};

/// The columns the SQL select filters on, read off a wire record.
pub trait Searchable: SqlRecord {
    /// Value of the layout's `timestamp_column`.
    fn window_time(&self) -> NaiveDateTime;

    /// Value of the layout's `linking_key_column`.
    fn linking_key(&self) -> &str;

    /// Value of the layout's `category_column`, if it has one.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Value of the layout's `free_text_column`, if it has one.
    fn free_text(&self) -> Option<&str> {
        None
    }

    fn matches(&self, filter: &RecordFilter) -> bool {
        let time = self.window_time();
        let wanted = |want: &Option<String>, have: Option<&str>| match want {
            Some(w) => have == Some(w.as_str()),
            None => true,
        };
        time >= filter.lower_bound()
            && time < filter.upper_bound()
            && wanted(&filter.linking_key, Some(self.linking_key()))
            && wanted(&filter.category, self.category())
            && wanted(&filter.free_text, self.free_text())
    }
}

impl Searchable for TripRow {
    fn window_time(&self) -> NaiveDateTime {
        self.operation_date
    }

    fn linking_key(&self) -> &str {
        &self.trip_no
    }
}

impl Searchable for DrivingEvent {
    fn window_time(&self) -> NaiveDateTime {
        self.event_date
    }

    fn linking_key(&self) -> &str {
        &self.trip_no
    }

    fn category(&self) -> Option<&str> {
        Some(self.event_type.as_str())
    }
}

impl Searchable for FerryCrossing {
    fn window_time(&self) -> NaiveDateTime {
        self.unko_date.and_time(NaiveTime::MIN)
    }

    fn linking_key(&self) -> &str {
        &self.trip_no
    }

    fn free_text(&self) -> Option<&str> {
        Some(self.ferry_company_name.as_str())
    }
}

/// Holds fixed records and filters them the way the SQL store does,
/// including rejecting filters the table has no column for.
pub struct InMemorySource<R> {
    records: Vec<R>,
    calls: AtomicUsize,
    failure: Option<fn() -> DtakoError>,
    delay: Option<Duration>,
}

impl<R: Record> InMemorySource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
            failure: None,
            delay: None,
        }
    }

    /// Every call fails with the error `make` builds.
    pub fn failing(make: fn() -> DtakoError) -> Self {
        Self {
            failure: Some(make),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<R: Searchable> RecordSource<R> for InMemorySource<R> {
    async fn select(&self, filter: &RecordFilter) -> Result<Vec<R>> {
        queries::check_supported(R::layout(SchemaMapping::Production), filter)?;
        self.enter().await?;
        Ok(self
            .records
            .iter()
            .filter(|r| r.matches(filter))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<R>> {
        self.enter().await?;
        Ok(self.records.iter().find(|r| r.record_id() == id).cloned())
    }
}

/// Keyed by id, so a second write of the same id replaces the first.
pub struct InMemorySink<R> {
    rows: Mutex<BTreeMap<String, R>>,
    rejected: HashSet<String>,
    calls: AtomicUsize,
}

impl<R: Record> InMemorySink<R> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            rejected: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Writes of these ids fail with a database error.
    pub fn rejecting(ids: &[&str]) -> Self {
        Self {
            rejected: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<R: Record> RecordSink<R> for InMemorySink<R> {
    async fn upsert(&self, record: &R) -> std::result::Result<(), SinkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let id = record.record_id();
        if self.rejected.contains(&id) {
            return Err(DtakoError::Database(sqlx::Error::Protocol(format!(
                "duplicate entry rejected for {}",
                id
            )))
            .into());
        }
        self.rows.lock().unwrap().insert(id, record.clone());
        Ok(())
    }
}

pub fn at(date: &str, hour: u32) -> NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

pub fn trip_row(id: &str, date: NaiveDateTime) -> TripRow {
    TripRow {
        id: id.to_string(),
        trip_no: format!("U{}", id),
        operation_date: date,
        vehicle_no: "101".to_string(),
        driver_code: "1001".to_string(),
        route_code: "東京".to_string(),
        distance: 120.5,
        fuel_amount: 30.0,
        created_at: None,
        updated_at: None,
    }
}

pub fn driving_event(id: &str, event_type: &str, date: NaiveDateTime) -> DrivingEvent {
    DrivingEvent {
        id: id.to_string(),
        trip_no: "2025010101".to_string(),
        event_date: date,
        event_type: event_type.to_string(),
        vehicle_no: "101".to_string(),
        driver_code: "1001".to_string(),
        description: String::new(),
        start_city_name: "東京都".to_string(),
        end_city_name: "東京都".to_string(),
        start_place_name: String::new(),
        end_place_name: String::new(),
        latitude: Some(35.6762),
        longitude: Some(139.6503),
        created_at: None,
        updated_at: None,
    }
}

pub fn ferry_crossing(id: i64, company: &str, unko_date: &str, hour: u32) -> FerryCrossing {
    let day = NaiveDate::parse_from_str(unko_date, "%Y-%m-%d").unwrap();
    FerryCrossing {
        unko_date: day,
        read_date: day,
        ferry_company_name: company.to_string(),
        start_time: at(unko_date, hour),
        end_time: at(unko_date, hour + 1),
        ..crate::codec::ferry_crossing::tests::sample(id)
    }
}
