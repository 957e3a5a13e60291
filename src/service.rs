use chrono::Duration;

use crate::error::{DtakoError, Result};
use crate::filter::{self, RecordFilter, DEFAULT_WINDOW_DAYS};
use crate::import::{Fetcher, ImportScope, Importer, Upserter};
use crate::models::{ImportRequest, ImportSummary, ListParams};

/// Read and import operations for one record kind.
pub struct RecordService<R: ImportScope> {
    fetcher: Fetcher<R>,
    importer: Importer<R>,
    utc_offset_hours: i32,
}

impl<R: ImportScope> RecordService<R> {
    pub fn new(fetcher: Fetcher<R>, upserter: Upserter<R>, utc_offset_hours: i32) -> Self {
        Self {
            importer: Importer::new(fetcher.clone(), upserter),
            fetcher,
            utc_offset_hours,
        }
    }

    /// Lists records inside the requested window, the last 30 days by default.
    pub async fn list(&self, params: &ListParams) -> Result<Vec<R>> {
        let filter = self.list_filter(params)?;
        self.fetcher.fetch(&filter).await
    }

    pub async fn get(&self, id: &str) -> Result<R> {
        self.fetcher
            .find_by_id(id)
            .await?
            .ok_or_else(|| DtakoError::NotFound {
                kind: R::KIND,
                id: id.to_string(),
            })
    }

    pub async fn import(&self, request: &ImportRequest) -> Result<ImportSummary> {
        self.importer.import(request).await
    }

    fn list_filter(&self, params: &ListParams) -> Result<RecordFilter> {
        let today = filter::today(self.utc_offset_hours);
        let from = filter::parse_optional_date(
            "from",
            params.from.as_deref(),
            today - Duration::days(DEFAULT_WINDOW_DAYS),
        )?;
        let to = filter::parse_optional_date("to", params.to.as_deref(), today)?;

        Ok(RecordFilter::new(from, to)?
            .with_linking_key(params.unko_no.clone())
            .with_category(params.event_type.clone())
            .with_free_text(params.ferry_company.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{RecordSink, RecordSource};
    use crate::models::{DrivingEvent, FerryCrossing, TripRow};
    use crate::testing::{
        at, driving_event, ferry_crossing, trip_row, InMemorySink, InMemorySource, Searchable,
    };
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    fn service<R: ImportScope + Searchable>(source: Arc<InMemorySource<R>>) -> RecordService<R> {
        RecordService::new(
            Fetcher::new(
                Some(source as Arc<dyn RecordSource<R>>),
                StdDuration::from_secs(5),
            ),
            Upserter::new(Arc::new(InMemorySink::new()) as Arc<dyn RecordSink<R>>),
            9,
        )
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let source = Arc::new(InMemorySource::new(vec![trip_row("R1", at("2025-01-05", 8))]));
        let service = service(source);

        assert_eq!(service.get("R1").await.unwrap().id, "R1");
        let err = service.get("missing").await.unwrap_err();
        assert!(matches!(err, DtakoError::NotFound { kind: "row", .. }));
    }

    #[tokio::test]
    async fn test_list_filters_by_window_and_trip() {
        let mut other_trip = driving_event("E3", "START", at("2025-01-20", 7));
        other_trip.trip_no = "2025012001".to_string();
        let source = Arc::new(InMemorySource::new(vec![
            driving_event("E1", "START", at("2025-01-10", 7)),
            driving_event("E2", "STOP", at("2025-01-10", 18)),
            other_trip,
            driving_event("E4", "START", at("2025-03-01", 7)),
        ]));
        let service = service(source);
        let params = ListParams {
            from: Some("2025-01-01".to_string()),
            to: Some("2025-01-31".to_string()),
            unko_no: Some("2025010101".to_string()),
            ..Default::default()
        };

        let events: Vec<DrivingEvent> = service.list(&params).await.unwrap();

        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["E2", "E1"]);
    }

    #[tokio::test]
    async fn test_list_defaults_to_recent_window() {
        let today = filter::today(9);
        let recent = trip_row("recent", (today - Duration::days(2)).and_hms_opt(12, 0, 0).unwrap());
        let stale = trip_row("stale", (today - Duration::days(90)).and_hms_opt(12, 0, 0).unwrap());
        let service = service(Arc::new(InMemorySource::new(vec![recent, stale])));

        let rows: Vec<TripRow> = service.list(&ListParams::default()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "recent");
    }

    #[tokio::test]
    async fn test_list_rejects_bad_date() {
        let service = service(Arc::new(InMemorySource::<TripRow>::new(Vec::new())));
        let params = ListParams {
            from: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.list(&params).await,
            Err(DtakoError::InvalidDate { field: "from", .. })
        ));
    }

    #[tokio::test]
    async fn test_list_filters_events_by_type() {
        let source = Arc::new(InMemorySource::new(vec![
            driving_event("E1", "START", at("2025-01-10", 7)),
            driving_event("E2", "STOP", at("2025-01-10", 12)),
            driving_event("E3", "START", at("2025-01-11", 7)),
        ]));
        let service = service(source);
        let params = ListParams {
            from: Some("2025-01-01".to_string()),
            to: Some("2025-01-31".to_string()),
            event_type: Some("START".to_string()),
            ..Default::default()
        };

        let events: Vec<DrivingEvent> = service.list(&params).await.unwrap();

        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["E3", "E1"]);
    }

    #[tokio::test]
    async fn test_list_filters_ferry_rows_by_company() {
        let source = Arc::new(InMemorySource::new(vec![
            ferry_crossing(1, "東京フェリー", "2025-01-13", 8),
            ferry_crossing(2, "大阪フェリー", "2025-01-13", 9),
        ]));
        let service = service(source);
        let params = ListParams {
            from: Some("2025-01-01".to_string()),
            to: Some("2025-01-31".to_string()),
            ferry_company: Some("大阪フェリー".to_string()),
            ..Default::default()
        };

        let crossings: Vec<FerryCrossing> = service.list(&params).await.unwrap();

        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].id, 2);
    }

    #[tokio::test]
    async fn test_list_rejects_filter_without_column() {
        let source = Arc::new(InMemorySource::new(vec![trip_row("R1", at("2025-01-05", 8))]));
        let service = service(source.clone());
        let params = ListParams {
            from: Some("2025-01-01".to_string()),
            to: Some("2025-01-31".to_string()),
            event_type: Some("START".to_string()),
            ..Default::default()
        };

        let result: Result<Vec<TripRow>> = service.list(&params).await;

        assert!(matches!(result, Err(DtakoError::InvalidFilter { field: "type", .. })));
        assert_eq!(source.calls(), 0);
    }
}
