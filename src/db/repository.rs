use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{FromRow, MySql};
use tracing::debug;

use super::queries::{self, MAX_ROWS};
use super::schema::{SchemaMapping, TableLayout};
use super::ConnectionProvider;
use crate::codec::{DrivingEventRaw, FerryCrossingRaw, TripRowRaw};
use crate::error::{CodecError, Result, SinkError};
use crate::filter::RecordFilter;
use crate::import::{RecordSink, RecordSource};
use crate::models::{DrivingEvent, FerryCrossing, Record, TripRow};

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// A record kind that can be read from and written to MySQL.
pub trait SqlRecord: Record {
    type Raw: for<'r> FromRow<'r, MySqlRow> + Into<Self> + Send + Unpin;

    const UPSERT: &'static str;

    fn layout(mapping: SchemaMapping) -> &'static TableLayout;

    /// Encodes the record and binds every upsert placeholder in order.
    fn bind_upsert<'q>(&self, query: MySqlQuery<'q>) -> std::result::Result<MySqlQuery<'q>, CodecError>;
}

impl SqlRecord for TripRow {
    type Raw = TripRowRaw;

    const UPSERT: &'static str = queries::UPSERT_TRIP_ROW;

    fn layout(mapping: SchemaMapping) -> &'static TableLayout {
        mapping.trip_rows()
    }

    fn bind_upsert<'q>(&self, query: MySqlQuery<'q>) -> std::result::Result<MySqlQuery<'q>, CodecError> {
        let p = self.encode()?;
        Ok(query
            .bind(p.id)
            .bind(p.trip_no)
            .bind(p.read_date)
            .bind(p.operation_date)
            .bind(p.vehicle_code)
            .bind(p.vehicle_class_code)
            .bind(p.driver_code)
            .bind(p.route_code)
            .bind(p.distance)
            .bind(p.fuel_amount))
    }
}

impl SqlRecord for DrivingEvent {
    type Raw = DrivingEventRaw;

    const UPSERT: &'static str = queries::UPSERT_DRIVING_EVENT;

    fn layout(mapping: SchemaMapping) -> &'static TableLayout {
        mapping.driving_events()
    }

    fn bind_upsert<'q>(&self, query: MySqlQuery<'q>) -> std::result::Result<MySqlQuery<'q>, CodecError> {
        let p = self.encode()?;
        Ok(query
            .bind(p.id)
            .bind(p.trip_no)
            .bind(p.read_date)
            .bind(p.vehicle_code)
            .bind(p.vehicle_class_code)
            .bind(p.start_time)
            .bind(p.end_time)
            .bind(p.event_type)
            .bind(p.driver_code)
            .bind(p.driver_class)
            .bind(p.driver_code_1)
            .bind(p.start_odometer)
            .bind(p.end_odometer)
            .bind(p.section_time)
            .bind(p.section_distance)
            .bind(p.start_city_name)
            .bind(p.end_city_name)
            .bind(p.start_place_name)
            .bind(p.end_place_name)
            .bind(p.latitude)
            .bind(p.longitude)
            .bind(p.description))
    }
}

impl SqlRecord for FerryCrossing {
    type Raw = FerryCrossingRaw;

    const UPSERT: &'static str = queries::UPSERT_FERRY_CROSSING;

    fn layout(mapping: SchemaMapping) -> &'static TableLayout {
        mapping.ferry_crossings()
    }

    fn bind_upsert<'q>(&self, query: MySqlQuery<'q>) -> std::result::Result<MySqlQuery<'q>, CodecError> {
        let r = self.encode()?.record;
        Ok(query
            .bind(r.id)
            .bind(r.trip_no.clone())
            .bind(r.unko_date)
            .bind(r.read_date)
            .bind(r.office_code)
            .bind(r.office_name.clone())
            .bind(r.vehicle_code)
            .bind(r.vehicle_name.clone())
            .bind(r.driver_code_1)
            .bind(r.driver_name_1.clone())
            .bind(r.target_driver_class)
            .bind(r.start_time)
            .bind(r.end_time)
            .bind(r.ferry_company_code)
            .bind(r.ferry_company_name.clone())
            .bind(r.boarding_code)
            .bind(r.boarding_name.clone())
            .bind(r.ship_number.clone())
            .bind(r.landing_code)
            .bind(r.landing_name.clone())
            .bind(r.settlement_class)
            .bind(r.settlement_name.clone())
            .bind(r.standard_fare)
            .bind(r.contract_fare)
            .bind(r.ship_vehicle_class)
            .bind(r.ship_vehicle_name.clone())
            .bind(r.estimated_distance)
            .bind(r.ferry_search.clone()))
    }
}

/// Reads one record kind from the production database.
pub struct MySqlSource<R> {
    provider: Arc<ConnectionProvider>,
    mapping: SchemaMapping,
    _record: PhantomData<fn() -> R>,
}

impl<R> MySqlSource<R> {
    pub fn new(provider: Arc<ConnectionProvider>, mapping: SchemaMapping) -> Self {
        Self {
            provider,
            mapping,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: SqlRecord> RecordSource<R> for MySqlSource<R> {
    async fn select(&self, filter: &RecordFilter) -> Result<Vec<R>> {
        let mut query = queries::build_select(R::layout(self.mapping), filter)?;
        let pool = self.provider.source().await?;
        debug!("Selecting {} from {} layout: {}", R::KIND_PLURAL, self.mapping, query.sql());

        let rows: Vec<R::Raw> = query
            .build_query_as::<R::Raw>()
            .fetch(pool)
            .take(MAX_ROWS)
            .try_collect()
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<R>> {
        let sql = queries::build_find_by_id(R::layout(self.mapping));
        let pool = self.provider.source().await?;

        let row = sqlx::query_as::<_, R::Raw>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Into::into))
    }
}

/// Writes one record kind into the local database.
pub struct MySqlSink<R> {
    provider: Arc<ConnectionProvider>,
    _record: PhantomData<fn() -> R>,
}

impl<R> MySqlSink<R> {
    pub fn new(provider: Arc<ConnectionProvider>) -> Self {
        Self {
            provider,
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R: SqlRecord> RecordSink<R> for MySqlSink<R> {
    async fn upsert(&self, record: &R) -> std::result::Result<(), SinkError> {
        let query = record.bind_upsert(sqlx::query(R::UPSERT))?;
        let pool = self.provider.destination().await?;
        query.execute(pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ferry_crossing::tests::sample;
    use crate::db::{DbConfig, PoolSettings};
    use crate::error::DtakoError;
    use std::time::Duration;

    fn unreachable_provider() -> Arc<ConnectionProvider> {
        let config = DbConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "root".to_string(),
            password: String::new(),
            database: "dtako_local".to_string(),
            charset: "utf8mb4".to_string(),
        };
        let settings = PoolSettings {
            max_connections: 1,
            acquire_timeout: Duration::from_millis(300),
        };
        Arc::new(ConnectionProvider::new(None, config, settings))
    }

    #[tokio::test]
    async fn test_invalid_record_fails_before_connecting() {
        let sink = MySqlSink::<FerryCrossing>::new(unreachable_provider());
        let mut crossing = sample(7);
        crossing.contract_fare = -1;
        let err = sink.upsert(&crossing).await.unwrap_err();
        assert!(matches!(err, SinkError::Codec(CodecError::Negative { .. })));
    }

    #[tokio::test]
    async fn test_missing_source_is_reported() {
        let source = MySqlSource::<TripRow>::new(unreachable_provider(), SchemaMapping::Production);
        let err = source.find_by_id("row-1").await.unwrap_err();
        assert!(matches!(err, DtakoError::SourceUnavailable));
    }

    #[test]
    fn test_layouts_follow_mapping() {
        assert_eq!(TripRow::layout(SchemaMapping::Test).timestamp_column, "date");
        assert_eq!(DrivingEvent::layout(SchemaMapping::Production).table, "dtako_events");
        assert_eq!(FerryCrossing::layout(SchemaMapping::Test).table, "dtako_ferry_rows");
    }
}
