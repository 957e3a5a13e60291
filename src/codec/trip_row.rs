use chrono::NaiveDateTime;
use sqlx::FromRow;

use super::{
    encode_code, non_negative_f64, DEFAULT_VEHICLE_CLASS_CODE, PLACEHOLDER_DRIVER_CODE,
    PLACEHOLDER_VEHICLE_CODE,
};
use crate::error::CodecError;
use crate::models::TripRow;

#[derive(Debug, Clone, FromRow)]
pub struct TripRowRaw {
    pub id: String,
    pub unko_no: Option<String>,
    pub date: NaiveDateTime,
    pub vehicle_no: Option<String>,
    pub driver_code: Option<String>,
    pub route_code: Option<String>,
    pub distance: Option<f64>,
    pub fuel_amount: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<TripRowRaw> for TripRow {
    fn from(raw: TripRowRaw) -> Self {
        Self {
            id: raw.id,
            trip_no: raw.unko_no.unwrap_or_default(),
            operation_date: raw.date,
            vehicle_no: raw.vehicle_no.unwrap_or_default(),
            driver_code: raw.driver_code.unwrap_or_default(),
            route_code: raw.route_code.unwrap_or_default(),
            distance: raw.distance.unwrap_or_default(),
            fuel_amount: raw.fuel_amount.unwrap_or_default(),
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

/// Column values for one `dtako_rows` upsert, in statement order.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRowParams {
    pub id: String,
    pub trip_no: String,
    pub read_date: NaiveDateTime,
    pub operation_date: NaiveDateTime,
    pub vehicle_code: i64,
    pub vehicle_class_code: &'static str,
    pub driver_code: i64,
    pub route_code: String,
    pub distance: f64,
    pub fuel_amount: f64,
}

impl TripRow {
    pub fn encode(&self) -> Result<TripRowParams, CodecError> {
        Ok(TripRowParams {
            id: self.id.clone(),
            trip_no: self.trip_no.clone(),
            // Tachograph cards are read on the day of operation.
            read_date: self.operation_date,
            operation_date: self.operation_date,
            vehicle_code: encode_code("vehicle_no", &self.vehicle_no, PLACEHOLDER_VEHICLE_CODE),
            vehicle_class_code: DEFAULT_VEHICLE_CLASS_CODE,
            driver_code: encode_code("driver_code", &self.driver_code, PLACEHOLDER_DRIVER_CODE),
            route_code: self.route_code.clone(),
            distance: non_negative_f64("distance", self.distance)?,
            fuel_amount: non_negative_f64("fuel_amount", self.fuel_amount)?,
        })
    }
}
