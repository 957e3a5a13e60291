use chrono::NaiveDateTime;
use sqlx::FromRow;

use super::{
    decode_coordinate, encode_code, encode_coordinate, DEFAULT_VEHICLE_CLASS_CODE,
    PLACEHOLDER_DRIVER_CODE, PLACEHOLDER_VEHICLE_CODE,
};
use crate::error::CodecError;
use crate::models::DrivingEvent;

#[derive(Debug, Clone, FromRow)]
pub struct DrivingEventRaw {
    pub id: String,
    pub unko_no: Option<String>,
    pub event_date: NaiveDateTime,
    pub event_type: Option<String>,
    pub vehicle_no: Option<String>,
    pub driver_code: Option<String>,
    pub description: Option<String>,
    pub start_city_name: Option<String>,
    pub end_city_name: Option<String>,
    pub start_place_name: Option<String>,
    pub end_place_name: Option<String>,
    /// Degrees × 1,000,000.
    pub latitude: Option<i64>,
    /// Degrees × 1,000,000.
    pub longitude: Option<i64>,
}

impl From<DrivingEventRaw> for DrivingEvent {
    fn from(raw: DrivingEventRaw) -> Self {
        Self {
            id: raw.id,
            trip_no: raw.unko_no.unwrap_or_default(),
            event_date: raw.event_date,
            event_type: raw.event_type.unwrap_or_default(),
            vehicle_no: raw.vehicle_no.unwrap_or_default(),
            driver_code: raw.driver_code.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            start_city_name: raw.start_city_name.unwrap_or_default(),
            end_city_name: raw.end_city_name.unwrap_or_default(),
            start_place_name: raw.start_place_name.unwrap_or_default(),
            end_place_name: raw.end_place_name.unwrap_or_default(),
            latitude: decode_coordinate(raw.latitude),
            longitude: decode_coordinate(raw.longitude),
            // Neither production layout carries audit columns for events.
            created_at: None,
            updated_at: None,
        }
    }
}

/// Column values for one `dtako_events` upsert, in statement order.
#[derive(Debug, Clone, PartialEq)]
pub struct DrivingEventParams {
    pub id: String,
    pub trip_no: String,
    pub read_date: NaiveDateTime,
    pub vehicle_code: i64,
    pub vehicle_class_code: &'static str,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub event_type: String,
    pub driver_code: i64,
    pub driver_class: i64,
    pub driver_code_1: i64,
    pub start_odometer: f64,
    pub end_odometer: f64,
    pub section_time: i64,
    pub section_distance: f64,
    pub start_city_name: String,
    pub end_city_name: String,
    pub start_place_name: String,
    pub end_place_name: String,
    pub latitude: Option<i64>,
    pub longitude: Option<i64>,
    pub description: Option<String>,
}

impl DrivingEvent {
    pub fn encode(&self) -> Result<DrivingEventParams, CodecError> {
        Ok(DrivingEventParams {
            id: self.id.clone(),
            trip_no: self.trip_no.clone(),
            read_date: self.event_date,
            vehicle_code: encode_code("vehicle_no", &self.vehicle_no, PLACEHOLDER_VEHICLE_CODE),
            vehicle_class_code: DEFAULT_VEHICLE_CLASS_CODE,
            // Events are instants; the section closes where it opens.
            start_time: self.event_date,
            end_time: self.event_date,
            event_type: self.event_type.clone(),
            driver_code: encode_code("driver_code", &self.driver_code, PLACEHOLDER_DRIVER_CODE),
            driver_class: 0,
            driver_code_1: 0,
            start_odometer: 0.0,
            end_odometer: 0.0,
            section_time: 0,
            section_distance: 0.0,
            start_city_name: self.start_city_name.clone(),
            end_city_name: self.end_city_name.clone(),
            start_place_name: self.start_place_name.clone(),
            end_place_name: self.end_place_name.clone(),
            latitude: encode_coordinate(self.latitude),
            longitude: encode_coordinate(self.longitude),
            description: Some(self.description.clone()).filter(|d| !d.is_empty()),
        })
    }
}
