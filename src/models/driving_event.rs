use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Record;

/// Something that happened during a trip (`dtako_events`).
///
/// `trip_no` refers back to [`super::TripRow::trip_no`] for lookups only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrivingEvent {
    pub id: String,
    #[serde(rename = "unko_no", default, skip_serializing_if = "String::is_empty")]
    pub trip_no: String,
    pub event_date: NaiveDateTime,
    pub event_type: String,
    pub vehicle_no: String,
    pub driver_code: String,
    pub description: String,
    #[serde(default)]
    pub start_city_name: String,
    #[serde(default)]
    pub end_city_name: String,
    #[serde(default)]
    pub start_place_name: String,
    #[serde(default)]
    pub end_place_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Record for DrivingEvent {
    const KIND: &'static str = "event";
    const KIND_PLURAL: &'static str = "events";

    fn record_id(&self) -> String {
        self.id.clone()
    }

    type OrderKey = NaiveDateTime;

    fn order_key(&self) -> NaiveDateTime {
        self.event_date
    }
}
