use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Record;

/// One vehicle operation (`dtako_rows`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRow {
    pub id: String,
    #[serde(rename = "unko_no")]
    pub trip_no: String,
    #[serde(rename = "date")]
    pub operation_date: NaiveDateTime,
    pub vehicle_no: String,
    pub driver_code: String,
    pub route_code: String,
    pub distance: f64,
    pub fuel_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Record for TripRow {
    const KIND: &'static str = "row";
    const KIND_PLURAL: &'static str = "rows";

    fn record_id(&self) -> String {
        self.id.clone()
    }

    type OrderKey = NaiveDateTime;

    fn order_key(&self) -> NaiveDateTime {
        self.operation_date
    }
}
