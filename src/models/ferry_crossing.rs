use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::Record;

/// A ferry segment of a trip (`dtako_ferry_rows`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FerryCrossing {
    pub id: i64,
    #[serde(rename = "unko_no")]
    pub trip_no: String,
    pub unko_date: NaiveDate,
    pub read_date: NaiveDate,
    pub office_code: i64,
    pub office_name: String,
    pub vehicle_code: i64,
    pub vehicle_name: String,
    pub driver_code_1: i64,
    pub driver_name_1: String,
    pub target_driver_class: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub ferry_company_code: i64,
    pub ferry_company_name: String,
    pub boarding_code: i64,
    pub boarding_name: String,
    pub ship_number: String,
    pub landing_code: i64,
    pub landing_name: String,
    pub settlement_class: i64,
    pub settlement_name: String,
    pub standard_fare: i64,
    pub contract_fare: i64,
    pub ship_vehicle_class: i64,
    pub ship_vehicle_name: String,
    pub estimated_distance: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ferry_search: String,
}

impl Record for FerryCrossing {
    const KIND: &'static str = "ferry row record";
    const KIND_PLURAL: &'static str = "ferry row records";

    fn record_id(&self) -> String {
        self.id.to_string()
    }

    /// Operation day first, then departure within the day.
    type OrderKey = (NaiveDate, NaiveDateTime);

    fn order_key(&self) -> (NaiveDate, NaiveDateTime) {
        (self.unko_date, self.start_time)
    }
}
