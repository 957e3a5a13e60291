use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;

use super::non_negative_i64;
use crate::error::CodecError;
use crate::models::FerryCrossing;

#[derive(Debug, Clone, FromRow)]
pub struct FerryCrossingRaw {
    pub id: i64,
    pub unko_no: Option<String>,
    pub unko_date: NaiveDate,
    pub read_date: NaiveDate,
    pub office_code: i64,
    pub office_name: Option<String>,
    pub vehicle_code: i64,
    pub vehicle_name: Option<String>,
    pub driver_code_1: i64,
    pub driver_name_1: Option<String>,
    pub target_driver_class: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub ferry_company_code: i64,
    pub ferry_company_name: Option<String>,
    pub boarding_code: i64,
    pub boarding_name: Option<String>,
    pub ship_number: Option<String>,
    pub landing_code: i64,
    pub landing_name: Option<String>,
    pub settlement_class: i64,
    pub settlement_name: Option<String>,
    pub standard_fare: i64,
    pub contract_fare: i64,
    pub ship_vehicle_class: i64,
    pub ship_vehicle_name: Option<String>,
    pub estimated_distance: i64,
    pub ferry_search: Option<String>,
}

impl From<FerryCrossingRaw> for FerryCrossing {
    fn from(raw: FerryCrossingRaw) -> Self {
        Self {
            id: raw.id,
            trip_no: raw.unko_no.unwrap_or_default(),
            unko_date: raw.unko_date,
            read_date: raw.read_date,
            office_code: raw.office_code,
            office_name: raw.office_name.unwrap_or_default(),
            vehicle_code: raw.vehicle_code,
            vehicle_name: raw.vehicle_name.unwrap_or_default(),
            driver_code_1: raw.driver_code_1,
            driver_name_1: raw.driver_name_1.unwrap_or_default(),
            target_driver_class: raw.target_driver_class,
            start_time: raw.start_time,
            end_time: raw.end_time,
            ferry_company_code: raw.ferry_company_code,
            ferry_company_name: raw.ferry_company_name.unwrap_or_default(),
            boarding_code: raw.boarding_code,
            boarding_name: raw.boarding_name.unwrap_or_default(),
            ship_number: raw.ship_number.unwrap_or_default(),
            landing_code: raw.landing_code,
            landing_name: raw.landing_name.unwrap_or_default(),
            settlement_class: raw.settlement_class,
            settlement_name: raw.settlement_name.unwrap_or_default(),
            standard_fare: raw.standard_fare,
            contract_fare: raw.contract_fare,
            ship_vehicle_class: raw.ship_vehicle_class,
            ship_vehicle_name: raw.ship_vehicle_name.unwrap_or_default(),
            estimated_distance: raw.estimated_distance,
            ferry_search: raw.ferry_search.unwrap_or_default(),
        }
    }
}

/// A ferry crossing checked against the destination invariants.
///
/// The destination layout matches the wire record column for column, so the
/// params borrow the record instead of copying it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FerryCrossingParams<'a> {
    pub record: &'a FerryCrossing,
}

impl FerryCrossing {
    pub fn encode(&self) -> Result<FerryCrossingParams<'_>, CodecError> {
        if self.end_time < self.start_time {
            return Err(CodecError::EndBeforeStart {
                start: self.start_time.to_string(),
                end: self.end_time.to_string(),
            });
        }
        non_negative_i64("standard_fare", self.standard_fare)?;
        non_negative_i64("contract_fare", self.contract_fare)?;
        non_negative_i64("estimated_distance", self.estimated_distance)?;
        Ok(FerryCrossingParams { record: self })
    }
}
