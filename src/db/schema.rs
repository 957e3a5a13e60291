//! Column layouts of the three tachograph tables.
//!
//! Production stores Japanese column names and GPS positions as integers
//! scaled by 1,000,000. The test production database uses English column
//! names and plain floating point positions. Every select list aliases its
//! columns to the same English names and scaled integers, so one raw row
//! struct per record kind decodes both layouts.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Which source layout the production connection speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMapping {
    Production,
    Test,
}

#[derive(Error, Debug)]
#[error("unknown schema mapping '{0}' (expected 'production' or 'test')")]
pub struct UnknownSchemaMapping(String);

impl FromStr for SchemaMapping {
    type Err = UnknownSchemaMapping;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(UnknownSchemaMapping(s.to_string())),
        }
    }
}

impl fmt::Display for SchemaMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => f.write_str("production"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// Where a record kind lives and which columns its filters run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub table: &'static str,
    pub select_list: &'static str,
    pub id_column: &'static str,
    pub timestamp_column: &'static str,
    pub order_by: &'static str,
    pub linking_key_column: &'static str,
    pub category_column: Option<&'static str>,
    pub free_text_column: Option<&'static str>,
}

pub const TRIP_ROWS_PRODUCTION: TableLayout = TableLayout {
    table: "dtako_rows",
    select_list: r#"
        CAST(id AS CHAR) AS id,
        COALESCE(運行NO, '') AS unko_no,
        CAST(運行日 AS DATETIME) AS date,
        COALESCE(CAST(車輌CD AS CHAR), '') AS vehicle_no,
        COALESCE(CAST(対象乗務員CD AS CHAR), '') AS driver_code,
        COALESCE(行先市町村名, '') AS route_code,
        CAST(COALESCE(総走行距離, 0) AS DOUBLE) AS distance,
        CAST(COALESCE(自社主燃料, 0) AS DOUBLE) AS fuel_amount,
        CAST(NULL AS DATETIME) AS created_at,
        CAST(NULL AS DATETIME) AS updated_at
    "#,
    id_column: "id",
    timestamp_column: "運行日",
    order_by: "運行日 DESC",
    linking_key_column: "運行NO",
    category_column: None,
    free_text_column: None,
};

pub const TRIP_ROWS_TEST: TableLayout = TableLayout {
    table: "dtako_rows",
    select_list: r#"
        CAST(id AS CHAR) AS id,
        COALESCE(unko_no, '') AS unko_no,
        CAST(date AS DATETIME) AS date,
        COALESCE(vehicle_no, '') AS vehicle_no,
        COALESCE(driver_code, '') AS driver_code,
        COALESCE(route_code, '') AS route_code,
        CAST(COALESCE(distance, 0) AS DOUBLE) AS distance,
        CAST(COALESCE(fuel_amount, 0) AS DOUBLE) AS fuel_amount,
        created_at,
        updated_at
    "#,
    id_column: "id",
    timestamp_column: "date",
    order_by: "date DESC",
    linking_key_column: "unko_no",
    category_column: None,
    free_text_column: None,
};

pub const DRIVING_EVENTS_PRODUCTION: TableLayout = TableLayout {
    table: "dtako_events",
    select_list: r#"
        CAST(id AS CHAR) AS id,
        COALESCE(運行NO, '') AS unko_no,
        開始日時 AS event_date,
        COALESCE(イベント名, '') AS event_type,
        COALESCE(CAST(車輌CD AS CHAR), '') AS vehicle_no,
        COALESCE(CAST(対象乗務員CD AS CHAR), '') AS driver_code,
        COALESCE(備考, '') AS description,
        COALESCE(開始市町村名, '') AS start_city_name,
        COALESCE(終了市町村名, '') AS end_city_name,
        COALESCE(開始場所名, '') AS start_place_name,
        COALESCE(終了場所名, '') AS end_place_name,
        CAST(開始GPS緯度 AS SIGNED) AS latitude,
        CAST(開始GPS経度 AS SIGNED) AS longitude
    "#,
    id_column: "id",
    timestamp_column: "開始日時",
    order_by: "運行日 DESC, 開始日時 DESC",
    linking_key_column: "運行NO",
    category_column: Some("イベント名"),
    free_text_column: None,
};

pub const DRIVING_EVENTS_TEST: TableLayout = TableLayout {
    table: "dtako_events",
    select_list: r#"
        CAST(id AS CHAR) AS id,
        COALESCE(unko_no, '') AS unko_no,
        event_date,
        COALESCE(event_type, '') AS event_type,
        COALESCE(vehicle_no, '') AS vehicle_no,
        COALESCE(driver_code, '') AS driver_code,
        COALESCE(description, '') AS description,
        COALESCE(start_city_name, '') AS start_city_name,
        COALESCE(end_city_name, '') AS end_city_name,
        COALESCE(start_place_name, '') AS start_place_name,
        COALESCE(end_place_name, '') AS end_place_name,
        CAST(ROUND(latitude * 1000000) AS SIGNED) AS latitude,
        CAST(ROUND(longitude * 1000000) AS SIGNED) AS longitude
    "#,
    id_column: "id",
    timestamp_column: "event_date",
    order_by: "event_date DESC",
    linking_key_column: "unko_no",
    category_column: Some("event_type"),
    free_text_column: None,
};

/// Ferry rows only ever existed with Japanese columns, in both environments.
pub const FERRY_CROSSINGS: TableLayout = TableLayout {
    table: "dtako_ferry_rows",
    select_list: r#"
        CAST(id AS SIGNED) AS id,
        COALESCE(運行NO, '') AS unko_no,
        CAST(運行日 AS DATE) AS unko_date,
        CAST(読取日 AS DATE) AS read_date,
        CAST(COALESCE(事業所CD, 0) AS SIGNED) AS office_code,
        COALESCE(事業所名, '') AS office_name,
        CAST(COALESCE(車輌CD, 0) AS SIGNED) AS vehicle_code,
        COALESCE(車輌名, '') AS vehicle_name,
        CAST(COALESCE(乗務員CD1, 0) AS SIGNED) AS driver_code_1,
        COALESCE(乗務員名１, '') AS driver_name_1,
        CAST(COALESCE(対象乗務員区分, 0) AS SIGNED) AS target_driver_class,
        開始日時 AS start_time,
        終了日時 AS end_time,
        CAST(COALESCE(フェリー会社CD, 0) AS SIGNED) AS ferry_company_code,
        COALESCE(フェリー会社名, '') AS ferry_company_name,
        CAST(COALESCE(乗場CD, 0) AS SIGNED) AS boarding_code,
        COALESCE(乗場名, '') AS boarding_name,
        COALESCE(便, '') AS ship_number,
        CAST(COALESCE(降場CD, 0) AS SIGNED) AS landing_code,
        COALESCE(降場名, '') AS landing_name,
        CAST(COALESCE(精算区分, 0) AS SIGNED) AS settlement_class,
        COALESCE(精算区分名, '') AS settlement_name,
        CAST(COALESCE(標準料金, 0) AS SIGNED) AS standard_fare,
        CAST(COALESCE(契約料金, 0) AS SIGNED) AS contract_fare,
        CAST(COALESCE(航送車種区分, 0) AS SIGNED) AS ship_vehicle_class,
        COALESCE(航送車種区分名, '') AS ship_vehicle_name,
        CAST(COALESCE(見なし距離, 0) AS SIGNED) AS estimated_distance,
        COALESCE(ferry_srch, '') AS ferry_search
    "#,
    id_column: "id",
    timestamp_column: "運行日",
    order_by: "開始日時 DESC",
    linking_key_column: "運行NO",
    category_column: None,
    free_text_column: Some("フェリー会社名"),
};

impl SchemaMapping {
    pub fn trip_rows(self) -> &'static TableLayout {
        match self {
            Self::Production => &TRIP_ROWS_PRODUCTION,
            Self::Test => &TRIP_ROWS_TEST,
        }
    }

    pub fn driving_events(self) -> &'static TableLayout {
        match self {
            Self::Production => &DRIVING_EVENTS_PRODUCTION,
            Self::Test => &DRIVING_EVENTS_TEST,
        }
    }

    pub fn ferry_crossings(self) -> &'static TableLayout {
        &FERRY_CROSSINGS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mapping_names() {
        assert_eq!("production".parse::<SchemaMapping>().unwrap(), SchemaMapping::Production);
        assert_eq!(" Test ".parse::<SchemaMapping>().unwrap(), SchemaMapping::Test);
        assert!("staging".parse::<SchemaMapping>().is_err());
    }

    #[test]
    fn test_layouts_alias_to_shared_names() {
        for mapping in [SchemaMapping::Production, SchemaMapping::Test] {
            let events = mapping.driving_events();
            assert!(events.select_list.contains("AS latitude"));
            assert!(events.select_list.contains("AS longitude"));
            assert!(events.category_column.is_some());

            let rows = mapping.trip_rows();
            assert!(rows.select_list.contains("AS fuel_amount"));
            assert!(rows.category_column.is_none());
        }
    }

    #[test]
    fn test_test_mapping_scales_float_coordinates() {
        assert!(DRIVING_EVENTS_TEST
            .select_list
            .contains("ROUND(latitude * 1000000)"));
        assert!(!DRIVING_EVENTS_PRODUCTION.select_list.contains("ROUND"));
    }
}
