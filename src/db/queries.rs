use sqlx::{MySql, QueryBuilder};

use super::schema::TableLayout;
use crate::error::{DtakoError, Result};
use crate::filter::RecordFilter;

/// Hard cap on rows returned by any list or fetch query.
pub const MAX_ROWS: usize = 100;

pub const UPSERT_TRIP_ROW: &str = r#"
INSERT INTO dtako_rows (
    id, 運行NO, 読取日, 運行日, 車輌CD, 車輌CC, 対象乗務員CD, 行先市町村名,
    総走行距離, 自社主燃料
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON DUPLICATE KEY UPDATE
    運行NO = VALUES(運行NO),
    読取日 = VALUES(読取日),
    運行日 = VALUES(運行日),
    車輌CD = VALUES(車輌CD),
    車輌CC = VALUES(車輌CC),
    対象乗務員CD = VALUES(対象乗務員CD),
    行先市町村名 = VALUES(行先市町村名),
    総走行距離 = VALUES(総走行距離),
    自社主燃料 = VALUES(自社主燃料);
"#;

pub const UPSERT_DRIVING_EVENT: &str = r#"
INSERT INTO dtako_events (
    id, 運行NO, 読取日, 車輌CD, 車輌CC, 開始日時, 終了日時,
    イベント名, 対象乗務員CD, 対象乗務員区分, 乗務員CD1,
    開始走行距離, 終了走行距離, 区間時間, 区間距離,
    開始市町村名, 終了市町村名, 開始場所名, 終了場所名,
    開始GPS緯度, 開始GPS経度, 備考
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON DUPLICATE KEY UPDATE
    運行NO = VALUES(運行NO),
    読取日 = VALUES(読取日),
    車輌CD = VALUES(車輌CD),
    開始日時 = VALUES(開始日時),
    終了日時 = VALUES(終了日時),
    イベント名 = VALUES(イベント名),
    対象乗務員CD = VALUES(対象乗務員CD),
    開始市町村名 = VALUES(開始市町村名),
    終了市町村名 = VALUES(終了市町村名),
    開始場所名 = VALUES(開始場所名),
    終了場所名 = VALUES(終了場所名),
    開始GPS緯度 = VALUES(開始GPS緯度),
    開始GPS経度 = VALUES(開始GPS経度),
    備考 = VALUES(備考);
"#;

pub const UPSERT_FERRY_CROSSING: &str = r#"
INSERT INTO dtako_ferry_rows (
    id, 運行NO, 運行日, 読取日, 事業所CD, 事業所名,
    車輌CD, 車輌名, 乗務員CD1, 乗務員名１, 対象乗務員区分,
    開始日時, 終了日時, フェリー会社CD, フェリー会社名,
    乗場CD, 乗場名, 便, 降場CD, 降場名,
    精算区分, 精算区分名, 標準料金, 契約料金,
    航送車種区分, 航送車種区分名, 見なし距離, ferry_srch
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON DUPLICATE KEY UPDATE
    運行NO = VALUES(運行NO),
    運行日 = VALUES(運行日),
    読取日 = VALUES(読取日),
    事業所CD = VALUES(事業所CD),
    事業所名 = VALUES(事業所名),
    車輌CD = VALUES(車輌CD),
    車輌名 = VALUES(車輌名),
    乗務員CD1 = VALUES(乗務員CD1),
    乗務員名１ = VALUES(乗務員名１),
    対象乗務員区分 = VALUES(対象乗務員区分),
    開始日時 = VALUES(開始日時),
    終了日時 = VALUES(終了日時),
    フェリー会社CD = VALUES(フェリー会社CD),
    フェリー会社名 = VALUES(フェリー会社名),
    乗場CD = VALUES(乗場CD),
    乗場名 = VALUES(乗場名),
    便 = VALUES(便),
    降場CD = VALUES(降場CD),
    降場名 = VALUES(降場名),
    精算区分 = VALUES(精算区分),
    精算区分名 = VALUES(精算区分名),
    標準料金 = VALUES(標準料金),
    契約料金 = VALUES(契約料金),
    航送車種区分 = VALUES(航送車種区分),
    航送車種区分名 = VALUES(航送車種区分名),
    見なし距離 = VALUES(見なし距離),
    ferry_srch = VALUES(ferry_srch);
"#;

/// Rejects filters the table has no column for.
pub fn check_supported(layout: &TableLayout, filter: &RecordFilter) -> Result<()> {
    if let (Some(category), None) = (&filter.category, layout.category_column) {
        return Err(DtakoError::InvalidFilter {
            field: "type",
            value: format!("'{}' is not supported for {}", category, layout.table),
        });
    }
    if let (Some(text), None) = (&filter.free_text, layout.free_text_column) {
        return Err(DtakoError::InvalidFilter {
            field: "ferry_company",
            value: format!("'{}' is not supported for {}", text, layout.table),
        });
    }
    Ok(())
}

/// Builds the capped, newest-first select for a date window.
///
/// The linking key goes first so the `運行NO` index is used.
pub fn build_select(layout: &TableLayout, filter: &RecordFilter) -> Result<QueryBuilder<'static, MySql>> {
    check_supported(layout, filter)?;

    let mut query = QueryBuilder::new("SELECT ");
    query
        .push(layout.select_list.trim())
        .push(" FROM ")
        .push(layout.table)
        .push(" WHERE 1=1");

    if let Some(key) = &filter.linking_key {
        query
            .push(" AND ")
            .push(layout.linking_key_column)
            .push(" = ")
            .push_bind(key.clone());
    }

    query
        .push(" AND ")
        .push(layout.timestamp_column)
        .push(" >= ")
        .push_bind(filter.lower_bound())
        .push(" AND ")
        .push(layout.timestamp_column)
        .push(" < ")
        .push_bind(filter.upper_bound());

    if let (Some(category), Some(column)) = (&filter.category, layout.category_column) {
        query.push(" AND ").push(column).push(" = ").push_bind(category.clone());
    }
    if let (Some(text), Some(column)) = (&filter.free_text, layout.free_text_column) {
        query.push(" AND ").push(column).push(" = ").push_bind(text.clone());
    }

    query
        .push(" ORDER BY ")
        .push(layout.order_by)
        .push(" LIMIT ")
        .push(MAX_ROWS);

    Ok(query)
}

pub fn build_find_by_id(layout: &TableLayout) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?",
        layout.select_list.trim(),
        layout.table,
        layout.id_column
    )
}
