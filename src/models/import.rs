use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of an import call. Dates are required and never defaulted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub from_date: String,
    #[serde(default)]
    pub to_date: String,
    /// Driving events only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Ferry crossings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ferry_company: Option<String>,
}

/// Outcome of one import call.
///
/// `success` is false when nothing was written, which is not an error by itself.
/// Per-record failures land in `errors` and never abort the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub success: bool,
    #[serde(rename = "imported_rows")]
    pub imported_count: usize,
    pub message: String,
    pub imported_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Query string of a list call. Unset dates cover the last 30 days.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub unko_no: Option<String>,
    pub ferry_company: Option<String>,
}
