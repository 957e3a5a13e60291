use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

use crate::error::{DtakoError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days covered by a list query that omits its dates.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Event names accepted as a category filter on driving event imports.
pub const IMPORT_EVENT_CATEGORIES: [&str; 6] = ["START", "STOP", "END", "運転", "休憩", "作業"];

/// A validated, inclusive date window plus optional equality filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    from: NaiveDate,
    to: NaiveDate,
    pub category: Option<String>,
    pub linking_key: Option<String>,
    pub free_text: Option<String>,
}

impl RecordFilter {
    /// `to` must have a following day, since the window ends at its midnight.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if to.succ_opt().is_none() {
            return Err(DtakoError::InvalidDate {
                field: "to_date",
                value: to.format(DATE_FORMAT).to_string(),
            });
        }
        if from > to {
            return Err(DtakoError::InvalidRange {
                from: from.format(DATE_FORMAT).to_string(),
                to: to.format(DATE_FORMAT).to_string(),
            });
        }
        Ok(Self {
            from,
            to,
            category: None,
            linking_key: None,
            free_text: None,
        })
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = non_empty(category);
        self
    }

    pub fn with_linking_key(mut self, linking_key: Option<String>) -> Self {
        self.linking_key = non_empty(linking_key);
        self
    }

    pub fn with_free_text(mut self, free_text: Option<String>) -> Self {
        self.free_text = non_empty(free_text);
        self
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Inclusive lower bound: midnight at the start of `from`.
    pub fn lower_bound(&self) -> NaiveDateTime {
        self.from.and_time(NaiveTime::MIN)
    }

    /// Exclusive upper bound: midnight after `to`, so the whole `to` day is covered.
    pub fn upper_bound(&self) -> NaiveDateTime {
        self.to
            .succ_opt()
            .unwrap_or(NaiveDate::MAX)
            .and_time(NaiveTime::MIN)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses `YYYY-MM-DD`. The last representable day is rejected too, as no window can end after it.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .ok()
        .filter(|date| date.succ_opt().is_some())
        .ok_or_else(|| DtakoError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

/// Parses a date that may be omitted, falling back to `default`.
pub fn parse_optional_date(
    field: &'static str,
    value: Option<&str>,
    default: NaiveDate,
) -> Result<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_date(field, v),
        None => Ok(default),
    }
}

/// The calendar date right now in the configured filter zone.
pub fn today(utc_offset_hours: i32) -> NaiveDate {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset).date_naive()
}

pub fn validate_import_category(category: Option<&str>) -> Result<()> {
    match category.filter(|c| !c.is_empty()) {
        Some(c) if !IMPORT_EVENT_CATEGORIES.contains(&c) => Err(DtakoError::InvalidFilter {
            field: "event_type",
            value: c.to_string(),
        }),
        _ => Ok(()),
    }
}
