use crate::domain::model::{DateField, DateValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const SECONDS_PER_DAY: i64 = 86_400;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y.%m.%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%d-%b-%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y.%m.%d",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%d.%m.%Y",
    "%d/%m/%Y",
    "%b %d %Y",
    "%d %b %Y",
    "%Y%m%d",
];

const UTC_SUFFIXES: &[&str] = &[" (UTC)", " UTC", " GMT", "Z"];

/// Parses the date spellings registries commonly use. Values without an
/// offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let cleaned = strip_utc_suffix(trimmed);

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

fn strip_utc_suffix(value: &str) -> &str {
    UTC_SUFFIXES
        .iter()
        .find_map(|suffix| value.strip_suffix(suffix))
        .map(str::trim_end)
        .unwrap_or(value)
}

impl DateValue {
    pub fn to_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            DateValue::Timestamp(ts) => Some(*ts),
            DateValue::Text(text) => parse_timestamp(text),
        }
    }
}

/// Earliest parseable creation date: registries that list several dates
/// include the original registration among them.
pub fn normalize_creation(field: &DateField) -> Option<DateTime<Utc>> {
    match field {
        DateField::Absent => None,
        DateField::Single(value) => value.to_timestamp(),
        DateField::Many(values) => values.iter().filter_map(DateValue::to_timestamp).min(),
    }
}

/// The first listed expiration date is the registrar's primary one.
pub fn normalize_expiration(field: &DateField) -> Option<DateTime<Utc>> {
    match field {
        DateField::Absent => None,
        DateField::Single(value) => value.to_timestamp(),
        DateField::Many(values) => values.first().and_then(DateValue::to_timestamp),
    }
}

/// Whole days in `delta`, rounded toward negative infinity.
pub fn floor_days(delta: TimeDelta) -> i64 {
    let mut seconds = delta.num_seconds();
    if delta.subsec_nanos() < 0 {
        seconds -= 1;
    }
    seconds.div_euclid(SECONDS_PER_DAY)
}
