use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN: &str = "unknown";

pub const REPORT_COLUMNS: [&str; 7] = [
    "Domain",
    "Registration Date",
    "Expiration Date",
    "Expires In",
    "Domain Age (days)",
    "Drop Release Estimate",
    "Status",
];

/// A trimmed, non-empty domain name. Syntax is not checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase ASCII form, with internationalized labels in punycode
    /// (`пример.рф` becomes `xn--e1afmkfd.xn--p1ai`). `None` when the name
    /// is not a valid host.
    pub fn to_ascii(&self) -> Option<String> {
        match url::Host::parse(&self.0).ok()? {
            url::Host::Domain(name) => Some(name),
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One date as returned by a lookup backend, either already typed or raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    Timestamp(DateTime<Utc>),
    Text(String),
}

/// Lookup backends may report a date attribute zero, one or several times.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateField {
    #[default]
    Absent,
    Single(DateValue),
    Many(Vec<DateValue>),
}

impl DateField {
    pub fn from_values(mut values: Vec<DateValue>) -> Self {
        match values.len() {
            0 => DateField::Absent,
            1 => DateField::Single(values.remove(0)),
            _ => DateField::Many(values),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawWhoisRecord {
    pub creation_date: DateField,
    pub expiration_date: DateField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStatus {
    Available,
    Taken,
}

impl fmt::Display for DomainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainStatus::Available => f.write_str("available"),
            DomainStatus::Taken => f.write_str("taken"),
        }
    }
}

/// Signed whole days between now and the expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiresIn(pub i64);

impl fmt::Display for ExpiresIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 0 {
            write!(f, "in {} days", self.0)
        } else {
            write!(f, "{} days ago", self.0.unsigned_abs())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRelease {
    InDays(i64),
    AlreadyFree,
}

impl fmt::Display for DropRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropRelease::InDays(days) => write!(f, "in {} days", days),
            DropRelease::AlreadyFree => f.write_str("already free"),
        }
    }
}

/// A single output cell. Ages stay numeric so spreadsheets can sort them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCell {
    Text(String),
    Integer(i64),
}

impl fmt::Display for ReportCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportCell::Text(text) => f.write_str(text),
            ReportCell::Integer(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainReport {
    pub domain: String,
    pub registration_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub expires_in: Option<ExpiresIn>,
    pub age_in_days: Option<i64>,
    pub drop_release: Option<DropRelease>,
    pub status: DomainStatus,
}

impl DomainReport {
    /// Row emitted when the lookup itself failed.
    pub fn unreachable(domain: &DomainName) -> Self {
        Self {
            domain: domain.as_str().to_string(),
            registration_date: None,
            expiration_date: None,
            expires_in: None,
            age_in_days: None,
            drop_release: None,
            status: DomainStatus::Available,
        }
    }

    /// Cells in `REPORT_COLUMNS` order.
    pub fn cells(&self) -> [ReportCell; 7] {
        fn text_or_unknown<T: fmt::Display>(value: Option<T>) -> ReportCell {
            ReportCell::Text(
                value
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            )
        }

        [
            ReportCell::Text(self.domain.clone()),
            text_or_unknown(self.registration_date.map(|d| d.format("%Y-%m-%d"))),
            text_or_unknown(self.expiration_date.map(|d| d.format("%Y-%m-%d"))),
            text_or_unknown(self.expires_in),
            self.age_in_days
                .map(ReportCell::Integer)
                .unwrap_or_else(|| ReportCell::Text(UNKNOWN.to_string())),
            text_or_unknown(self.drop_release),
            ReportCell::Text(self.status.to_string()),
        ]
    }

    pub fn text_row(&self) -> Vec<String> {
        self.cells().iter().map(|cell| cell.to_string()).collect()
    }
}

/// Which lookup protocol feeds the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LookupBackend {
    #[default]
    Whois,
    Rdap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ReportFormat {
    /// `.csv` selects CSV, anything else the spreadsheet format.
    pub fn from_path(path: &str) -> Self {
        match std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
        {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ReportFormat::Csv,
            _ => ReportFormat::Xlsx,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportBatch {
    pub generated_at: DateTime<Utc>,
    pub reports: Vec<DomainReport>,
}

impl ReportBatch {
    pub fn available_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.status == DomainStatus::Available)
            .count()
    }

    pub fn taken_count(&self) -> usize {
        self.reports.len() - self.available_count()
    }
}
