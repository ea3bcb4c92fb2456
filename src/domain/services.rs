use crate::domain::dates::{floor_days, normalize_creation, normalize_expiration};
use crate::domain::model::{
    DateField, DomainName, DomainReport, DomainStatus, DropRelease, ExpiresIn, RawWhoisRecord,
};
use chrono::{DateTime, TimeDelta, Utc};

/// One domain per non-blank line, trimmed, in file order.
pub fn load_domains(content: &str) -> Vec<DomainName> {
    content.lines().filter_map(DomainName::parse).collect()
}

/// Builds the report row for one domain. `None` means the lookup failed.
pub fn build_report(
    domain: &DomainName,
    record: Option<&RawWhoisRecord>,
    now: DateTime<Utc>,
    drop_delay_days: i64,
) -> DomainReport {
    let Some(record) = record else {
        return DomainReport::unreachable(domain);
    };

    let creation = normalize_creation(&record.creation_date);
    // An expiration whose release date falls outside the calendar range is
    // treated like an unparseable one.
    let dated = normalize_expiration(&record.expiration_date).and_then(|exp| {
        TimeDelta::try_days(drop_delay_days)
            .and_then(|delay| exp.checked_add_signed(delay))
            .map(|release| (exp, release))
    });
    let expiration = dated.map(|(exp, _)| exp);

    if creation.is_none() && !matches!(record.creation_date, DateField::Absent) {
        tracing::debug!(domain = %domain, "creation date present but not parseable");
    }
    if expiration.is_none() && !matches!(record.expiration_date, DateField::Absent) {
        tracing::debug!(domain = %domain, "expiration date present but not parseable");
    }

    let expires_in = expiration.map(|exp| ExpiresIn(floor_days(exp - now)));

    let drop_release = dated.map(|(_, release)| match floor_days(release - now) {
        days if days > 0 => DropRelease::InDays(days),
        _ => DropRelease::AlreadyFree,
    });

    let status = match expiration {
        Some(exp) if exp < now => DomainStatus::Available,
        _ => DomainStatus::Taken,
    };

    DomainReport {
        domain: domain.as_str().to_string(),
        registration_date: creation.map(|ts| ts.date_naive()),
        expiration_date: expiration.map(|ts| ts.date_naive()),
        expires_in,
        age_in_days: creation.map(|created| floor_days(now - created)),
        drop_release,
        status,
    }
}
