use crate::domain::model::{DateField, DateValue, RawWhoisRecord};
use once_cell::sync::Lazy;
use regex::Regex;

static CREATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:Creation Date|Created Date|Created On|Domain Registration Date|Domain Create Date|Registration Date|Registration Time|Registered On|Registered|Created)[ \t]*:[ \t]*(\S.*?)[ \t\r]*$",
    )
    .expect("creation date pattern is valid")
});

static EXPIRATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:Registry Expiry Date|Registrar Registration Expiration Date|Expiration Date|Expiration Time|Expiry Date|Expire Date|Expires On|Expires|Expiry|paid-till|Valid Until)[ \t]*:[ \t]*(\S.*?)[ \t\r]*$",
    )
    .expect("expiration date pattern is valid")
});

static REGISTRAR_SERVER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*Registrar WHOIS Server[ \t]*:[ \t]*(\S+)")
        .expect("registrar server pattern is valid")
});

static IANA_REFER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:refer|whois)[ \t]*:[ \t]*(\S+)").expect("referral pattern is valid")
});

const NOT_FOUND_MARKERS: &[&str] = &[
    "no match for",
    "no match!!",
    "not found",
    "no data found",
    "no entries found",
    "no object found",
    "status: free",
    "status: available",
    "is available for registration",
];

/// Extracts the creation and expiration values of a textual WHOIS answer.
/// Values stay raw text; parsing happens during normalization.
pub fn parse_whois_text(raw: &str) -> RawWhoisRecord {
    RawWhoisRecord {
        creation_date: collect_dates(&CREATION_RE, raw),
        expiration_date: collect_dates(&EXPIRATION_RE, raw),
    }
}

fn collect_dates(pattern: &Regex, raw: &str) -> DateField {
    let mut values: Vec<DateValue> = Vec::new();
    for caps in pattern.captures_iter(raw) {
        let value = DateValue::Text(caps[1].to_string());
        if !values.contains(&value) {
            values.push(value);
        }
    }
    DateField::from_values(values)
}

pub fn is_not_found(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    NOT_FOUND_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Registrar server named by a thin registry (`.com`, `.net`).
pub fn registrar_server(raw: &str) -> Option<String> {
    REGISTRAR_SERVER_RE
        .captures(raw)
        .map(|caps| normalize_host(&caps[1]))
        .filter(|host| !host.is_empty())
}

/// Server named by whois.iana.org for a TLD.
pub fn iana_referral(raw: &str) -> Option<String> {
    IANA_REFER_RE
        .captures(raw)
        .map(|caps| normalize_host(&caps[1]))
        .filter(|host| !host.is_empty())
}

fn normalize_host(value: &str) -> String {
    let host = value
        .trim()
        .trim_start_matches("whois://")
        .trim_start_matches("rwhois://")
        .trim_end_matches('/');
    host.to_ascii_lowercase()
}
