use crate::domain::model::{DateField, DateValue, DomainName, RawWhoisRecord};
use crate::domain::ports::WhoisLookup;
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_RDAP_ENDPOINT: &str = "https://rdap.org";

#[derive(Debug, Deserialize)]
struct RdapDomain {
    #[serde(default)]
    events: Vec<RdapEvent>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    action: String,
    #[serde(rename = "eventDate")]
    date: Option<String>,
}

/// Registration data over RDAP (RFC 9083). `rdap.org` redirects to the
/// authoritative registry server.
pub struct RdapClient {
    client: Client,
    endpoint: String,
}

impl RdapClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("whois-report/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn domain_url(&self, domain: &DomainName) -> String {
        let name = domain.to_ascii().unwrap_or_else(|| domain.to_string());
        format!("{}/domain/{}", self.endpoint, name)
    }
}

#[async_trait]
impl WhoisLookup for RdapClient {
    async fn lookup(&self, domain: &DomainName) -> Result<RawWhoisRecord> {
        let url = self.domain_url(domain);
        tracing::debug!("Making RDAP request to: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                ReportError::Timeout {
                    domain: domain.to_string(),
                    operation: "RDAP request".to_string(),
                }
            } else {
                ReportError::ApiError(e)
            }
        })?;

        tracing::debug!("RDAP response status: {}", response.status());

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(ReportError::DomainNotFound {
                    domain: domain.to_string(),
                })
            }
            status if !status.is_success() => {
                return Err(ReportError::LookupError {
                    domain: domain.to_string(),
                    message: format!("RDAP server answered {}", status),
                })
            }
            _ => {}
        }

        let bytes = response.bytes().await?;
        let body: RdapDomain =
            serde_json::from_slice(&bytes).map_err(|e| ReportError::LookupError {
                domain: domain.to_string(),
                message: format!("malformed RDAP response: {}", e),
            })?;
        Ok(record_from_events(&body.events))
    }
}

fn record_from_events(events: &[RdapEvent]) -> RawWhoisRecord {
    let dates_for = |action: &str| {
        let values = events
            .iter()
            .filter(|event| event.action.eq_ignore_ascii_case(action))
            .filter_map(|event| event.date.as_deref())
            .map(|date| match DateTime::parse_from_rfc3339(date) {
                Ok(ts) => DateValue::Timestamp(ts.with_timezone(&Utc)),
                Err(_) => DateValue::Text(date.to_string()),
            })
            .collect();
        DateField::from_values(values)
    };

    RawWhoisRecord {
        creation_date: dates_for("registration"),
        expiration_date: dates_for("expiration"),
    }
}
