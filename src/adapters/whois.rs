use crate::adapters::whois_parser::{iana_referral, is_not_found, parse_whois_text, registrar_server};
use crate::domain::model::{DomainName, RawWhoisRecord};
use crate::domain::ports::WhoisLookup;
use crate::utils::error::{ReportError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// WHOIS TCP port.
pub const WHOIS_PORT: u16 = 43;

pub const IANA_SERVER: &str = "whois.iana.org";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

static WHOIS_SERVERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert("com", "whois.verisign-grs.com");
    m.insert("net", "whois.verisign-grs.com");
    m.insert("org", "whois.pir.org");
    m.insert("info", "whois.nic.info");
    m.insert("biz", "whois.nic.biz");
    m.insert("io", "whois.nic.io");
    m.insert("co", "whois.nic.co");
    m.insert("me", "whois.nic.me");
    m.insert("tv", "whois.nic.tv");
    m.insert("cc", "ccwhois.verisign-grs.com");
    m.insert("xyz", "whois.nic.xyz");
    m.insert("app", "whois.nic.google");
    m.insert("dev", "whois.nic.google");
    m.insert("online", "whois.nic.online");
    m.insert("site", "whois.nic.site");
    m.insert("shop", "whois.nic.shop");
    m.insert("ru", "whois.tcinet.ru");
    m.insert("su", "whois.tcinet.ru");
    m.insert("xn--p1ai", "whois.tcinet.ru");
    m.insert("uk", "whois.nic.uk");
    m.insert("de", "whois.denic.de");
    m.insert("fr", "whois.nic.fr");
    m.insert("nl", "whois.domain-registry.nl");
    m.insert("eu", "whois.eu");
    m.insert("us", "whois.nic.us");

    m
});

/// Plain WHOIS client: one TCP request per query, each step bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    timeout: Duration,
    port: u16,
    fixed_server: Option<String>,
}

impl WhoisClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            port: WHOIS_PORT,
            fixed_server: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sends every query to `server`, skipping TLD resolution.
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.fixed_server = Some(server.into());
        self
    }

    /// Sends `query` to `server` and returns the whole answer.
    pub async fn query(&self, server: &str, query: &str, domain: &DomainName) -> Result<String> {
        let mut stream = match timeout(self.timeout, TcpStream::connect((server, self.port))).await {
            Ok(Ok(s)) => s,
            Ok(Err(e)) => {
                return Err(ReportError::LookupError {
                    domain: domain.to_string(),
                    message: format!("connect error to {}: {}", server, e),
                })
            }
            Err(_) => return Err(self.timeout_error(domain, "connect", server)),
        };

        let line = format!("{}\r\n", query);
        timeout(self.timeout, stream.write_all(line.as_bytes()))
            .await
            .map_err(|_| self.timeout_error(domain, "write", server))??;

        let mut buf = Vec::new();
        timeout(self.timeout, stream.read_to_end(&mut buf))
            .await
            .map_err(|_| self.timeout_error(domain, "read", server))??;

        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn timeout_error(&self, domain: &DomainName, step: &str, server: &str) -> ReportError {
        ReportError::Timeout {
            domain: domain.to_string(),
            operation: format!("{} {}", step, server),
        }
    }

    /// `name` is the ASCII form of `domain`.
    async fn resolve_server(&self, name: &str, domain: &DomainName) -> Result<String> {
        if let Some(server) = &self.fixed_server {
            return Ok(server.clone());
        }

        let tld = name
            .trim_end_matches('.')
            .rsplit('.')
            .next()
            .unwrap_or_default()
            .to_lowercase();

        if let Some(server) = WHOIS_SERVERS.get(tld.as_str()) {
            return Ok((*server).to_string());
        }

        tracing::debug!(domain = %domain, tld = %tld, "asking IANA for the WHOIS server");
        let answer = self.query(IANA_SERVER, &tld, domain).await?;
        iana_referral(&answer).ok_or_else(|| ReportError::LookupError {
            domain: domain.to_string(),
            message: format!("no WHOIS server known for .{}", tld),
        })
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl WhoisLookup for WhoisClient {
    async fn lookup(&self, domain: &DomainName) -> Result<RawWhoisRecord> {
        let name = domain.to_ascii().ok_or_else(|| ReportError::LookupError {
            domain: domain.to_string(),
            message: "not a valid host name".to_string(),
        })?;
        let server = self.resolve_server(&name, domain).await?;
        tracing::debug!(domain = %domain, server = %server, "querying WHOIS");

        let mut answer = self.query(&server, &name, domain).await?;
        let mut record = parse_whois_text(&answer);

        if record == RawWhoisRecord::default() && is_not_found(&answer) {
            return Err(ReportError::DomainNotFound {
                domain: domain.to_string(),
            });
        }

        // Thin registries only carry a summary; the registrar holds the rest.
        if let Some(referral) = registrar_server(&answer).filter(|r| !r.eq_ignore_ascii_case(&server)) {
            match self.query(&referral, &name, domain).await {
                Ok(extra) => {
                    answer.push('\n');
                    answer.push_str(&extra);
                    record = parse_whois_text(&answer);
                }
                Err(e) => {
                    tracing::debug!(
                        domain = %domain,
                        server = %referral,
                        error = %e,
                        "registrar referral failed, keeping registry answer"
                    );
                }
            }
        }

        Ok(record)
    }
}
