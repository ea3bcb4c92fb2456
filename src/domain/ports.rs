use crate::domain::model::{DomainName, LookupBackend, RawWhoisRecord, ReportBatch, ReportFormat};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn drop_delay_days(&self) -> i64;
    fn report_format(&self) -> ReportFormat;
    fn lookup_backend(&self) -> LookupBackend;
    fn lookup_timeout(&self) -> Duration;
    fn rdap_endpoint(&self) -> &str;
}

/// Registration data source. Implementations report every failure as an
/// error; the pipeline decides what a failure means for the report.
#[async_trait]
pub trait WhoisLookup: Send + Sync {
    async fn lookup(&self, domain: &DomainName) -> Result<RawWhoisRecord>;
}

#[async_trait]
impl<T: WhoisLookup + ?Sized> WhoisLookup for Box<T> {
    async fn lookup(&self, domain: &DomainName) -> Result<RawWhoisRecord> {
        (**self).lookup(domain).await
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<DomainName>>;
    async fn transform(&self, domains: Vec<DomainName>, now: DateTime<Utc>) -> Result<ReportBatch>;
    async fn load(&self, batch: &ReportBatch) -> Result<String>;
}
