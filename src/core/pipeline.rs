use crate::adapters::report::render;
use crate::core::{ConfigProvider, DomainName, Pipeline, ReportBatch, Storage, WhoisLookup};
use crate::domain::model::DomainReport;
use crate::domain::services::{build_report, load_domains};
use crate::utils::error::{ReportError, Result};
use chrono::{DateTime, Utc};

/// Looks up one domain and builds its report row. Never fails: lookup
/// errors are logged and turned into the unreachable row.
pub async fn process_domain<L: WhoisLookup + ?Sized>(
    lookup: &L,
    domain: &DomainName,
    now: DateTime<Utc>,
    drop_delay_days: i64,
) -> DomainReport {
    match lookup.lookup(domain).await {
        Ok(record) => build_report(domain, Some(&record), now, drop_delay_days),
        Err(ReportError::DomainNotFound { .. }) => {
            tracing::info!(domain = %domain, operation = "lookup", "no registration found");
            build_report(domain, None, now, drop_delay_days)
        }
        Err(e) => {
            tracing::warn!(
                domain = %domain,
                operation = "lookup",
                category = ?e.category(),
                "WHOIS lookup failed: {}",
                e
            );
            build_report(domain, None, now, drop_delay_days)
        }
    }
}

pub struct WhoisPipeline<S: Storage, C: ConfigProvider, L: WhoisLookup> {
    storage: S,
    config: C,
    lookup: L,
}

impl<S: Storage, C: ConfigProvider, L: WhoisLookup> WhoisPipeline<S, C, L> {
    pub fn new(storage: S, config: C, lookup: L) -> Self {
        Self {
            storage,
            config,
            lookup,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

fn input_error(path: &str, error: ReportError) -> ReportError {
    let source = match error {
        ReportError::IoError(io) => io,
        ReportError::InputError { source, .. } => source,
        other => std::io::Error::other(other.to_string()),
    };
    ReportError::InputError {
        path: path.to_string(),
        source,
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, L: WhoisLookup> Pipeline for WhoisPipeline<S, C, L> {
    async fn extract(&self) -> Result<Vec<DomainName>> {
        let path = self.config.input_path();
        tracing::debug!("Reading domain list from: {}", path);

        let bytes = self
            .storage
            .read_file(path)
            .await
            .map_err(|e| input_error(path, e))?;

        let content = String::from_utf8(bytes).map_err(|e| ReportError::InputError {
            path: path.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        let domains = load_domains(&content);
        tracing::info!("Loaded {} domains from {}", domains.len(), path);
        Ok(domains)
    }

    async fn transform(&self, domains: Vec<DomainName>, now: DateTime<Utc>) -> Result<ReportBatch> {
        let drop_delay_days = self.config.drop_delay_days();
        let mut reports = Vec::with_capacity(domains.len());

        for domain in &domains {
            tracing::info!("Processing {}...", domain);
            let report = process_domain(&self.lookup, domain, now, drop_delay_days).await;
            tracing::debug!(domain = %domain, status = %report.status, "domain processed");
            reports.push(report);
        }

        Ok(ReportBatch {
            generated_at: now,
            reports,
        })
    }

    async fn load(&self, batch: &ReportBatch) -> Result<String> {
        let output_path = self.config.output_path();
        let format = self.config.report_format();

        tracing::debug!(
            "Rendering {} rows as {:?} for {}",
            batch.reports.len(),
            format,
            output_path
        );

        let data = render(format, &batch.reports).map_err(|e| ReportError::WriteError {
            path: output_path.to_string(),
            message: e.to_string(),
        })?;

        self.storage
            .write_file(output_path, &data)
            .await
            .map_err(|e| ReportError::WriteError {
                path: output_path.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!("Report saved ({} bytes)", data.len());
        Ok(output_path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        DateField, DateValue, DomainStatus, LookupBackend, RawWhoisRecord, ReportFormat,
    };
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        read_only: bool,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &[u8]) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
                read_only: false,
            }
        }

        fn read_only(mut self) -> Self {
            self.read_only = true;
            self
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ReportError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.read_only {
                return Err(ReportError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "file is locked",
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        input_path: String,
        output_path: String,
        drop_delay_days: i64,
    }

    impl MockConfig {
        fn new(output_path: &str) -> Self {
            Self {
                input_path: "domains.txt".to_string(),
                output_path: output_path.to_string(),
                drop_delay_days: 30,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn drop_delay_days(&self) -> i64 {
            self.drop_delay_days
        }

        fn report_format(&self) -> ReportFormat {
            ReportFormat::from_path(&self.output_path)
        }

        fn lookup_backend(&self) -> LookupBackend {
            LookupBackend::Whois
        }

        fn lookup_timeout(&self) -> Duration {
            Duration::from_secs(1)
        }

        fn rdap_endpoint(&self) -> &str {
            "http://127.0.0.1"
        }
    }

    /// Answers from a fixed table; unknown domains fail like a network error.
    #[derive(Default)]
    struct MockLookup {
        records: HashMap<String, RawWhoisRecord>,
        not_found: Vec<String>,
        seen: std::sync::Mutex<Vec<String>>,
    }

    impl MockLookup {
        fn with_record(mut self, domain: &str, expiration: &str) -> Self {
            self.records.insert(
                domain.to_string(),
                RawWhoisRecord {
                    creation_date: DateField::Single(DateValue::Text("2010-01-01".to_string())),
                    expiration_date: DateField::Single(DateValue::Text(expiration.to_string())),
                },
            );
            self
        }

        fn with_not_found(mut self, domain: &str) -> Self {
            self.not_found.push(domain.to_string());
            self
        }
    }

    #[async_trait]
    impl WhoisLookup for MockLookup {
        async fn lookup(&self, domain: &DomainName) -> Result<RawWhoisRecord> {
            self.seen.lock().unwrap().push(domain.to_string());
            if self.not_found.iter().any(|d| d == domain.as_str()) {
                return Err(ReportError::DomainNotFound {
                    domain: domain.to_string(),
                });
            }
            self.records
                .get(domain.as_str())
                .cloned()
                .ok_or_else(|| ReportError::LookupError {
                    domain: domain.to_string(),
                    message: "connection reset".to_string(),
                })
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_extract_reads_non_blank_lines() {
        let storage = MockStorage::with_file("domains.txt", b"example.com\n\n  rust-lang.org \n   \n");
        let pipeline = WhoisPipeline::new(storage, MockConfig::new("out.csv"), MockLookup::default());

        let domains = pipeline.extract().await.unwrap();

        let names: Vec<&str> = domains.iter().map(|d| d.as_str()).collect();
        assert_eq!(names, vec!["example.com", "rust-lang.org"]);
    }

    #[tokio::test]
    async fn test_extract_missing_input_is_input_error() {
        let storage = MockStorage::with_file("other.txt", b"example.com\n");
        let pipeline = WhoisPipeline::new(storage, MockConfig::new("out.csv"), MockLookup::default());

        let err = pipeline.extract().await.unwrap_err();

        match err {
            ReportError::InputError { path, source } => {
                assert_eq!(path, "domains.txt");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extract_invalid_utf8_is_input_error() {
        let storage = MockStorage::with_file("domains.txt", &[0xff, 0xfe, b'\n']);
        let pipeline = WhoisPipeline::new(storage, MockConfig::new("out.csv"), MockLookup::default());

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, ReportError::InputError { .. }));
    }

    #[tokio::test]
    async fn test_transform_keeps_order_and_absorbs_failures() {
        let lookup = MockLookup::default()
            .with_record("taken.com", "2030-01-01")
            .with_record("lapsed.com", "2023-01-01")
            .with_not_found("free.com");
        let storage = MockStorage::with_file("domains.txt", b"");
        let pipeline = WhoisPipeline::new(storage, MockConfig::new("out.csv"), lookup);

        let domains = ["taken.com", "broken.com", "lapsed.com", "free.com"]
            .iter()
            .filter_map(|d| DomainName::parse(d))
            .collect();
        let batch = pipeline.transform(domains, now()).await.unwrap();

        let names: Vec<&str> = batch.reports.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(names, vec!["taken.com", "broken.com", "lapsed.com", "free.com"]);

        let statuses: Vec<DomainStatus> = batch.reports.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                DomainStatus::Taken,
                DomainStatus::Available,
                DomainStatus::Available,
                DomainStatus::Available
            ]
        );
        assert_eq!(batch.reports[1].text_row()[1..6], ["unknown"; 5]);
        assert_eq!(batch.generated_at, now());
        assert_eq!(batch.available_count(), 3);
        assert_eq!(batch.taken_count(), 1);
        assert_eq!(
            *pipeline.lookup.seen.lock().unwrap(),
            vec!["taken.com", "broken.com", "lapsed.com", "free.com"]
        );
    }

    #[tokio::test]
    async fn test_load_writes_csv() {
        let storage = MockStorage::with_file("domains.txt", b"");
        let lookup = MockLookup::default().with_record("taken.com", "2030-01-01");
        let pipeline = WhoisPipeline::new(storage.clone(), MockConfig::new("report.csv"), lookup);

        let domains = vec![DomainName::parse("taken.com").unwrap()];
        let batch = pipeline.transform(domains, now()).await.unwrap();
        let output = pipeline.load(&batch).await.unwrap();

        assert_eq!(output, "report.csv");
        let data = storage.get_file("report.csv").await.unwrap();
        let text = String::from_utf8(data).unwrap();
        assert!(text.starts_with("Domain,Registration Date"));
        assert!(text.contains("taken.com,2010-01-01,2030-01-01,in 2192 days,5113,in 2222 days,taken"));
    }

    #[tokio::test]
    async fn test_load_failure_is_write_error_and_keeps_batch() {
        let storage = MockStorage::with_file("domains.txt", b"").read_only();
        let pipeline = WhoisPipeline::new(
            storage,
            MockConfig::new("whois_results.xlsx"),
            MockLookup::default(),
        );

        let domains = vec![DomainName::parse("unknown.com").unwrap()];
        let batch = pipeline.transform(domains, now()).await.unwrap();
        let err = pipeline.load(&batch).await.unwrap_err();

        match err {
            ReportError::WriteError { path, message } => {
                assert_eq!(path, "whois_results.xlsx");
                assert!(message.contains("locked"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(batch.reports.len(), 1);
    }
}
