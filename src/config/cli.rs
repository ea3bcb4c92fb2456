use crate::adapters::rdap::DEFAULT_RDAP_ENDPOINT;
use crate::config::{validate_run_settings, DEFAULT_DROP_DELAY_DAYS, DEFAULT_INPUT, DEFAULT_OUTPUT};
use crate::core::ConfigProvider;
use crate::domain::model::{LookupBackend, ReportFormat};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "whois-report")]
#[command(about = "Look up WHOIS registration dates for a list of domains and export a report")]
pub struct CliConfig {
    /// Domain list, one name per line
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: String,

    /// Report file (.xlsx or .csv)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Days between expiration and the domain becoming registrable again
    #[arg(long, default_value_t = DEFAULT_DROP_DELAY_DAYS, allow_negative_numbers = true)]
    pub drop_delay_days: i64,

    /// Report format; inferred from the output extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    #[arg(long, value_enum, default_value_t = LookupBackend::Whois)]
    pub backend: LookupBackend,

    #[arg(long, default_value = DEFAULT_RDAP_ENDPOINT)]
    pub rdap_endpoint: String,

    /// Per-step network timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }

    fn drop_delay_days(&self) -> i64 {
        self.drop_delay_days
    }

    fn report_format(&self) -> ReportFormat {
        self.format
            .unwrap_or_else(|| ReportFormat::from_path(&self.output))
    }

    fn lookup_backend(&self) -> LookupBackend {
        self.backend
    }

    fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn rdap_endpoint(&self) -> &str {
        &self.rdap_endpoint
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_run_settings(self)
    }
}
