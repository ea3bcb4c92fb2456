use crate::adapters::rdap::DEFAULT_RDAP_ENDPOINT;
use crate::config::{validate_run_settings, DEFAULT_DROP_DELAY_DAYS, DEFAULT_INPUT, DEFAULT_OUTPUT};
use crate::core::ConfigProvider;
use crate::domain::model::{LookupBackend, ReportFormat};
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::Validate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

static ENV_VAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<ReportFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub drop_delay_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupConfig {
    pub backend: Option<LookupBackend>,
    pub timeout_seconds: Option<u64>,
    pub rdap_endpoint: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| ReportError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DOMAIN_LIST})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.input.path.as_deref().unwrap_or(DEFAULT_INPUT)
    }

    fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT)
    }

    fn drop_delay_days(&self) -> i64 {
        self.report.drop_delay_days.unwrap_or(DEFAULT_DROP_DELAY_DAYS)
    }

    fn report_format(&self) -> ReportFormat {
        self.output
            .format
            .unwrap_or_else(|| ReportFormat::from_path(self.output_path()))
    }

    fn lookup_backend(&self) -> LookupBackend {
        self.lookup.backend.unwrap_or_default()
    }

    fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn rdap_endpoint(&self) -> &str {
        self.lookup
            .rdap_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_RDAP_ENDPOINT)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_run_settings(self)
    }
}
