use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Cannot read input file {path}: {source}")]
    InputError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write report to {path}: {message}")]
    WriteError { path: String, message: String },

    #[error("WHOIS lookup failed for {domain}: {message}")]
    LookupError { domain: String, message: String },

    #[error("No registration record found for {domain}")]
    DomainNotFound { domain: String },

    #[error("Timed out during {operation} for {domain}")]
    Timeout { domain: String, operation: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Lookup,
    Output,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::InputError { .. } => ErrorCategory::Input,
            ReportError::LookupError { .. }
            | ReportError::DomainNotFound { .. }
            | ReportError::Timeout { .. }
            | ReportError::ApiError(_) => ErrorCategory::Lookup,
            ReportError::WriteError { .. }
            | ReportError::CsvError(_)
            | ReportError::XlsxError(_) => ErrorCategory::Output,
            ReportError::ConfigError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ReportError::IoError(_) => ErrorCategory::Internal,
        }
    }

    /// Per-domain lookup problems are absorbed into the report, so they rank low.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::InputError { .. } => {
                "Check that the domain list exists and is readable UTF-8 text"
            }
            ReportError::WriteError { .. } => {
                "Close the report if it is open in a spreadsheet program, or choose another --output path"
            }
            ReportError::Timeout { .. } => "Raise the lookup timeout or try again later",
            ReportError::DomainNotFound { .. } => "The domain appears to be unregistered",
            ReportError::LookupError { .. } | ReportError::ApiError(_) => {
                "Check network access to the WHOIS/RDAP servers"
            }
            ReportError::CsvError(_) | ReportError::XlsxError(_) => {
                "Check the output format and file extension"
            }
            ReportError::ConfigError { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. } => {
                "Review the command line flags or the TOML configuration file"
            }
            ReportError::IoError(_) => "Re-run with --verbose for more detail",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::InputError { path, .. } => {
                format!("Could not read the domain list '{}'", path)
            }
            ReportError::WriteError { path, .. } => {
                format!("Could not save the report to '{}'", path)
            }
            other => other.to_string(),
        }
    }

    /// Exit code for the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
