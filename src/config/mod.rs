#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_file_extension, validate_path, validate_positive_number, validate_range, validate_url,
};

pub const DEFAULT_INPUT: &str = "domains.txt";
pub const DEFAULT_OUTPUT: &str = "whois_results.xlsx";
pub const DEFAULT_DROP_DELAY_DAYS: i64 = 30;
pub const MAX_DROP_DELAY_DAYS: i64 = 365;

/// Checks shared by every configuration source.
pub fn validate_run_settings<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_path("input", config.input_path())?;
    validate_path("output", config.output_path())?;
    validate_file_extension("output", config.output_path(), &["xlsx", "csv"])?;
    validate_range(
        "drop_delay_days",
        config.drop_delay_days(),
        0,
        MAX_DROP_DELAY_DAYS,
    )?;
    validate_positive_number("timeout_seconds", config.lookup_timeout().as_secs(), 1)?;
    validate_url("rdap_endpoint", config.rdap_endpoint())?;
    Ok(())
}
