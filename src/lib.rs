pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{build_lookup, storage::LocalStorage};
pub use core::{engine::ReportEngine, pipeline::WhoisPipeline};
pub use utils::error::{ReportError, Result};
