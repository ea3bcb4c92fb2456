pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{DomainName, DomainReport, ReportBatch};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, WhoisLookup};
pub use crate::utils::error::Result;
