// Adapters layer: concrete implementations for external systems (storage, lookups, report files).

pub mod rdap;
pub mod report;
pub mod storage;
pub mod whois;
pub mod whois_parser;

use crate::domain::model::LookupBackend;
use crate::domain::ports::{ConfigProvider, WhoisLookup};
use crate::utils::error::Result;

/// Builds the lookup backend selected by the configuration.
pub fn build_lookup<C: ConfigProvider + ?Sized>(config: &C) -> Result<Box<dyn WhoisLookup>> {
    let lookup: Box<dyn WhoisLookup> = match config.lookup_backend() {
        LookupBackend::Whois => Box::new(whois::WhoisClient::new(config.lookup_timeout())),
        LookupBackend::Rdap => Box::new(rdap::RdapClient::new(
            config.rdap_endpoint(),
            config.lookup_timeout(),
        )?),
    };
    Ok(lookup)
}
