// Domain layer: report models, ports and the pure normalization rules.

pub mod dates;
pub mod model;
pub mod ports;
pub mod services;
