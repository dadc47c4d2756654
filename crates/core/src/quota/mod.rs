//! Storage quota aggregation across linked accounts.

pub mod aggregator;
pub mod ports;
pub mod service;

pub use aggregator::{aggregate, QuotaSelection};
pub use service::QuotaService;
