//! Activity pipeline: the service callers use for every file view.

pub mod hydrate;
pub mod service;

pub use service::{ActivityService, AggregatedFiles, ConnectionFailure};
