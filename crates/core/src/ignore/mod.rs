//! Ignore-set resolution: folder-name patterns to excluded folder IDs.

pub mod ports;
pub mod resolver;

pub use resolver::IgnoreSetResolver;
