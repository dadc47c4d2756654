//! Process-local port implementations.

mod memory;

pub use memory::{ConfiguredIgnorePatterns, InMemoryCredentialStore, InMemoryQuotaStore};
