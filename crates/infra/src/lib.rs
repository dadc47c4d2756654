//! # DocPulse Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - HTTP client with retry support
//! - Google Drive, Drive Activity, People and OAuth adapters
//! - In-memory credential, ignore-pattern and quota stores
//! - Configuration loading and tracing initialization
//!
//! ## Architecture
//! - Implements traits defined in `docpulse-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod logging;
pub mod store;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, HttpReply};
pub use integrations::google::{GoogleDriveSource, GoogleTokenRefresher};
pub use logging::init_tracing;
pub use store::{ConfiguredIgnorePatterns, InMemoryCredentialStore, InMemoryQuotaStore};
