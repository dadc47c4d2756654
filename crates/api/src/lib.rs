//! # DocPulse App
//!
//! Application layer - commands and the CLI entry point.
//!
//! This crate contains:
//! - Commands (front end → services bridge)
//! - Application context (dependency injection)
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
