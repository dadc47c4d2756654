//! Caching primitives.
//!
//! Only a timestamped map lives here: entries carry the instant they were
//! stored and every read performs the TTL check inline against a caller
//! supplied `now`, which keeps expiry testable with a mock clock.

pub mod ttl_map;

pub use ttl_map::TtlMap;
