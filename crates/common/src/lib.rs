//! Modular common utilities shared across DocPulse crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: wall-clock abstraction and the timestamped TTL map
//! - `runtime`: async infrastructure (keyed single-flight locks)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod cache;
#[cfg(feature = "foundation")]
pub mod time;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod sync;

#[cfg(feature = "foundation")]
pub use cache::TtlMap;
#[cfg(feature = "runtime")]
pub use sync::KeyedLock;
#[cfg(feature = "foundation")]
pub use time::{Clock, MockClock, SystemClock};
