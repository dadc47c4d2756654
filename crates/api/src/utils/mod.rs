//! Command-layer helpers.

pub mod logging;
