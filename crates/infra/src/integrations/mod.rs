//! External provider integrations.

pub mod google;
