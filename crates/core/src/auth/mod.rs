//! Credential lifecycle: hands out valid access tokens per connection.

pub mod ports;
pub mod token_lifecycle;

pub use token_lifecycle::TokenLifecycle;
