//! Shared HTTP client.

mod client;

pub use client::{is_throttled, HttpClient, HttpClientBuilder, HttpReply};
