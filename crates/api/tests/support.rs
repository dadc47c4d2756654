//! Shared fixtures for command tests against a local `wiremock` server.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use docpulse_common::MockClock;
use docpulse_domain::{Config, ProviderConfig};
use docpulse_lib::AppContext;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap()
}

/// Configuration with every provider endpoint pointed at `server`.
pub fn config(server: &MockServer) -> Config {
    Config {
        provider: ProviderConfig {
            token_endpoint: format!("{}/token", server.uri()),
            drive_api_base: format!("{}/drive/v3", server.uri()),
            activity_api_base: format!("{}/v2", server.uri()),
            people_api_base: format!("{}/v1", server.uri()),
            client_id: Some("client-id".into()),
            client_secret: Some("client-secret".into()),
            request_timeout_secs: 5,
            max_attempts: 1,
        },
        ..Config::default()
    }
}

pub fn context(server: &MockServer) -> AppContext {
    AppContext::with_clock(config(server), Arc::new(MockClock::at(now())))
        .expect("application context")
}

/// Token endpoint that grants `access_token` for `refresh_token`.
pub async fn grant(server: &MockServer, refresh_token: &str, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(format!("refresh_token={refresh_token}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": access_token,
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

/// Token endpoint that rejects `refresh_token` as revoked.
pub async fn revoke(server: &MockServer, refresh_token: &str) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains(format!("refresh_token={refresh_token}")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Token has been expired or revoked."
        })))
        .mount(server)
        .await;
}

/// A Drive v3 file resource owned by the caller.
pub fn drive_file(id: &str, name: &str, size: u64, modified: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": "application/pdf",
        "size": size.to_string(),
        "modifiedTime": modified,
        "parents": ["root"],
        "owners": [{"displayName": "Ana", "emailAddress": "ana@example.com"}],
        "permissions": [{"type": "user", "role": "owner"}],
        "shared": false,
        "ownedByMe": true
    })
}
