//! Shared helpers for adapter tests against a local `wiremock` server.

#![allow(dead_code)]

use std::time::Duration;

use docpulse_domain::ProviderConfig;
use docpulse_infra::{GoogleDriveSource, GoogleTokenRefresher, HttpClient};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const ACCESS_TOKEN: &str = "ya29.test-access";
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Provider configuration with every endpoint pointed at `server`.
pub fn provider_config(server: &MockServer) -> ProviderConfig {
    ProviderConfig {
        token_endpoint: format!("{}/token", server.uri()),
        drive_api_base: format!("{}/drive/v3", server.uri()),
        activity_api_base: format!("{}/v2", server.uri()),
        people_api_base: format!("{}/v1", server.uri()),
        client_id: Some("client-id".into()),
        client_secret: Some("client-secret".into()),
        request_timeout_secs: 5,
        max_attempts: 1,
    }
}

pub fn http() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .base_backoff(Duration::from_millis(5))
        .build()
        .expect("http client")
}

pub fn drive(server: &MockServer) -> GoogleDriveSource {
    GoogleDriveSource::new(http(), &provider_config(server)).expect("drive source")
}

pub fn refresher(server: &MockServer) -> GoogleTokenRefresher {
    GoogleTokenRefresher::new(http(), &provider_config(server)).expect("token refresher")
}

/// A Drive v3 file resource with the fields the adapter reads.
pub fn drive_file(id: &str, name: &str, modified: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": "application/pdf",
        "size": "1024",
        "modifiedTime": modified,
        "parents": ["root"],
        "owners": [{"displayName": "Ana", "emailAddress": "ana@example.com"}],
        "permissions": [{"type": "user", "role": "owner"}],
        "shared": false,
        "ownedByMe": true
    })
}

pub fn drive_folder(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": FOLDER_MIME,
        "modifiedTime": "2024-01-01T00:00:00Z"
    })
}

/// A Drive Activity entry targeting one file.
pub fn activity(action: Value, file_id: &str, timestamp: &str, person: &str) -> Value {
    json!({
        "primaryActionDetail": action,
        "actors": [{"user": {"knownUser": {"personName": person}}}],
        "targets": [{"driveItem": {"name": format!("items/{file_id}")}}],
        "timestamp": timestamp
    })
}
