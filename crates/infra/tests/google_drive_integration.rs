//! Google Drive adapter against a mocked provider.

mod support;

use std::time::Duration;

use chrono::{TimeZone, Utc};
use docpulse_core::{DriveSource, QuotaSource};
use docpulse_domain::{
    ActionKind, ActivityQuery, DocPulseError, FileKind, ListingOrder, ListingQuery,
};
use docpulse_infra::{GoogleDriveSource, HttpClient};
use serde_json::json;
use support::{activity, drive, drive_file, drive_folder, provider_config, ACCESS_TOKEN};
use wiremock::matchers::{
    body_partial_json, header, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing(max_results: usize) -> ListingQuery {
    ListingQuery {
        owned_by_me: Some(true),
        order: ListingOrder::LargestFirst,
        page_size: 2,
        max_results,
        ..ListingQuery::default()
    }
}

#[tokio::test]
async fn list_files_follows_page_tokens_and_sends_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .and(query_param("orderBy", "quotaBytesUsed desc"))
        .and(query_param(
            "q",
            "trashed = false and 'me' in owners and mimeType != 'application/vnd.google-apps.folder'",
        ))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                drive_file("a", "a.pdf", "2024-06-01T10:00:00Z"),
                drive_file("b", "b.pdf", "2024-06-01T11:00:00Z")
            ],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [drive_file("c", "c.pdf", "2024-06-01T12:00:00Z")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = drive(&server).list_files(ACCESS_TOKEN, &listing(10)).await.unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(records[0].size_bytes, Some(1024));
    assert!(records[0].owned_by_me);
}

#[tokio::test]
async fn list_files_stops_at_max_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [
                drive_file("a", "a.pdf", "2024-06-01T10:00:00Z"),
                drive_file("b", "b.pdf", "2024-06-01T11:00:00Z")
            ],
            "nextPageToken": "more"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = drive(&server).list_files(ACCESS_TOKEN, &listing(2)).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn unauthorized_listing_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid credentials"))
        .mount(&server)
        .await;

    let err = drive(&server).list_files(ACCESS_TOKEN, &listing(5)).await.unwrap_err();
    match err {
        DocPulseError::Auth(msg) => assert!(msg.contains("files.list")),
        other => panic!("expected auth error, got {other:?}"),
    }
}

const USER_RATE_LIMITED: &str =
    r#"{"error":{"code":403,"message":"User rate limit exceeded.","errors":[{"reason":"userRateLimitExceeded"}]}}"#;

#[tokio::test]
async fn throttled_listing_is_retried_after_the_hinted_delay() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string(USER_RATE_LIMITED))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [drive_file("a", "a.pdf", "2024-06-01T10:00:00Z")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let http = HttpClient::builder()
        .base_backoff(Duration::from_millis(5))
        .max_attempts(3)
        .build()
        .expect("http client");
    let source = GoogleDriveSource::new(http, &provider_config(&server)).expect("drive source");

    let records = source.list_files(ACCESS_TOKEN, &listing(5)).await.unwrap();
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn rate_limit_that_outlasts_attempts_is_not_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(403).set_body_string(USER_RATE_LIMITED))
        .mount(&server)
        .await;

    let err = drive(&server).list_files(ACCESS_TOKEN, &listing(5)).await.unwrap_err();
    assert!(matches!(err, DocPulseError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn malformed_listing_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"files\": ["))
        .mount(&server)
        .await;

    let err = drive(&server).list_files(ACCESS_TOKEN, &listing(5)).await.unwrap_err();
    assert!(matches!(err, DocPulseError::Provider(_)));
}

#[tokio::test]
async fn get_file_returns_none_for_deleted_files() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files/here"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(drive_file("here", "here.pdf", "2024-06-01T10:00:00Z")),
        )
        .mount(&server)
        .await;

    let source = drive(&server);
    assert!(source.get_file(ACCESS_TOKEN, "gone").await.unwrap().is_none());
    let found = source.get_file(ACCESS_TOKEN, "here").await.unwrap().unwrap();
    assert_eq!(found.name, "here.pdf");
}

#[tokio::test]
async fn query_activity_pages_through_the_event_log() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/activity:query"))
        .and(body_partial_json(json!({"pageToken": "t2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activities": [
                activity(json!({"rename": {}}), "f2", "2024-06-03T09:00:00Z", "people/2")
            ]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/activity:query"))
        .and(body_partial_json(json!({
            "pageSize": 50,
            "filter": "time >= \"2024-06-01T00:00:00.000Z\" AND detail.action_detail_case:(EDIT RENAME)"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "activities": [
                activity(json!({"edit": {}}), "f1", "2024-06-03T10:00:00Z", "people/1"),
                activity(json!({"settingsChange": {}}), "f9", "2024-06-03T10:00:00Z", "people/1")
            ],
            "nextPageToken": "t2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ActivityQuery {
        since: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        actions: vec![ActionKind::Edited, ActionKind::Renamed],
        page_size: 50,
        max_results: 100,
    };
    let events = drive(&server).query_activity(ACCESS_TOKEN, &query).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].file_id, "f1");
    assert_eq!(events[0].action, ActionKind::Edited);
    assert_eq!(events[1].action, ActionKind::Renamed);
    assert_eq!(events[1].actor_id.as_deref(), Some("people/2"));
}

#[tokio::test]
async fn find_folders_by_name_searches_folder_mime() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/files"))
        .and(query_param(
            "q",
            "mimeType = 'application/vnd.google-apps.folder' and trashed = false and (name = 'Archive')",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "files": [drive_folder("fold-1", "Archive")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = drive(&server);
    let folders = source.find_folders_by_name(ACCESS_TOKEN, &["Archive".to_string()]).await.unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0].kind, FileKind::Folder);

    assert!(source.find_folders_by_name(ACCESS_TOKEN, &[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn resolve_principals_maps_back_to_requested_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/people:batchGet"))
        .and(query_param("resourceNames", "people/1"))
        .and(query_param("resourceNames", "people/2"))
        .and(query_param("personFields", "names"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responses": [
                {"requestedResourceName": "people/1", "person": {"names": [{"displayName": "Ana Lima"}]}},
                {"requestedResourceName": "people/2", "status": {"code": 404}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let names = drive(&server)
        .resolve_principals(ACCESS_TOKEN, &["people/1".to_string(), "2".to_string()])
        .await
        .unwrap();

    assert_eq!(names.len(), 1);
    assert_eq!(names.get("people/1").map(String::as_str), Some("Ana Lima"));
}

#[tokio::test]
async fn fetch_usage_reads_about() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/drive/v3/about"))
        .and(query_param("fields", "user,storageQuota"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"displayName": "Ana", "emailAddress": "ana@example.com"},
            "storageQuota": {"limit": "1000", "usage": "250"}
        })))
        .mount(&server)
        .await;

    let usage = drive(&server).fetch_usage(ACCESS_TOKEN).await.unwrap();
    assert_eq!(usage.used_bytes, 250);
    assert_eq!(usage.limit_bytes, 1000);
    assert_eq!(usage.account_label, "ana@example.com");
}
