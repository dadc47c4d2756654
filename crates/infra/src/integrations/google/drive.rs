//! Google Drive adapter
//!
//! Implements [`DriveSource`] over Drive v3 (listing, point lookup, folder
//! search), Drive Activity v2 (event log) and People v1 (principal names),
//! and [`QuotaSource`] over `about`.

use std::collections::HashMap;

use async_trait::async_trait;
use docpulse_core::{DriveSource, QuotaSource, QuotaUsage};
use docpulse_domain::{
    ActivityEvent, ActivityQuery, DocPulseError, FileRecord, ListingQuery, ProviderConfig, Result,
};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::normalize::{activity_events, file_record, quota_usage};
use super::query::{activity_filter, folder_search_q, list_fields, listing_q, order_by, FILE_FIELDS};
use super::types::{
    About, ActivityQueryRequest, ActivityQueryResponse, DriveFile, DriveFileList,
    PeopleBatchResponse,
};
use crate::errors::status_error;
use crate::http::HttpClient;

const PEOPLE_PREFIX: &str = "people/";
const FOLDER_PAGE_SIZE: u32 = 100;

pub struct GoogleDriveSource {
    http: HttpClient,
    drive_base: String,
    activity_base: String,
    people_base: String,
}

impl GoogleDriveSource {
    /// # Errors
    /// Returns `DocPulseError::Config` when an API base is not a valid URL.
    pub fn new(http: HttpClient, config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            http,
            drive_base: base_url(&config.drive_api_base)?,
            activity_base: base_url(&config.activity_api_base)?,
            people_base: base_url(&config.people_api_base)?,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, context: &str) -> Result<T> {
        let reply = self.http.send(request).await?;
        if !reply.is_success() {
            return Err(status_error(reply.status, context, &reply.text()));
        }
        reply.json()
    }

    /// Follow `nextPageToken` until `max_results` records or the last page.
    async fn list_pages(
        &self,
        access_token: &str,
        q: &str,
        order: Option<&str>,
        page_size: u32,
        max_results: usize,
    ) -> Result<Vec<FileRecord>> {
        let url = format!("{}/files", self.drive_base);
        let fields = list_fields();
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let remaining = max_results.saturating_sub(records.len());
            let size = u32::try_from(remaining).unwrap_or(u32::MAX).min(page_size.max(1));
            let mut params: Vec<(&str, String)> = vec![
                ("q", q.to_string()),
                ("fields", fields.clone()),
                ("pageSize", size.to_string()),
                ("spaces", "drive".to_string()),
            ];
            if let Some(order) = order {
                params.push(("orderBy", order.to_string()));
            }
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let request = self.http.request(Method::GET, &url).bearer_auth(access_token).query(&params);
            let page: DriveFileList = self.fetch(request, "files.list").await?;

            records.extend(page.files.into_iter().filter_map(file_record));
            page_token = page.next_page_token;
            if page_token.is_none() || records.len() >= max_results {
                break;
            }
        }

        records.truncate(max_results);
        Ok(records)
    }
}

#[async_trait]
impl DriveSource for GoogleDriveSource {
    #[instrument(skip(self, access_token, query), fields(since = %query.since))]
    async fn query_activity(
        &self,
        access_token: &str,
        query: &ActivityQuery,
    ) -> Result<Vec<ActivityEvent>> {
        let url = format!("{}/activity:query", self.activity_base);
        let filter = activity_filter(query);
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let body = ActivityQueryRequest {
                page_size: query.page_size.max(1),
                filter: filter.clone(),
                page_token: page_token.take(),
            };
            let request = self.http.request(Method::POST, &url).bearer_auth(access_token).json(&body);
            let page: ActivityQueryResponse = self.fetch(request, "activity.query").await?;

            events.extend(page.activities.into_iter().flat_map(activity_events));
            page_token = page.next_page_token;
            if page_token.is_none() || events.len() >= query.max_results {
                break;
            }
        }

        debug!(events = events.len(), "activity log queried");
        Ok(events)
    }

    #[instrument(skip(self, access_token, query), fields(order = ?query.order))]
    async fn list_files(&self, access_token: &str, query: &ListingQuery) -> Result<Vec<FileRecord>> {
        let records = self
            .list_pages(
                access_token,
                &listing_q(query),
                Some(order_by(query.order)),
                query.page_size,
                query.max_results,
            )
            .await?;
        debug!(records = records.len(), "files listed");
        Ok(records)
    }

    #[instrument(skip(self, access_token))]
    async fn get_file(&self, access_token: &str, file_id: &str) -> Result<Option<FileRecord>> {
        let url = format!("{}/files/{}", self.drive_base, file_id);
        let request = self
            .http
            .request(Method::GET, &url)
            .bearer_auth(access_token)
            .query(&[("fields", FILE_FIELDS)]);

        match self.fetch::<DriveFile>(request, "files.get").await {
            Ok(file) => Ok(file_record(file)),
            Err(DocPulseError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, access_token, names), fields(names = names.len()))]
    async fn find_folders_by_name(
        &self,
        access_token: &str,
        names: &[String],
    ) -> Result<Vec<FileRecord>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.list_pages(access_token, &folder_search_q(names), None, FOLDER_PAGE_SIZE, usize::MAX)
            .await
    }

    #[instrument(skip(self, access_token, principal_ids), fields(ids = principal_ids.len()))]
    async fn resolve_principals(
        &self,
        access_token: &str,
        principal_ids: &[String],
    ) -> Result<HashMap<String, String>> {
        if principal_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut params: Vec<(&str, String)> = principal_ids
            .iter()
            .map(|id| ("resourceNames", resource_name(id)))
            .collect();
        params.push(("personFields", "names".to_string()));

        let url = format!("{}/people:batchGet", self.people_base);
        let request = self.http.request(Method::GET, &url).bearer_auth(access_token).query(&params);
        let batch: PeopleBatchResponse = self.fetch(request, "people.batchGet").await?;

        let by_resource: HashMap<String, String> = batch
            .responses
            .into_iter()
            .filter_map(|response| {
                let resource = response.requested_resource_name?;
                let name = response
                    .person?
                    .names
                    .into_iter()
                    .find_map(|name| name.display_name.filter(|n| !n.is_empty()))?;
                Some((resource, name))
            })
            .collect();

        Ok(principal_ids
            .iter()
            .filter_map(|id| by_resource.get(&resource_name(id)).map(|name| (id.clone(), name.clone())))
            .collect())
    }
}

#[async_trait]
impl QuotaSource for GoogleDriveSource {
    #[instrument(skip_all)]
    async fn fetch_usage(&self, access_token: &str) -> Result<QuotaUsage> {
        let url = format!("{}/about", self.drive_base);
        let request = self
            .http
            .request(Method::GET, &url)
            .bearer_auth(access_token)
            .query(&[("fields", "user,storageQuota")]);
        let about: About = self.fetch(request, "about.get").await?;
        quota_usage(about)
    }
}

/// Validate an API base and strip any trailing slash.
fn base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw)
        .map_err(|e| DocPulseError::Config(format!("invalid API base '{raw}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DocPulseError::Config(format!("API base '{raw}' is not http(s)")));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Actor IDs from the activity log already carry the `people/` prefix.
fn resource_name(id: &str) -> String {
    if id.starts_with(PEOPLE_PREFIX) {
        id.to_string()
    } else {
        format!("{PEOPLE_PREFIX}{id}")
    }
}
