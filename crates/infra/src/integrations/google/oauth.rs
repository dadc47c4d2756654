//! OAuth refresh grant against the Google token endpoint.

use async_trait::async_trait;
use docpulse_core::TokenRefresher;
use docpulse_domain::{DocPulseError, ProviderConfig, RefreshFailure, RefreshedToken, Result};
use reqwest::{Method, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::types::{TokenErrorResponse, TokenResponse};
use crate::http::HttpClient;

const INVALID_GRANT: &str = "invalid_grant";

/// [`TokenRefresher`] backed by the provider's token endpoint.
pub struct GoogleTokenRefresher {
    http: HttpClient,
    token_endpoint: Url,
    client_id: String,
    client_secret: String,
}

impl GoogleTokenRefresher {
    /// # Errors
    /// Returns `DocPulseError::Config` when the client credentials are not
    /// configured or the endpoint is not a valid URL.
    pub fn new(http: HttpClient, config: &ProviderConfig) -> Result<Self> {
        let client_id = config
            .client_id
            .clone()
            .ok_or_else(|| DocPulseError::Config("provider.client_id is not set".into()))?;
        let client_secret = config
            .client_secret
            .clone()
            .ok_or_else(|| DocPulseError::Config("provider.client_secret is not set".into()))?;
        let token_endpoint = Url::parse(&config.token_endpoint).map_err(|e| {
            DocPulseError::Config(format!("invalid token endpoint '{}': {e}", config.token_endpoint))
        })?;

        Ok(Self { http, token_endpoint, client_id, client_secret })
    }
}

#[async_trait]
impl TokenRefresher for GoogleTokenRefresher {
    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &str) -> std::result::Result<RefreshedToken, RefreshFailure> {
        let request = self.http.request(Method::POST, self.token_endpoint.clone()).form(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ]);

        let reply =
            self.http.send(request).await.map_err(|e| RefreshFailure::Transient(e.to_string()))?;
        let (status, body) = (reply.status, reply.text());

        if status.is_success() {
            let token: TokenResponse = serde_json::from_str(&body)
                .map_err(|e| RefreshFailure::Transient(format!("malformed token response: {e}")))?;
            debug!(expires_in = token.expires_in, rotated = token.refresh_token.is_some(), "refresh grant accepted");
            return Ok(RefreshedToken {
                access_token: token.access_token,
                expires_in_secs: token.expires_in,
                refresh_token: token.refresh_token,
            });
        }

        Err(classify_failure(status, &body))
    }
}

fn classify_failure(status: StatusCode, body: &str) -> RefreshFailure {
    if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        return RefreshFailure::Transient(format!("token endpoint returned {status}"));
    }

    let error: TokenErrorResponse = serde_json::from_str(body).unwrap_or_default();
    let detail = error.error_description.clone().unwrap_or_else(|| error.error.clone());

    if error.error == INVALID_GRANT {
        RefreshFailure::InvalidGrant(detail)
    } else if error.error.is_empty() {
        RefreshFailure::Rejected(format!("token endpoint returned {status}"))
    } else {
        RefreshFailure::Rejected(format!("{status}: {detail}"))
    }
}
