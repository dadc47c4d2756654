//! Shared HTTP transport for the Google adapters.
//!
//! Replies are read in full before they are handed back, so a throttled
//! `403` can be told apart from a real permission failure by its body.

use std::time::Duration;

use docpulse_domain::{DocPulseError, ProviderConfig};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Error reasons Google APIs attach to a throttled `403`.
const RATE_LIMIT_REASONS: &[&str] = &["rateLimitExceeded", "userRateLimitExceeded"];

/// Longest wait accepted from a `Retry-After` header by default.
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(30);

/// True when the provider is asking the caller to slow down.
pub fn is_throttled(status: StatusCode, body: &str) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN && RATE_LIMIT_REASONS.iter().any(|r| body.contains(r)))
}

/// A provider response with its body already read.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// # Errors
    /// Returns `DocPulseError::Provider` when the body is not the expected JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DocPulseError> {
        serde_json::from_slice(&self.body).map_err(|e| InfraError::from(e).into())
    }

    fn throttled(&self) -> bool {
        is_throttled(self.status, &String::from_utf8_lossy(&self.body))
    }
}

#[derive(Debug, Clone, Copy)]
struct RetryPolicy {
    max_attempts: usize,
    base_backoff: Duration,
    max_wait: Duration,
}

impl RetryPolicy {
    /// Exponential delay before attempt `attempt + 1`, capped at `max_wait`.
    fn backoff(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift).min(self.max_wait)
    }

    /// The provider's own hint wins over the backoff schedule.
    fn delay(&self, attempt: usize, retry_after: Option<Duration>) -> Duration {
        retry_after.map_or_else(|| self.backoff(attempt), |wait| wait.min(self.max_wait))
    }
}

/// Reqwest client plus the retry policy every provider call shares.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    policy: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn new() -> Result<Self, DocPulseError> {
        Self::builder().build()
    }

    /// Client with the provider section's timeout and attempt count.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, DocPulseError> {
        Self::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .max_attempts(config.max_attempts)
            .user_agent(concat!("docpulse/", env!("CARGO_PKG_VERSION")))
            .build()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send `builder`, trying again on throttling, `5xx`, timeouts and
    /// connect failures while attempts remain.
    ///
    /// Any other reply, success or not, is returned for the caller to map.
    ///
    /// # Errors
    /// Returns `DocPulseError::Network` when the last attempt fails at the
    /// transport level, or `Internal` for a request body that cannot be cloned.
    pub async fn send(&self, builder: RequestBuilder) -> Result<HttpReply, DocPulseError> {
        let mut attempt = 1;

        loop {
            let request = builder
                .try_clone()
                .ok_or_else(|| DocPulseError::Internal("streaming request bodies cannot be retried".into()))?
                .build()
                .map_err(transport_error)?;
            let method = request.method().clone();
            let path = request.url().path().to_string();

            let outcome = self.exchange(request).await;
            let wait = match &outcome {
                Ok((reply, retry_after)) if reply.status.is_server_error() || reply.throttled() => {
                    Some(self.policy.delay(attempt, *retry_after))
                }
                Err(err) if err.is_timeout() || err.is_connect() => Some(self.policy.backoff(attempt)),
                _ => None,
            };

            match wait {
                Some(delay) if attempt < self.policy.max_attempts => {
                    match &outcome {
                        Ok((reply, _)) => {
                            warn!(attempt, %method, path, status = %reply.status, ?delay, "retrying provider call")
                        }
                        Err(err) => warn!(attempt, %method, path, error = %err, ?delay, "retrying provider call"),
                    }
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                _ => return outcome.map(|(reply, _)| reply).map_err(transport_error),
            }
        }
    }

    async fn exchange(&self, request: Request) -> Result<(HttpReply, Option<Duration>), reqwest::Error> {
        let response = self.client.execute(request).await?;
        let status = response.status();
        let retry_after = retry_after(response.headers());
        let body = response.bytes().await?.to_vec();
        debug!(%status, bytes = body.len(), "provider replied");
        Ok((HttpReply { status, body }, retry_after))
    }
}

/// Delay-seconds form of `Retry-After`; the HTTP-date form falls back to backoff.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

fn transport_error(err: reqwest::Error) -> DocPulseError {
    InfraError::from(err).into()
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    max_wait: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 1,
            base_backoff: Duration::from_millis(200),
            max_wait: DEFAULT_MAX_WAIT,
            user_agent: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts, the first one included.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    /// Upper bound on any single wait, whether from backoff or `Retry-After`.
    pub fn max_wait(mut self, wait: Duration) -> Self {
        self.max_wait = wait;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, DocPulseError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();
        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        let client = builder.build().map_err(transport_error)?;

        Ok(HttpClient {
            client,
            policy: RetryPolicy {
                max_attempts: self.max_attempts.max(1),
                base_backoff: self.base_backoff,
                max_wait: self.max_wait,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::header::HeaderValue;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const RATE_LIMITED_BODY: &str =
        r#"{"error":{"code":403,"errors":[{"domain":"usageLimits","reason":"userRateLimitExceeded"}]}}"#;

    fn client_with(attempts: usize, backoff: Duration) -> HttpClient {
        HttpClient::builder().base_backoff(backoff).max_attempts(attempts).build().expect("http client")
    }

    /// Mount a responder that serves `first` for the first `failures` calls
    /// and a `200 ok` after that.
    async fn flaky_server(
        failures: usize,
        first: ResponseTemplate,
        expected_calls: u64,
    ) -> (MockServer, Arc<AtomicUsize>) {
        let server = MockServer::start().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        Mock::given(method("GET"))
            .respond_with(move |_req: &wiremock::Request| -> ResponseTemplate {
                if counter.fetch_add(1, Ordering::SeqCst) < failures {
                    first.clone()
                } else {
                    ResponseTemplate::new(200).set_body_string("ok")
                }
            })
            .expect(expected_calls)
            .mount(&server)
            .await;
        (server, calls)
    }

    async fn get(client: &HttpClient, server: &MockServer) -> Result<HttpReply, DocPulseError> {
        client.send(client.request(Method::GET, server.uri())).await
    }

    #[tokio::test]
    async fn success_is_buffered_and_returned_once() {
        let (server, calls) = flaky_server(0, ResponseTemplate::new(500), 1).await;

        let reply = get(&client_with(3, Duration::from_millis(10)), &server).await.expect("reply");

        assert!(reply.is_success());
        assert_eq!(reply.text(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn server_errors_are_retried_until_success() {
        let (server, calls) = flaky_server(2, ResponseTemplate::new(503), 3).await;

        let reply = get(&client_with(3, Duration::from_millis(10)), &server).await.expect("reply");

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn too_many_requests_waits_for_retry_after_instead_of_backoff() {
        let throttled = ResponseTemplate::new(429).insert_header("Retry-After", "0");
        let (server, calls) = flaky_server(1, throttled, 2).await;
        let client = client_with(2, Duration::from_secs(60));

        let reply = tokio::time::timeout(Duration::from_secs(5), get(&client, &server))
            .await
            .expect("Retry-After: 0 should skip the 60s backoff")
            .expect("reply");

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rate_limited_forbidden_is_retried() {
        let throttled = ResponseTemplate::new(403).set_body_string(RATE_LIMITED_BODY);
        let (server, calls) = flaky_server(1, throttled, 2).await;

        let reply = get(&client_with(3, Duration::from_millis(10)), &server).await.expect("reply");

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn permission_denied_is_not_retried() {
        let denied = ResponseTemplate::new(403)
            .set_body_string(r#"{"error":{"code":403,"errors":[{"reason":"insufficientFilePermissions"}]}}"#);
        let (server, _) = flaky_server(5, denied, 1).await;

        let reply = get(&client_with(3, Duration::from_millis(10)), &server).await.expect("reply");

        assert_eq!(reply.status, StatusCode::FORBIDDEN);
        assert!(reply.text().contains("insufficientFilePermissions"));
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let (server, _) = flaky_server(5, ResponseTemplate::new(404), 1).await;

        let reply = get(&client_with(3, Duration::from_millis(10)), &server).await.expect("reply");

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn last_throttled_reply_is_returned_when_attempts_run_out() {
        let throttled = ResponseTemplate::new(429).insert_header("Retry-After", "0");
        let (server, _) = flaky_server(5, throttled, 2).await;

        let reply = get(&client_with(2, Duration::from_millis(10)), &server).await.expect("reply");

        assert_eq!(reply.status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn single_attempt_by_default() {
        let (server, _) = flaky_server(5, ResponseTemplate::new(500), 1).await;

        let client = HttpClient::new().expect("http client");
        let reply = get(&client, &server).await.expect("reply");

        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_with(2, Duration::from_millis(5));
        let result = client.send(client.request(Method::GET, format!("http://{addr}"))).await;

        match result {
            Err(DocPulseError::Network(msg)) => assert!(msg.to_lowercase().contains("http")),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn backoff_doubles_and_is_capped() {
        let client = HttpClient::builder()
            .base_backoff(Duration::from_millis(100))
            .max_wait(Duration::from_millis(300))
            .build()
            .unwrap();
        assert_eq!(client.policy.backoff(1), Duration::from_millis(100));
        assert_eq!(client.policy.backoff(2), Duration::from_millis(200));
        assert_eq!(client.policy.backoff(3), Duration::from_millis(300));
    }

    #[test]
    fn retry_after_hint_is_capped() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.policy.delay(1, Some(Duration::from_secs(3600))), DEFAULT_MAX_WAIT);
        assert_eq!(client.policy.delay(1, Some(Duration::from_secs(2))), Duration::from_secs(2));

        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static(" 7 "));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(7)));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }

    #[test]
    fn throttling_is_recognised_from_status_and_reason() {
        assert!(is_throttled(StatusCode::TOO_MANY_REQUESTS, ""));
        assert!(is_throttled(StatusCode::FORBIDDEN, RATE_LIMITED_BODY));
        assert!(is_throttled(StatusCode::FORBIDDEN, r#"{"reason":"rateLimitExceeded"}"#));
        assert!(!is_throttled(StatusCode::FORBIDDEN, r#"{"reason":"forbidden"}"#));
        assert!(!is_throttled(StatusCode::BAD_REQUEST, RATE_LIMITED_BODY));
    }
}
