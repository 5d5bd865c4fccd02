//! HTTP client with retry and rate limiting
//!
//! Provides the HTTP client every fleet API call goes through:
//! - Retries of transport failures, 429 and 5xx with configurable backoff
//! - Optional rate limiting
//! - Default headers (session token) on every request
//! - Certificate verification, disabled only by explicit opt-in

use super::rate_limit::RateLimiter;
use crate::error::{Error, Result};
use crate::types::{BackoffType, StringMap};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("fleetkit/", env!("CARGO_PKG_VERSION"));

/// Wait applied to a 429 without a usable `retry-after`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL relative paths are joined onto
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound on any retry delay, `retry-after` included
    pub max_backoff: Duration,
    /// How the delay grows between retries
    pub backoff_type: BackoffType,
    /// Requests per second cap, if any
    pub rate_limit: Option<u32>,
    /// Headers sent with every request
    pub default_headers: StringMap,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: None,
            default_headers: StringMap::new(),
            accept_invalid_certs: false,
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff strategy, first delay and cap
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Cap the request rate
    pub fn rate_limit(mut self, requests_per_second: u32) -> Self {
        self.config.rate_limit = Some(requests_per_second);
        self
    }

    /// Accept invalid TLS certificates. Only for lab arrays with self-signed certs.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Per-request additions on top of the client defaults
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: StringMap,
    /// Extra headers
    pub headers: StringMap,
    /// JSON body
    pub body: Option<Value>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Build a client from configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let rate_limiter = config.rate_limit.map(RateLimiter::per_second);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    /// Derive a client sharing this one's connection pool and rate limit,
    /// with an extra default header
    pub fn with_default_header(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut config = self.config.clone();
        config.default_headers.insert(key.into(), value.into());
        Self {
            client: self.client.clone(),
            config,
            rate_limiter: self.rate_limiter.clone(),
        }
    }

    /// GET with query parameters and headers
    pub async fn get_with_config(&self, path: &str, config: RequestConfig) -> Result<Response> {
        self.execute(Method::GET, path, config).await
    }

    /// POST a JSON body
    pub async fn post(&self, path: &str, body: Value) -> Result<Response> {
        self.execute(Method::POST, path, RequestConfig::new().json(body))
            .await
    }

    /// POST with query parameters, headers and optional body
    pub async fn post_with_config(&self, path: &str, config: RequestConfig) -> Result<Response> {
        self.execute(Method::POST, path, config).await
    }

    /// Send a request, retrying while the failure is retryable
    ///
    /// Any 4xx or 5xx left after retries is returned as an error carrying
    /// the response body.
    async fn execute(&self, method: Method, path: &str, config: RequestConfig) -> Result<Response> {
        let url = self.build_url(path);
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            let error = match self.build_request(&method, &url, &config).send().await {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_client_error() && !status.is_server_error() {
                        debug!("{method} {url} -> {}", status.as_u16());
                        return Ok(response);
                    }
                    status_error(response).await
                }
                Err(e) if e.is_timeout() => Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                },
                Err(e) => Error::Http(e),
            };

            if attempt >= max_retries || !error.is_retryable() {
                return Err(error);
            }

            let delay = match &error {
                Error::RateLimited {
                    retry_after_seconds,
                } => Duration::from_secs(*retry_after_seconds).min(self.config.max_backoff),
                _ => self.calculate_backoff(attempt),
            };
            warn!(
                "{method} {url} failed ({error}), attempt {}/{}, retrying in {delay:?}",
                attempt + 1,
                max_retries + 1
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn build_request(&self, method: &Method, url: &str, config: &RequestConfig) -> RequestBuilder {
        let mut req = self.client.request(method.clone(), url);

        for (key, value) in self.config.default_headers.iter().chain(&config.headers) {
            req = req.header(key.as_str(), value.as_str());
        }
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(body) = &config.body {
            req = req.json(body);
        }
        req
    }

    /// Join a relative path onto the base URL; absolute URLs pass through
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => path.to_string(),
        }
    }

    /// Delay before retry number `attempt + 1`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let initial = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt.saturating_add(1)),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };

        delay.min(self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("max_retries", &self.config.max_retries)
            .field("accept_invalid_certs", &self.config.accept_invalid_certs)
            .field("rate_limiter", &self.rate_limiter)
            .finish_non_exhaustive()
    }
}

/// Turn a 4xx/5xx response into an error, keeping the body for diagnostics
async fn status_error(response: Response) -> Error {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Error::RateLimited {
            retry_after_seconds: retry_after(&response),
        };
    }

    let body = response.text().await.unwrap_or_default();
    Error::http_status(status.as_u16(), body)
}

fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
