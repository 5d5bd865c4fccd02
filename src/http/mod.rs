//! HTTP client module
//!
//! Provides the HTTP client with retry, rate limiting, and backoff strategies.
//!
//! # Features
//!
//! - **Automatic Retries**: Connection failures, timeouts, 429 and 5xx are retried with backoff
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **TLS**: Certificate verification on unless explicitly disabled

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, USER_AGENT};
pub use rate_limit::RateLimiter;
