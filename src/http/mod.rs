//! HTTP client module
//!
//! Provides the API client seam used by the page fetcher.
//!
//! # Features
//!
//! - **One request per call**: `ApiClient` returns status and raw body
//! - **Rate Limiting**: Token bucket throttle using governor
//! - **Authentication**: App-only bearer token via the auth module

mod client;
mod rate_limit;

pub use client::{ApiClient, ApiResponse, HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
