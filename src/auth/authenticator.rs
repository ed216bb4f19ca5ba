//! Authenticator implementation
//!
//! Handles applying authentication to requests and caching the app-only token.

use super::types::{AuthConfig, CachedToken};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Cached app-only token
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),
            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token)),
            AuthConfig::AppOnly { .. } => {
                let token = self.get_or_fetch_token().await?;
                Ok(req.bearer_auth(token))
            }
        }
    }

    /// Get a valid token, fetching one if necessary
    async fn get_or_fetch_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Double-check after acquiring write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_app_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Fetch an app-only token using the client credentials grant
    async fn fetch_app_token(&self) -> Result<CachedToken> {
        let AuthConfig::AppOnly {
            token_url,
            consumer_key,
            consumer_secret,
        } = &self.config
        else {
            return Err(Error::auth("Token fetch not supported for this auth type"));
        };

        let response = self
            .http_client
            .post(token_url)
            .basic_auth(consumer_key, Some(consumer_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            // Retried like any other unexpected status
            return Err(Error::http_status(status, body));
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        if let Some(kind) = &token_response.token_type {
            if !kind.eq_ignore_ascii_case("bearer") {
                return Err(Error::auth(format!("Unexpected token type: {kind}")));
            }
        }

        debug!(token_url = %token_url, "obtained app-only token");
        Ok(token_response.into_cached_token())
    }

    /// Clear the cached token (forces a fetch on the next request)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    token_type: Option<String>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}
