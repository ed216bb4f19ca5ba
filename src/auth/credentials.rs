//! Credential file handling and session creation
//!
//! The credential file is YAML keyed by the API product it was issued for:
//!
//! ```yaml
//! search_tweets_v2:
//!   endpoint: https://api.twitter.com/2/tweets/search/all
//!   consumer_key: <CONSUMER_KEY>
//!   consumer_secret: <CONSUMER_SECRET>
//! ```

use super::types::{AuthConfig, Credentials};
use crate::config::HarvestSettings;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Endpoint recorded in newly written credential files
const DEFAULT_ENDPOINT: &str = "https://api.twitter.com/2/tweets/search/all";

/// On-disk layout of the credential file
#[derive(Debug, Serialize, Deserialize)]
struct CredentialFile {
    search_tweets_v2: Credentials,
}

/// Read credentials from a YAML file
pub fn read_credentials(path: impl AsRef<Path>) -> Result<Credentials> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .map_err(|e| Error::credentials(path.display().to_string(), e.to_string()))?;
    let file: CredentialFile = serde_yaml::from_str(&contents)
        .map_err(|e| Error::credentials(path.display().to_string(), e.to_string()))?;

    let creds = file.search_tweets_v2;
    if creds.consumer_key.is_empty() {
        return Err(Error::missing_field("consumer_key"));
    }
    if creds.consumer_secret.is_empty() {
        return Err(Error::missing_field("consumer_secret"));
    }
    Ok(creds)
}

/// Write credentials to a YAML file, replacing any existing one
pub fn save_credentials(
    path: impl AsRef<Path>,
    consumer_key: &str,
    consumer_secret: &str,
) -> Result<()> {
    let path = path.as_ref();
    let file = CredentialFile {
        search_tweets_v2: Credentials {
            endpoint: Some(DEFAULT_ENDPOINT.to_string()),
            consumer_key: consumer_key.to_string(),
            consumer_secret: consumer_secret.to_string(),
        },
    };
    let contents = serde_yaml::to_string(&file)?;
    std::fs::write(path, contents)
        .map_err(|e| Error::credentials(path.display().to_string(), e.to_string()))?;
    Ok(())
}

/// Open an authenticated API session for the given credentials
pub fn session(credentials: &Credentials, settings: &HarvestSettings) -> Result<HttpClient> {
    let auth = AuthConfig::AppOnly {
        token_url: settings.token_url.clone(),
        consumer_key: credentials.consumer_key.clone(),
        consumer_secret: credentials.consumer_secret.clone(),
    };
    HttpClient::with_auth(settings.http_config(), auth)
}
