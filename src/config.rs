//! Configuration types
//!
//! Two layers of configuration exist:
//! - `HarvestSettings` - process-wide settings (storage root, endpoints, retry budget)
//! - `GroupConfig` - per-group selection of fields and expansions, stored
//!   next to the group's data as `group_config.yaml`

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{QueryParams, MAX_RESULTS_PARAM};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default group configuration shipped with the binary
const DEFAULT_GROUP_CONFIG: &str = include_str!("templates/group_config.yaml");

/// Minimal group configuration shipped with the binary
const MIN_GROUP_CONFIG: &str = include_str!("templates/min_group_config.yaml");

// ============================================================================
// Group Config
// ============================================================================

/// Selection of response fields and expansions for one group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Item fields (`tweet.fields`)
    #[serde(default)]
    pub fields: BTreeMap<String, bool>,

    /// Expansions (`expansions`)
    #[serde(default)]
    pub expansions: BTreeMap<String, bool>,

    /// Fields of expanded user objects (`user.fields`)
    #[serde(default, rename = "user.fields")]
    pub user_fields: BTreeMap<String, bool>,
}

impl GroupConfig {
    /// The default selection
    pub fn default_template() -> Result<Self> {
        Self::from_yaml(DEFAULT_GROUP_CONFIG)
    }

    /// A minimal selection (ids, text, timestamps)
    pub fn minimal() -> Result<Self> {
        Self::from_yaml(MIN_GROUP_CONFIG)
    }

    /// Parse a group config from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a group config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Write this config as YAML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let contents = serde_yaml::to_string(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Build the request parameters for one page
    ///
    /// Enabled entries are joined with commas; empty selections are omitted.
    pub fn request_params(&self, max_results: u32) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert(MAX_RESULTS_PARAM.to_string(), max_results.to_string());

        for (name, selection) in [
            ("tweet.fields", &self.fields),
            ("expansions", &self.expansions),
            ("user.fields", &self.user_fields),
        ] {
            let joined = enabled(selection);
            if !joined.is_empty() {
                params.insert(name.to_string(), joined);
            }
        }

        params
    }
}

/// Join the enabled keys of a selection map
fn enabled(selection: &BTreeMap<String, bool>) -> String {
    selection
        .iter()
        .filter(|(_, on)| **on)
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

// ============================================================================
// Harvest Settings
// ============================================================================

/// Process-wide harvester settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    /// Directory holding one sub-directory per group
    pub results_root: PathBuf,

    /// Base URL of the timeline API
    pub api_base_url: String,

    /// Token endpoint for app-only authentication
    pub token_url: String,

    /// Page size requested per call
    pub max_results_per_call: u32,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Client-side request throttle (requests per second)
    pub requests_per_second: Option<u32>,

    /// Retry budget for transient faults
    pub retry: RetrySettings,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            results_root: PathBuf::from("results"),
            api_base_url: "https://api.twitter.com/2".to_string(),
            token_url: "https://api.twitter.com/oauth2/token".to_string(),
            max_results_per_call: 100,
            request_timeout_secs: 30,
            requests_per_second: None,
            retry: RetrySettings::default(),
        }
    }
}

impl HarvestSettings {
    /// Load settings from a YAML file; missing keys keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read settings {}: {e}", path.display()))
        })?;
        let settings: Self = serde_yaml::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.max_results_per_call == 0 {
            return Err(Error::config("max_results_per_call must be at least 1"));
        }
        if self.api_base_url.is_empty() {
            return Err(Error::missing_field("api_base_url"));
        }
        Ok(())
    }

    /// HTTP client configuration derived from these settings
    pub fn http_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(&self.api_base_url)
            .timeout(Duration::from_secs(self.request_timeout_secs));

        match self.requests_per_second {
            Some(rps) => builder.rate_limit(RateLimiterConfig::new(rps, rps)).build(),
            None => builder.no_rate_limit().build(),
        }
    }
}

/// Retry budget settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Total sleep budget in seconds
    pub budget_secs: u64,
    /// Smallest backoff once the budget is spent, in seconds
    pub min_backoff_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 10,
            budget_secs: 900,
            min_backoff_secs: 30,
        }
    }
}
