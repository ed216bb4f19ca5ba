//! Common types used throughout timeline-harvest
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Query parameters for one API request, kept ordered so requests are reproducible
pub type QueryParams = BTreeMap<String, String>;

// ============================================================================
// Request Parameter Names
// ============================================================================

/// Parameter carrying the lower bound for incremental collection
pub const SINCE_ID_PARAM: &str = "since_id";

/// Parameter carrying the continuation token of the previous page
pub const PAGINATION_TOKEN_PARAM: &str = "pagination_token";

/// Parameter carrying the page size
pub const MAX_RESULTS_PARAM: &str = "max_results";

/// Parameter carrying the look-back window start (RFC 3339)
pub const START_TIME_PARAM: &str = "start_time";

// ============================================================================
// Collect Mode
// ============================================================================

/// How a subject is collected during one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectMode {
    /// No cursor yet: fetch exactly one page
    FirstRun,
    /// Cursor present: drain everything newer than the cursor
    Incremental,
    /// Sentinel cursor: drain everything the API returns
    Backfill,
}

impl CollectMode {
    /// Whether this mode follows continuation tokens
    pub fn collects_all(self) -> bool {
        !matches!(self, Self::FirstRun)
    }
}

impl std::fmt::Display for CollectMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstRun => write!(f, "first_run"),
            Self::Incremental => write!(f, "incremental"),
            Self::Backfill => write!(f, "backfill"),
        }
    }
}

// ============================================================================
// Log Level
// ============================================================================

/// Log level for harvester output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
