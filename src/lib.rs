// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # timeline-harvest
//!
//! Incremental, resumable harvesting of paginated user timelines.
//!
//! Every run fetches only the items newer than the last successful run of
//! each subject. Raw pages are stored as immutable JSON artifacts next to a
//! small cursor file per subject, so an interrupted or failed run can simply
//! be started again.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use timeline_harvest::auth::{read_credentials, session};
//! use timeline_harvest::config::HarvestSettings;
//! use timeline_harvest::engine::{Collector, TracingSink};
//! use timeline_harvest::group::{GroupOptions, UserGroup};
//! use timeline_harvest::retry::RetryPolicy;
//!
//! #[tokio::main]
//! async fn main() -> timeline_harvest::Result<()> {
//!     let settings = HarvestSettings::default();
//!     let client = session(&read_credentials("twitter_keys.yaml")?, &settings)?;
//!
//!     let mut group = UserGroup::open(
//!         &settings.results_root,
//!         "users",
//!         GroupOptions::new().with_roster("users.txt"),
//!     )
//!     .await?;
//!
//!     let collector = Collector::new(Arc::new(client), RetryPolicy::default(), Arc::new(TracingSink));
//!     let stats = collector.collect(&mut group).await?;
//!     println!("{} pages written", stats.pages_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                Collector (one group, one run)                   │
//! │  snapshot subjects → pick mode from cursor → update cursor      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!                     Paginator (continuation tokens)
//!                                │
//!                     RetryPolicy (bounded backoff)
//!                                │
//!                     PageFetcher (decode, write, quarantine)
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │    Decode     │   State   │   Storage   │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ App-only │ GET       │ Page          │ meta.yaml │ artifacts   │
//! │ bearer   │ Rate Limit│ Empty         │ cursor    │ quarantine  │
//! │ token    │           │ Unreachable   │           │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the harvester
pub mod error;

/// Common types and type aliases
pub mod types;

/// Identifier helpers
pub mod utils;

/// Credentials and app-only authentication
pub mod auth;

/// HTTP client with rate limiting
pub mod http;

/// Response classification
pub mod decode;

/// Retry policy for transient faults
pub mod retry;

/// Single page fetches
pub mod fetch;

/// Continuation token handling
pub mod pagination;

/// Per-subject cursors
pub mod state;

/// On-disk layout of groups
pub mod storage;

/// Settings and group field selections
pub mod config;

/// User groups
pub mod group;

/// Collection engine
pub mod engine;

/// Failure notifications
pub mod notify;

/// Command-line interface
pub mod cli;

#[cfg(test)]
mod test_helpers;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use engine::{CollectStats, Collector};
pub use group::{GroupOptions, UserGroup};
pub use retry::RetryPolicy;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
