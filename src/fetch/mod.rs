//! Page fetcher
//!
//! Issues exactly one timeline request, classifies the response and applies
//! its side effects: a page is written as an artifact, an unreachable
//! subject is moved into quarantine. Transient faults are returned as
//! [`Error::TransientFault`] so a [`RetryPolicy`](crate::retry::RetryPolicy)
//! can retry the call.

use crate::decode::{decode_response, Condition, Decoded, Page};
use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::storage::GroupStore;
use crate::types::QueryParams;
use crate::utils::id_timestamp;
use std::sync::Arc;

/// Result of one successful fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// A page was received and persisted
    Page(Page),
    /// No results for these parameters
    Empty,
    /// The subject was moved into quarantine
    Quarantined(Condition),
}

/// Fetches single timeline pages for the subjects of one group
#[derive(Clone)]
pub struct PageFetcher {
    client: Arc<dyn ApiClient>,
    store: GroupStore,
}

impl PageFetcher {
    /// Create a fetcher writing into `store`
    pub fn new(client: Arc<dyn ApiClient>, store: GroupStore) -> Self {
        Self { client, store }
    }

    /// Storage used by this fetcher
    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    /// Timeline endpoint of a subject, relative to the API base
    pub fn endpoint(subject: &str) -> String {
        format!("users/{subject}/tweets")
    }

    /// Fetch one page for `subject`
    pub async fn fetch_page(&self, subject: &str, params: &QueryParams) -> Result<FetchOutcome> {
        let response = self
            .client
            .request(&Self::endpoint(subject), params)
            .await?;

        match decode_response(&response) {
            Decoded::TransientFault { reason } => {
                tracing::debug!(subject, status = response.status, %reason, "Rejected response");
                Err(Error::transient(format!("{subject}: {reason}")))
            }
            Decoded::Empty => {
                tracing::debug!(subject, "No results");
                Ok(FetchOutcome::Empty)
            }
            Decoded::Unreachable(condition) => {
                let target = self.store.quarantine(subject, condition).await?;
                tracing::warn!(
                    subject,
                    %condition,
                    target = %target.display(),
                    "Subject unreachable, moved to quarantine"
                );
                Ok(FetchOutcome::Quarantined(condition))
            }
            Decoded::Page(page) => {
                for problem in &page.advisories {
                    tracing::warn!(
                        subject,
                        title = %problem.title,
                        detail = %problem.detail,
                        "API reported a problem alongside data"
                    );
                }

                self.store.write_artifact(subject, &page).await?;
                log_page(subject, &page);
                Ok(FetchOutcome::Page(page))
            }
        }
    }
}

fn log_page(subject: &str, page: &Page) {
    match (id_timestamp(&page.oldest_id), id_timestamp(&page.newest_id)) {
        (Some(oldest), Some(newest)) => tracing::info!(
            subject,
            items = page.result_count,
            from = %oldest.date,
            to = %newest.date,
            "Collected page"
        ),
        _ => tracing::info!(subject, items = page.result_count, "Collected page"),
    }
}
