//! Pagination driver
//!
//! Follows continuation tokens for one subject. Every fetch goes through
//! the [`RetryPolicy`], so a single flaky page is retried on its own
//! without restarting the sequence.

mod types;

pub use types::{PageSpan, PaginationResult};

use crate::error::{Error, Result};
use crate::fetch::{FetchOutcome, PageFetcher};
use crate::retry::RetryPolicy;
use crate::types::{QueryParams, PAGINATION_TOKEN_PARAM};
use tokio_util::sync::CancellationToken;

/// Drives page fetches for one subject
#[derive(Clone)]
pub struct Paginator {
    fetcher: PageFetcher,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl Paginator {
    /// Create a paginator
    pub fn new(fetcher: PageFetcher, retry: RetryPolicy) -> Self {
        Self {
            fetcher,
            retry,
            cancel: CancellationToken::new(),
        }
    }

    /// Observe a cancellation token between pages
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Page fetcher used by this paginator
    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    /// Fetch one page, or every page while continuation tokens are returned
    ///
    /// `newest_id` of the span comes from the first page and `oldest_id`
    /// from the last one. Returns [`Error::Cancelled`] if cancellation is
    /// requested before a continuation page is fetched.
    pub async fn paginate(
        &self,
        subject: &str,
        params: &QueryParams,
        collect_all: bool,
    ) -> Result<PaginationResult> {
        let mut params = params.clone();
        params.remove(PAGINATION_TOKEN_PARAM);

        let mut result = PaginationResult::default();

        loop {
            let outcome = self
                .retry
                .run(subject, || self.fetcher.fetch_page(subject, &params))
                .await?;

            let page = match outcome {
                FetchOutcome::Page(page) => page,
                FetchOutcome::Empty => break,
                FetchOutcome::Quarantined(condition) => {
                    result.quarantined = Some(condition);
                    break;
                }
            };

            match result.span.as_mut() {
                Some(span) => span.extend(&page.oldest_id),
                None => result.span = Some(PageSpan::first(&page.newest_id, &page.oldest_id)),
            }

            let next_token = match page.next_token {
                Some(token) if collect_all => token,
                _ => break,
            };

            if self.cancel.is_cancelled() {
                tracing::info!(subject, pages = result.pages(), "Pagination cancelled");
                return Err(Error::Cancelled);
            }

            tracing::debug!(subject, %next_token, "Following continuation token");
            params.insert(PAGINATION_TOKEN_PARAM.to_string(), next_token);
        }

        Ok(result)
    }
}
