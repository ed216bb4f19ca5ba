//! Retry policy for transient faults
//!
//! One `RetryPolicy::run` call wraps one logical request. Every transient
//! failure increments the attempt counter of that call chain and sleeps for
//!
//! ```text
//! backoff(n) = min((2n)^2, max(budget - slept, min_backoff))   seconds
//! ```
//!
//! where `slept` is the total already slept in the same chain. After
//! `max_retries` retries the next failure is wrapped in
//! [`Error::RetryExhausted`], which callers treat as fatal.

use crate::config::RetrySettings;
use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// Explicit retry policy value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Total sleep budget of one call chain
    pub budget: Duration,
    /// Smallest backoff once the budget is spent
    pub min_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            budget: Duration::from_secs(settings.budget_secs),
            min_backoff: Duration::from_secs(settings.min_backoff_secs),
        }
    }
}

impl RetryPolicy {
    /// Backoff before retrying after the `attempt`-th failure
    pub fn backoff(&self, attempt: u32, slept: Duration) -> Duration {
        let exponential = Duration::from_secs(u64::from(attempt * 2).pow(2));
        let remaining = self.budget.saturating_sub(slept).max(self.min_backoff);
        exponential.min(remaining)
    }

    /// Run an operation, retrying errors that are transient
    pub async fn run<T, F, Fut>(&self, label: &str, operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.run_with(label, Error::is_transient, operation).await
    }

    /// Run an operation, retrying errors accepted by `is_transient`
    ///
    /// Errors rejected by the classifier are returned unchanged without
    /// consuming retry budget.
    pub async fn run_with<T, F, Fut, C>(
        &self,
        label: &str,
        is_transient: C,
        mut operation: F,
    ) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
        C: Fn(&Error) -> bool,
    {
        let mut attempts: u32 = 0;
        let mut slept = Duration::ZERO;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempts > 0 {
                        tracing::info!(label, attempts = attempts + 1, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if is_transient(&e) => {
                    attempts += 1;
                    if attempts > self.max_retries {
                        tracing::error!(label, attempts, error = %e, "Retry budget exhausted");
                        return Err(Error::RetryExhausted {
                            attempts,
                            last: Box::new(e),
                        });
                    }

                    let delay = self.backoff(attempts, slept);
                    tracing::warn!(
                        label,
                        attempt = attempts,
                        max_retries = self.max_retries,
                        delay_secs = delay.as_secs(),
                        error = %e,
                        "Transient fault, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    slept += delay;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
