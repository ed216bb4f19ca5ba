//! Collection engine
//!
//! The `Collector` walks the subjects of a group one at a time, picks the
//! collection mode from the subject's cursor, drives pagination and writes
//! the updated cursor back.
//!
//! | Cursor          | Mode          | Pages          | `since_id`      |
//! |-----------------|---------------|----------------|-----------------|
//! | none            | `FirstRun`    | exactly one    | -               |
//! | seed (`0`/`0`)  | `Backfill`    | all            | -               |
//! | present         | `Incremental` | all            | cursor newest   |

mod types;

pub use types::{CollectOptions, CollectStats, MemorySink, Message, MessageSink, TracingSink};

use crate::config::GroupConfig;
use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::group::UserGroup;
use crate::http::ApiClient;
use crate::pagination::{PaginationResult, Paginator};
use crate::retry::RetryPolicy;
use crate::state::{Cursor, CursorStore};
use crate::types::{CollectMode, QueryParams, SINCE_ID_PARAM, START_TIME_PARAM};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Orchestrates collection runs
pub struct Collector {
    client: Arc<dyn ApiClient>,
    retry: RetryPolicy,
    sink: Arc<dyn MessageSink>,
    options: CollectOptions,
    cancel: CancellationToken,
}

impl Collector {
    /// Create a collector
    pub fn new(client: Arc<dyn ApiClient>, retry: RetryPolicy, sink: Arc<dyn MessageSink>) -> Self {
        Self {
            client,
            retry,
            sink,
            options: CollectOptions::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Set collection options
    #[must_use]
    pub fn with_options(mut self, options: CollectOptions) -> Self {
        self.options = options;
        self
    }

    /// Stop between subjects and pages once `cancel` fires
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Collection options in use
    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    /// Run one collection pass over a group
    ///
    /// Subjects are snapshotted first; quarantined subjects are removed from
    /// the group once their fetch returned. A fatal error aborts the run and
    /// leaves already collected subjects as they are.
    pub async fn collect(&self, group: &mut UserGroup) -> Result<CollectStats> {
        let start = Instant::now();
        let snapshot = group.subjects().to_vec();
        let cursors = group.cursors();
        let base_params = self.base_params(group.config());
        let paginator = Paginator::new(
            PageFetcher::new(Arc::clone(&self.client), group.store().clone()),
            self.retry,
        )
        .with_cancel(self.cancel.clone());

        self.sink.emit(Message::RunStarted {
            group: group.name().to_string(),
            subjects: snapshot.len(),
        });

        let mut stats = CollectStats::default();

        for subject in &snapshot {
            if self.cancel.is_cancelled() {
                stats.cancelled = true;
                break;
            }

            let cursor = cursors.load(subject).await?;
            let mode = match &cursor {
                None => CollectMode::FirstRun,
                Some(c) if c.is_seed() => CollectMode::Backfill,
                Some(_) => CollectMode::Incremental,
            };

            let mut params = base_params.clone();
            if let (CollectMode::Incremental, Some(c)) = (mode, &cursor) {
                params.insert(SINCE_ID_PARAM.to_string(), c.newest_id.clone());
            }

            tracing::debug!(subject = %subject, %mode, "Collecting subject");

            let result = match paginator
                .paginate(subject, &params, mode.collects_all())
                .await
            {
                Ok(result) => result,
                Err(Error::Cancelled) => {
                    stats.cancelled = true;
                    break;
                }
                Err(e) => {
                    tracing::error!(subject = %subject, error = %e, "Collection aborted");
                    return Err(e);
                }
            };

            stats.pages_written += result.pages();
            stats.subjects_processed += 1;

            if let Some(condition) = result.quarantined {
                group.remove_subject(subject);
                stats.quarantined_subjects += 1;
                self.sink.emit(Message::Quarantined {
                    subject: subject.clone(),
                    condition,
                });
                continue;
            }

            self.record(&cursors, subject, mode, cursor, result, &mut stats)
                .await?;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        if stats.cancelled {
            self.sink.emit(Message::warn(format!(
                "Run of group '{}' cancelled after {} subjects",
                group.name(),
                stats.subjects_processed
            )));
        }
        self.sink.emit(Message::RunFinished {
            group: group.name().to_string(),
            stats: stats.clone(),
        });

        Ok(stats)
    }

    /// Write the cursor for a collected subject and report it
    async fn record(
        &self,
        cursors: &CursorStore,
        subject: &str,
        mode: CollectMode,
        cursor: Option<Cursor>,
        result: PaginationResult,
        stats: &mut CollectStats,
    ) -> Result<()> {
        let Some(span) = result.span else {
            // No cursor is created for an empty first run
            stats.empty_subjects += 1;
            self.sink.emit(Message::SubjectEmpty {
                subject: subject.to_string(),
                mode,
            });
            return Ok(());
        };

        match cursor {
            None => {
                cursors
                    .save(subject, &Cursor::new(&span.newest_id, &span.oldest_id))
                    .await?;
            }
            Some(mut cursor) => {
                let advanced = cursor.advance(&span.newest_id);
                let settled = cursor.settle_oldest(&span.oldest_id);
                if advanced || settled {
                    cursors.save(subject, &cursor).await?;
                }
            }
        }

        self.sink.emit(Message::SubjectCollected {
            subject: subject.to_string(),
            mode,
            span,
        });
        Ok(())
    }

    /// Request parameters shared by every subject of a group
    fn base_params(&self, config: &GroupConfig) -> QueryParams {
        let mut params = config.request_params(self.options.max_results_per_call);
        if let Some(days) = self.options.days {
            let start = Utc::now() - chrono::Duration::days(i64::from(days));
            params.insert(
                START_TIME_PARAM.to_string(),
                start.to_rfc3339_opts(SecondsFormat::Secs, true),
            );
        }
        params
    }
}
