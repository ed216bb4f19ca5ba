//! Engine types
//!
//! Message types, options and statistics for the collector.

use crate::decode::Condition;
use crate::pagination::PageSpan;
use crate::types::{CollectMode, LogLevel};
use std::sync::Mutex;

/// A message emitted during collection
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// A group run started
    RunStarted {
        /// Group name
        group: String,
        /// Number of subjects in the snapshot
        subjects: usize,
    },
    /// A subject produced at least one page
    SubjectCollected {
        /// Subject id
        subject: String,
        /// How the subject was collected
        mode: CollectMode,
        /// Range collected in this run
        span: PageSpan,
    },
    /// A subject had nothing new
    SubjectEmpty {
        /// Subject id
        subject: String,
        /// How the subject was collected
        mode: CollectMode,
    },
    /// A subject was moved into quarantine
    Quarantined {
        /// Subject id
        subject: String,
        /// Reported condition
        condition: Condition,
    },
    /// A group run finished
    RunFinished {
        /// Group name
        group: String,
        /// Run statistics
        stats: CollectStats,
    },
    /// Log message
    Log {
        /// Log level
        level: LogLevel,
        /// Log message
        message: String,
    },
}

impl Message {
    /// Create a log message
    pub fn log(level: LogLevel, message: impl Into<String>) -> Self {
        Self::Log {
            level,
            message: message.into(),
        }
    }

    /// Create an info log
    pub fn info(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Info, message)
    }

    /// Create a warning log
    pub fn warn(message: impl Into<String>) -> Self {
        Self::log(LogLevel::Warn, message)
    }

    /// Check if this is a log message
    pub fn is_log(&self) -> bool {
        matches!(self, Self::Log { .. })
    }
}

/// Receiver of collector messages
pub trait MessageSink: Send + Sync {
    /// Handle one message
    fn emit(&self, message: Message);
}

/// Sink forwarding messages to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    fn emit(&self, message: Message) {
        match message {
            Message::RunStarted { group, subjects } => {
                tracing::info!(%group, subjects, "Collection run started");
            }
            Message::SubjectCollected {
                subject,
                mode,
                span,
            } => {
                tracing::info!(
                    %subject,
                    %mode,
                    pages = span.pages,
                    newest_id = %span.newest_id,
                    oldest_id = %span.oldest_id,
                    "Subject collected"
                );
            }
            Message::SubjectEmpty { subject, mode } => {
                tracing::info!(%subject, %mode, "No new items");
            }
            Message::Quarantined { subject, condition } => {
                tracing::warn!(%subject, %condition, "Subject quarantined");
            }
            Message::RunFinished { group, stats } => {
                tracing::info!(
                    %group,
                    subjects = stats.subjects_processed,
                    pages = stats.pages_written,
                    empty = stats.empty_subjects,
                    quarantined = stats.quarantined_subjects,
                    cancelled = stats.cancelled,
                    duration_ms = stats.duration_ms,
                    "Collection run finished"
                );
            }
            Message::Log { level, message } => match level {
                LogLevel::Trace => tracing::trace!("{message}"),
                LogLevel::Debug => tracing::debug!("{message}"),
                LogLevel::Info => tracing::info!("{message}"),
                LogLevel::Warn => tracing::warn!("{message}"),
                LogLevel::Error => tracing::error!("{message}"),
            },
        }
    }
}

/// Sink recording every message in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    messages: Mutex<Vec<Message>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far
    pub fn messages(&self) -> Vec<Message> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl MessageSink for MemorySink {
    fn emit(&self, message: Message) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}

/// Options for a collection run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// Page size requested per call
    pub max_results_per_call: u32,
    /// Only collect items from the last `days` days
    pub days: Option<u32>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_results_per_call: 100,
            days: None,
        }
    }
}

impl CollectOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size
    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results_per_call = max_results;
        self
    }

    /// Set the look-back window
    #[must_use]
    pub fn with_days(mut self, days: Option<u32>) -> Self {
        self.days = days;
        self
    }
}

/// Statistics from a collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Subjects whose collection completed
    pub subjects_processed: usize,
    /// Page artifacts received
    pub pages_written: usize,
    /// Subjects without new items
    pub empty_subjects: usize,
    /// Subjects moved into quarantine
    pub quarantined_subjects: usize,
    /// The run stopped early on request
    pub cancelled: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
