//! Pagination result types

use crate::decode::Condition;

/// Identifier range covered by one pagination sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpan {
    /// Oldest id of the last page fetched
    pub oldest_id: String,
    /// Newest id of the first page fetched
    pub newest_id: String,
    /// Number of pages received
    pub pages: usize,
}

impl PageSpan {
    /// Start a span from the first page of a sequence
    pub fn first(newest_id: impl Into<String>, oldest_id: impl Into<String>) -> Self {
        Self {
            oldest_id: oldest_id.into(),
            newest_id: newest_id.into(),
            pages: 1,
        }
    }

    /// Extend the span with an older page
    pub fn extend(&mut self, oldest_id: impl Into<String>) {
        self.oldest_id = oldest_id.into();
        self.pages += 1;
    }
}

/// Outcome of one pagination sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationResult {
    /// Range collected, `None` if the first fetch produced no page
    pub span: Option<PageSpan>,
    /// Set when the subject was moved into quarantine
    pub quarantined: Option<Condition>,
}

impl PaginationResult {
    /// Number of pages received
    pub fn pages(&self) -> usize {
        self.span.as_ref().map_or(0, |s| s.pages)
    }
}
