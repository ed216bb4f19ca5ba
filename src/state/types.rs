//! Cursor types for tracking collection progress
//!
//! These types are serialized to YAML and persisted between runs.

use crate::utils::compare_ids;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Identifier used by a seeded cursor that has not collected anything yet
const SEED_ID: &str = "0";

/// Collection watermark for one subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Newest identifier ever collected
    pub newest_id: String,
    /// Oldest identifier ever collected
    pub oldest_id: String,
}

impl Cursor {
    /// Create a cursor from the identifiers of a first page
    pub fn new(newest_id: impl Into<String>, oldest_id: impl Into<String>) -> Self {
        Self {
            newest_id: newest_id.into(),
            oldest_id: oldest_id.into(),
        }
    }

    /// Create a seed cursor that asks for the full available history
    pub fn seed() -> Self {
        Self::new(SEED_ID, SEED_ID)
    }

    /// Check if this is an untouched seed cursor
    pub fn is_seed(&self) -> bool {
        self.newest_id == SEED_ID
    }

    /// Raise the high-water mark
    ///
    /// Returns `true` if the cursor changed. The newest id never moves backwards.
    pub fn advance(&mut self, newest_id: &str) -> bool {
        if compare_ids(newest_id, &self.newest_id) == Ordering::Greater {
            self.newest_id = newest_id.to_string();
            true
        } else {
            false
        }
    }

    /// Replace the low-water mark left by a seed cursor
    ///
    /// Returns `true` if the cursor changed. A real oldest id is kept as is.
    pub fn settle_oldest(&mut self, oldest_id: &str) -> bool {
        if self.oldest_id == SEED_ID && oldest_id != SEED_ID {
            self.oldest_id = oldest_id.to_string();
            true
        } else {
            false
        }
    }
}
