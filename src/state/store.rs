//! Cursor store implementation
//!
//! Provides file-based cursor persistence with atomic writes.

use super::types::Cursor;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Name of the cursor file inside a subject directory
pub const CURSOR_FILE: &str = "meta.yaml";

/// Store for per-subject cursors of one group
#[derive(Debug, Clone)]
pub struct CursorStore {
    /// Group directory holding one sub-directory per subject
    group_dir: PathBuf,
}

impl CursorStore {
    /// Create a cursor store rooted at a group directory
    pub fn new(group_dir: impl AsRef<Path>) -> Self {
        Self {
            group_dir: group_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the cursor file for a subject
    pub fn path(&self, subject: &str) -> PathBuf {
        self.group_dir.join(subject).join(CURSOR_FILE)
    }

    /// Load the cursor for a subject, `None` if it was never collected
    pub async fn load(&self, subject: &str) -> Result<Option<Cursor>> {
        let path = self.path(subject);
        if !path.exists() {
            return Ok(None);
        }

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to read cursor file {}: {e}", path.display()),
            })?;

        let cursor: Cursor = serde_yaml::from_str(&contents).map_err(|e| Error::State {
            message: format!("Failed to parse cursor file {}: {e}", path.display()),
        })?;

        Ok(Some(cursor))
    }

    /// Save the cursor for a subject, replacing any previous one
    pub async fn save(&self, subject: &str, cursor: &Cursor) -> Result<()> {
        let path = self.path(subject);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_yaml::to_string(cursor).map_err(|e| Error::State {
            message: format!("Failed to serialize cursor: {e}"),
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to write cursor file: {e}"),
            })?;

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to rename cursor file: {e}"),
            })?;

        Ok(())
    }

    /// Check if a subject has a cursor
    pub fn exists(&self, subject: &str) -> bool {
        self.path(subject).exists()
    }

    /// Get the group directory
    pub fn group_dir(&self) -> &Path {
        &self.group_dir
    }
}
