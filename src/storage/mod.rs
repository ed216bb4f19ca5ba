//! On-disk layout of a group
//!
//! ```text
//! <root>/
//!   <group>/
//!     group_config.yaml
//!     <subject>/
//!       meta.yaml                      cursor
//!       <newest_id>_<oldest_id>.json   one artifact per page
//!   deleted_<group>/<subject>/         quarantined subjects
//!   suspended_<group>/<subject>/
//!   protected_<group>/<subject>/
//! ```

use crate::decode::{Condition, Page};
use crate::error::{Error, Result};
use crate::state::CursorStore;
use std::path::{Path, PathBuf};

/// Name of the per-group field selection file
pub const GROUP_CONFIG_FILE: &str = "group_config.yaml";

/// Extension of page artifacts
const ARTIFACT_EXTENSION: &str = "json";

/// Check that `name` names exactly one directory below its parent
pub fn is_valid_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Reject subject ids that would resolve outside the group directory
pub fn check_subject(subject: &str) -> Result<()> {
    if is_valid_component(subject) {
        Ok(())
    } else {
        Err(Error::group(format!("invalid subject id '{subject}'")))
    }
}

/// Storage for one group under a results root
#[derive(Debug, Clone)]
pub struct GroupStore {
    root: PathBuf,
    group: String,
}

impl GroupStore {
    /// Create a store for `group` under `root`
    pub fn new(root: impl AsRef<Path>, group: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            group: group.into(),
        }
    }

    /// Group name
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Results root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the group's subjects
    pub fn group_dir(&self) -> PathBuf {
        self.root.join(&self.group)
    }

    /// Directory of one subject
    pub fn subject_dir(&self, subject: &str) -> PathBuf {
        self.group_dir().join(subject)
    }

    /// Path of the group's field selection file
    pub fn config_path(&self) -> PathBuf {
        self.group_dir().join(GROUP_CONFIG_FILE)
    }

    /// Quarantine directory for a condition
    pub fn quarantine_dir(&self, condition: Condition) -> PathBuf {
        self.root
            .join(format!("{}_{}", condition.category(), self.group))
    }

    /// Cursor store of this group
    pub fn cursors(&self) -> CursorStore {
        CursorStore::new(self.group_dir())
    }

    /// Create the subject directory if needed
    pub async fn ensure_subject(&self, subject: &str) -> Result<()> {
        check_subject(subject)?;
        let dir = self.subject_dir(subject);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::storage(&dir, e.to_string()))
    }

    /// Subjects that already have a directory, sorted
    pub async fn subjects(&self) -> Result<Vec<String>> {
        list_dir(&self.group_dir(), |path, is_dir| {
            is_dir
                .then(|| file_name(path))
                .flatten()
                .filter(|name| is_valid_component(name))
        })
        .await
    }

    /// Path of the artifact for a page
    pub fn artifact_path(&self, subject: &str, newest_id: &str, oldest_id: &str) -> PathBuf {
        self.subject_dir(subject)
            .join(format!("{newest_id}_{oldest_id}.{ARTIFACT_EXTENSION}"))
    }

    /// Persist one page
    ///
    /// Returns `false` if an artifact for the same id range already exists;
    /// the existing file is left untouched.
    pub async fn write_artifact(&self, subject: &str, page: &Page) -> Result<bool> {
        let path = self.artifact_path(subject, &page.newest_id, &page.oldest_id);
        if path.exists() {
            tracing::warn!(
                subject,
                path = %path.display(),
                "Artifact already exists, not overwriting"
            );
            return Ok(false);
        }

        self.ensure_subject(subject).await?;

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &page.body)
            .await
            .map_err(|e| Error::storage(&temp_path, e.to_string()))?;
        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| Error::storage(&path, e.to_string()))?;

        Ok(true)
    }

    /// Artifact file names of a subject, sorted
    pub async fn artifacts(&self, subject: &str) -> Result<Vec<String>> {
        list_dir(&self.subject_dir(subject), |path, is_dir| {
            let is_artifact = !is_dir
                && path.extension().and_then(|e| e.to_str()) == Some(ARTIFACT_EXTENSION);
            is_artifact.then(|| file_name(path)).flatten()
        })
        .await
    }

    /// Move a subject and everything it holds into quarantine
    ///
    /// Files are copied first and the original directory is removed only
    /// after the copy completed.
    pub async fn quarantine(&self, subject: &str, condition: Condition) -> Result<PathBuf> {
        check_subject(subject)?;
        let source = self.subject_dir(subject);
        let target = self.quarantine_dir(condition).join(subject);

        tokio::fs::create_dir_all(&target)
            .await
            .map_err(|e| Error::storage(&target, e.to_string()))?;

        if source.exists() {
            copy_tree(&source, &target).await?;
            tokio::fs::remove_dir_all(&source)
                .await
                .map_err(|e| Error::storage(&source, e.to_string()))?;
        }

        Ok(target)
    }

    /// Quarantine condition a subject was filed under, if any
    pub fn quarantined_as(&self, subject: &str) -> Option<Condition> {
        Condition::all()
            .into_iter()
            .find(|c| self.quarantine_dir(*c).join(subject).is_dir())
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(ToString::to_string)
}

/// Collect and sort the entries of a directory accepted by `select`
///
/// A missing directory lists as empty.
async fn list_dir<F>(dir: &Path, select: F) -> Result<Vec<String>>
where
    F: Fn(&Path, bool) -> Option<String>,
{
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| Error::storage(dir, e.to_string()))?;

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::storage(dir, e.to_string()))?
    {
        let is_dir = entry.file_type().await?.is_dir();
        if let Some(name) = select(&entry.path(), is_dir) {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// Recursively copy `source` into the existing directory `target`
async fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    let mut pending = vec![(source.to_path_buf(), target.to_path_buf())];

    while let Some((from, to)) = pending.pop() {
        tokio::fs::create_dir_all(&to)
            .await
            .map_err(|e| Error::storage(&to, e.to_string()))?;

        let mut entries = tokio::fs::read_dir(&from)
            .await
            .map_err(|e| Error::storage(&from, e.to_string()))?;

        while let Some(entry) = entries.next_entry().await? {
            let dest = to.join(entry.file_name());
            if entry.file_type().await?.is_dir() {
                pending.push((entry.path(), dest));
            } else {
                tokio::fs::copy(entry.path(), &dest)
                    .await
                    .map_err(|e| Error::storage(&dest, e.to_string()))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
