//! User groups
//!
//! A group is a named roster of subjects sharing one storage directory and
//! one field selection. Opening a group merges the subjects that already
//! have a directory with the lines of an optional roster file.

use crate::config::GroupConfig;
use crate::error::{Error, Result, ResultExt};
use crate::state::{Cursor, CursorStore};
use crate::storage::{check_subject, is_valid_component, GroupStore};
use std::path::{Path, PathBuf};

/// Options for opening a group
#[derive(Debug, Clone, Default)]
pub struct GroupOptions {
    /// Newline-delimited subject ids to add
    pub roster: Option<PathBuf>,
    /// Field selection file copied into the group
    pub config: Option<PathBuf>,
    /// Seed every subject without a cursor so its full history is collected
    pub backfill: bool,
}

impl GroupOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add subjects from a roster file
    #[must_use]
    pub fn with_roster(mut self, path: impl Into<PathBuf>) -> Self {
        self.roster = Some(path.into());
        self
    }

    /// Use a field selection file
    #[must_use]
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    /// Collect the full history of new subjects
    #[must_use]
    pub fn with_backfill(mut self, backfill: bool) -> Self {
        self.backfill = backfill;
        self
    }
}

/// A named set of active subjects
#[derive(Debug, Clone)]
pub struct UserGroup {
    store: GroupStore,
    config: GroupConfig,
    subjects: Vec<String>,
}

impl UserGroup {
    /// Open or create the group `name` under `root`
    pub async fn open(root: impl AsRef<Path>, name: &str, options: GroupOptions) -> Result<Self> {
        if !is_valid_component(name) {
            return Err(Error::group(format!("invalid group name '{name}'")));
        }

        let store = GroupStore::new(root, name);
        let group_dir = store.group_dir();
        tokio::fs::create_dir_all(&group_dir)
            .await
            .with_context(|| format!("Failed to create group directory {}", group_dir.display()))?;

        let config = resolve_config(&store, options.config.as_deref())?;

        let mut subjects = store.subjects().await?;
        if let Some(roster) = &options.roster {
            for subject in read_roster(roster).await? {
                if let Some(condition) = store.quarantined_as(&subject) {
                    tracing::info!(
                        group = name,
                        subject = %subject,
                        %condition,
                        "Skipping quarantined subject"
                    );
                    continue;
                }
                if !subjects.contains(&subject) {
                    store.ensure_subject(&subject).await?;
                    subjects.push(subject);
                }
            }
        }

        let group = Self {
            store,
            config,
            subjects,
        };

        if options.backfill {
            group.seed_cursors().await?;
        }

        tracing::info!(group = name, subjects = group.subjects.len(), "Opened group");
        Ok(group)
    }

    /// Give every subject without a cursor a seed cursor
    async fn seed_cursors(&self) -> Result<()> {
        let cursors = self.cursors();
        for subject in &self.subjects {
            if !cursors.exists(subject) {
                cursors.save(subject, &Cursor::seed()).await?;
            }
        }
        Ok(())
    }

    /// Group name
    pub fn name(&self) -> &str {
        self.store.group()
    }

    /// Active subjects in collection order
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    /// Drop a subject from the active set
    ///
    /// Returns `false` if it was not active.
    pub fn remove_subject(&mut self, subject: &str) -> bool {
        let before = self.subjects.len();
        self.subjects.retain(|s| s != subject);
        self.subjects.len() != before
    }

    /// Field selection of this group
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Storage of this group
    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    /// Cursor store of this group
    pub fn cursors(&self) -> CursorStore {
        self.store.cursors()
    }

    /// Current cursor of a subject
    pub async fn cursor(&self, subject: &str) -> Result<Option<Cursor>> {
        self.cursors().load(subject).await
    }

    /// Artifact file names of a subject
    pub async fn artifacts(&self, subject: &str) -> Result<Vec<String>> {
        self.store.artifacts(subject).await
    }
}

/// Pick the group's field selection
///
/// A supplied file replaces the stored one. Otherwise the stored selection
/// is used, and a new group gets the default template.
fn resolve_config(store: &GroupStore, supplied: Option<&Path>) -> Result<GroupConfig> {
    let stored = store.config_path();

    if let Some(path) = supplied {
        let config = GroupConfig::from_file(path)?;
        std::fs::copy(path, &stored)
            .with_context(|| format!("Failed to copy group config {}", path.display()))?;
        return Ok(config);
    }

    if stored.exists() {
        return GroupConfig::from_file(&stored);
    }

    let config = GroupConfig::default_template()?;
    config.save(&stored)?;
    Ok(config)
}

/// Read a newline-delimited roster, skipping blank lines
///
/// The whole roster is rejected if any line is not a plain subject id.
async fn read_roster(path: &Path) -> Result<Vec<String>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read roster {}", path.display()))?;

    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| check_subject(line).map(|()| line.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Condition;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_roster(dir: &Path, lines: &str) -> PathBuf {
        let path = dir.join("roster.txt");
        std::fs::write(&path, lines).unwrap();
        path
    }

    #[tokio::test]
    async fn test_open_with_roster() {
        let dir = tempdir().unwrap();
        let roster = write_roster(dir.path(), "  123 \n\n456\n123\n");

        let group = UserGroup::open(
            dir.path().join("results"),
            "users",
            GroupOptions::new().with_roster(&roster),
        )
        .await
        .unwrap();

        assert_eq!(group.name(), "users");
        assert_eq!(group.subjects(), ["123", "456"]);
        assert!(group.store().subject_dir("456").is_dir());
        assert!(group.store().config_path().exists());
        assert_eq!(group.config(), &GroupConfig::default_template().unwrap());
    }

    #[tokio::test]
    async fn test_reopen_scans_existing_subjects() {
        let dir = tempdir().unwrap();
        let roster = write_roster(dir.path(), "b\na\n");

        UserGroup::open(dir.path(), "g", GroupOptions::new().with_roster(&roster))
            .await
            .unwrap();
        let reopened = UserGroup::open(dir.path(), "g", GroupOptions::new())
            .await
            .unwrap();

        assert_eq!(reopened.subjects(), ["a", "b"]);
    }

    #[tokio::test]
    async fn test_supplied_config_is_copied() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom.yaml");
        GroupConfig::minimal().unwrap().save(&config_path).unwrap();

        let group = UserGroup::open(
            dir.path(),
            "g",
            GroupOptions::new().with_config(&config_path),
        )
        .await
        .unwrap();
        assert_eq!(group.config(), &GroupConfig::minimal().unwrap());

        // The stored copy is used on the next open
        let reopened = UserGroup::open(dir.path(), "g", GroupOptions::new())
            .await
            .unwrap();
        assert_eq!(reopened.config(), &GroupConfig::minimal().unwrap());
    }

    #[tokio::test]
    async fn test_missing_roster_fails() {
        let dir = tempdir().unwrap();
        let err = UserGroup::open(
            dir.path(),
            "g",
            GroupOptions::new().with_roster(dir.path().join("nope.txt")),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Failed to read roster"));
    }

    #[tokio::test]
    async fn test_invalid_group_name() {
        let dir = tempdir().unwrap();
        let err = UserGroup::open(dir.path(), "a/b", GroupOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Group { .. }));
    }

    #[tokio::test]
    async fn test_invalid_group_names() {
        let dir = tempdir().unwrap();
        for name in ["", ".", "..", "a\\b"] {
            let err = UserGroup::open(dir.path(), name, GroupOptions::new())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::Group { .. }), "{name}");
        }
    }

    #[tokio::test]
    async fn test_roster_with_path_escape_is_rejected() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("results");
        let other = root.join("other_group").join("7");
        std::fs::create_dir_all(&other).unwrap();
        std::fs::write(other.join("keep.json"), "{}").unwrap();

        for line in ["../other_group/7", "..", ".", "a\\b"] {
            let roster = write_roster(dir.path(), &format!("1\n{line}\n"));
            let err = UserGroup::open(&root, "users", GroupOptions::new().with_roster(&roster))
                .await
                .unwrap_err();

            assert!(matches!(err, Error::Group { .. }), "{line}");
            assert!(err.to_string().contains("invalid subject id"));
        }
        assert!(other.join("keep.json").exists());
        // Nothing from a rejected roster is added
        assert!(!root.join("users").join("1").exists());
    }

    #[tokio::test]
    async fn test_quarantined_subjects_are_not_readded() {
        let dir = tempdir().unwrap();
        let roster = write_roster(dir.path(), "1\n2\n");
        let store = GroupStore::new(dir.path(), "g");
        store.quarantine("2", Condition::Forbidden).await.unwrap();

        let group = UserGroup::open(dir.path(), "g", GroupOptions::new().with_roster(&roster))
            .await
            .unwrap();

        assert_eq!(group.subjects(), ["1"]);
    }

    #[tokio::test]
    async fn test_backfill_seeds_missing_cursors() {
        let dir = tempdir().unwrap();
        let roster = write_roster(dir.path(), "1\n2\n");
        let store = GroupStore::new(dir.path(), "g");
        store.cursors().save("1", &Cursor::new("50", "40")).await.unwrap();

        let group = UserGroup::open(
            dir.path(),
            "g",
            GroupOptions::new().with_roster(&roster).with_backfill(true),
        )
        .await
        .unwrap();

        assert_eq!(group.cursor("1").await.unwrap(), Some(Cursor::new("50", "40")));
        assert_eq!(group.cursor("2").await.unwrap(), Some(Cursor::seed()));
    }

    #[tokio::test]
    async fn test_remove_subject() {
        let dir = tempdir().unwrap();
        let roster = write_roster(dir.path(), "1\n2\n");
        let mut group = UserGroup::open(dir.path(), "g", GroupOptions::new().with_roster(&roster))
            .await
            .unwrap();

        assert!(group.remove_subject("1"));
        assert!(!group.remove_subject("1"));
        assert_eq!(group.subjects(), ["2"]);
    }
}
