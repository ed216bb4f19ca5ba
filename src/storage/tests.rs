//! Tests for the group storage layout

use super::*;
use crate::state::{Cursor, CURSOR_FILE};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn page(newest: &str, oldest: &str, body: &str) -> Page {
    Page {
        newest_id: newest.to_string(),
        oldest_id: oldest.to_string(),
        next_token: None,
        result_count: 2,
        advisories: Vec::new(),
        body: body.to_string(),
    }
}

#[test]
fn test_paths() {
    let store = GroupStore::new("/data", "users");

    assert_eq!(store.group_dir(), PathBuf::from("/data/users"));
    assert_eq!(store.subject_dir("42"), PathBuf::from("/data/users/42"));
    assert_eq!(
        store.config_path(),
        PathBuf::from("/data/users/group_config.yaml")
    );
    assert_eq!(
        store.artifact_path("42", "30", "20"),
        PathBuf::from("/data/users/42/30_20.json")
    );
    assert_eq!(
        store.quarantine_dir(Condition::NotFound),
        PathBuf::from("/data/deleted_users")
    );
    assert_eq!(
        store.quarantine_dir(Condition::Forbidden),
        PathBuf::from("/data/suspended_users")
    );
    assert_eq!(
        store.quarantine_dir(Condition::Unauthorized),
        PathBuf::from("/data/protected_users")
    );
}

#[tokio::test]
async fn test_write_artifact() {
    let dir = tempdir().unwrap();
    let store = GroupStore::new(dir.path(), "users");

    let written = store
        .write_artifact("42", &page("30", "20", r#"{"data":[]}"#))
        .await
        .unwrap();

    assert!(written);
    let path = store.artifact_path("42", "30", "20");
    assert_eq!(std::fs::read_to_string(path).unwrap(), r#"{"data":[]}"#);
    assert!(!store.subject_dir("42").join("30_20.tmp").exists());
}

#[tokio::test]
async fn test_write_artifact_does_not_overwrite() {
    let dir = tempdir().unwrap();
    let store = GroupStore::new(dir.path(), "users");

    store
        .write_artifact("42", &page("30", "20", "first"))
        .await
        .unwrap();
    let written = store
        .write_artifact("42", &page("30", "20", "second"))
        .await
        .unwrap();

    assert!(!written);
    let path = store.artifact_path("42", "30", "20");
    assert_eq!(std::fs::read_to_string(path).unwrap(), "first");
}

#[tokio::test]
async fn test_subjects_and_artifacts_are_sorted() {
    let dir = tempdir().unwrap();
    let store = GroupStore::new(dir.path(), "users");

    assert!(store.subjects().await.unwrap().is_empty());

    for subject in ["b", "a", "c"] {
        store.ensure_subject(subject).await.unwrap();
    }
    std::fs::write(store.config_path(), "fields: {}\n").unwrap();

    store.write_artifact("a", &page("9", "8", "{}")).await.unwrap();
    store.write_artifact("a", &page("7", "6", "{}")).await.unwrap();
    std::fs::write(store.subject_dir("a").join(CURSOR_FILE), "x").unwrap();

    assert_eq!(store.subjects().await.unwrap(), vec!["a", "b", "c"]);
    assert_eq!(
        store.artifacts("a").await.unwrap(),
        vec!["7_6.json", "9_8.json"]
    );
    assert!(store.artifacts("missing").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quarantine_moves_everything() {
    let dir = tempdir().unwrap();
    let store = GroupStore::new(dir.path(), "users");

    store.write_artifact("42", &page("30", "20", "{}")).await.unwrap();
    store
        .cursors()
        .save("42", &Cursor::new("30", "20"))
        .await
        .unwrap();

    let target = store.quarantine("42", Condition::NotFound).await.unwrap();

    assert_eq!(target, dir.path().join("deleted_users").join("42"));
    assert!(target.join("30_20.json").exists());
    assert!(target.join(CURSOR_FILE).exists());
    assert!(!store.subject_dir("42").exists());
    assert_eq!(store.quarantined_as("42"), Some(Condition::NotFound));
    assert_eq!(store.quarantined_as("43"), None);
}

#[tokio::test]
async fn test_quarantine_subject_without_directory() {
    let dir = tempdir().unwrap();
    let store = GroupStore::new(dir.path(), "users");

    let target = store
        .quarantine("new", Condition::Unauthorized)
        .await
        .unwrap();

    assert!(target.is_dir());
    assert_eq!(store.quarantined_as("new"), Some(Condition::Unauthorized));
}

#[tokio::test]
async fn test_quarantine_refuses_paths_outside_the_group() {
    let dir = tempdir().unwrap();
    let store = GroupStore::new(dir.path().join("results"), "users");
    let outside = dir.path().join("results").join("other_group").join("7");
    std::fs::create_dir_all(&outside).unwrap();
    std::fs::write(outside.join("keep.json"), "{}").unwrap();

    for subject in ["../other_group/7", "..", ""] {
        let err = store
            .quarantine(subject, Condition::NotFound)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Group { .. }), "{subject}");
    }

    assert!(outside.join("keep.json").exists());
    assert!(store.ensure_subject("../escape").await.is_err());
}

#[test]
fn test_valid_components() {
    assert!(is_valid_component("1349149096909668363"));
    assert!(is_valid_component("some.name"));
    for name in ["", ".", "..", "a/b", "a\\b", "../x"] {
        assert!(!is_valid_component(name), "{name}");
    }
}
