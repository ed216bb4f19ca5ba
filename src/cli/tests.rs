//! Tests for the CLI

use super::*;
use crate::error::Error;
use crate::types::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_defaults() {
    let cli = Cli::try_parse_from(["timeline-harvest"]).unwrap();

    assert_eq!(cli.groups, vec!["users"]);
    assert!(cli.rosters.is_empty());
    assert_eq!(cli.log_level, LogLevel::Info);
    assert_eq!(cli.credentials, PathBuf::from("twitter_keys.yaml"));
    assert_eq!(cli.schedule, None);
    assert!(!cli.all_history);
    assert_eq!(cli.group_specs().unwrap(), vec![("users".to_string(), None)]);
}

#[test]
fn test_groups_with_rosters() {
    let cli = Cli::try_parse_from([
        "timeline-harvest",
        "-g",
        "politicians",
        "journalists",
        "-u",
        "politicians.txt",
        "journalists.txt",
        "-l",
        "DEBUG",
        "-s",
        "15",
    ])
    .unwrap();

    assert_eq!(cli.log_level, LogLevel::Debug);
    assert_eq!(cli.schedule, Some(15));
    assert_eq!(
        cli.group_specs().unwrap(),
        vec![
            (
                "politicians".to_string(),
                Some(PathBuf::from("politicians.txt"))
            ),
            (
                "journalists".to_string(),
                Some(PathBuf::from("journalists.txt"))
            ),
        ]
    );
}

#[test]
fn test_roster_count_must_match_groups() {
    let cli = Cli::try_parse_from(["timeline-harvest", "-g", "a", "b", "-u", "a.txt"]).unwrap();
    assert!(matches!(cli.group_specs(), Err(Error::Config { .. })));
}

#[test]
fn test_max_results_range() {
    assert!(Cli::try_parse_from(["timeline-harvest", "--max-results", "101"]).is_err());
    assert!(Cli::try_parse_from(["timeline-harvest", "--max-results", "4"]).is_err());
    let cli = Cli::try_parse_from(["timeline-harvest", "--max-results", "50"]).unwrap();
    assert_eq!(cli.max_results, Some(50));
}

#[test]
fn test_settings_overrides() {
    let cli = Cli::try_parse_from([
        "timeline-harvest",
        "--root",
        "/tmp/harvest",
        "--max-results",
        "20",
    ])
    .unwrap();

    let settings = Runner::new(cli).settings().unwrap();
    assert_eq!(settings.results_root, PathBuf::from("/tmp/harvest"));
    assert_eq!(settings.max_results_per_call, 20);
}

#[test]
fn test_prompt_credentials() {
    let mut input = "my-key\n  my-secret  \n".as_bytes();
    let mut output = Vec::new();

    let (key, secret) = prompt_credentials(&mut input, &mut output).unwrap();

    assert_eq!(key, "my-key");
    assert_eq!(secret, "my-secret");
    assert_eq!(
        String::from_utf8(output).unwrap(),
        "API key: API secret: "
    );
}

#[test]
fn test_prompt_credentials_empty_input() {
    let mut input = "\n".as_bytes();
    let err = prompt_credentials(&mut input, &mut Vec::<u8>::new()).unwrap_err();
    assert!(matches!(err, Error::Auth { .. }));
}
