//! CLI arguments

use crate::types::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Incrementally harvest user timelines into a local results directory
#[derive(Parser, Debug, Clone)]
#[command(name = "timeline-harvest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Names of the groups to collect
    #[arg(short = 'g', long = "groupname", num_args = 1.., default_value = "users")]
    pub groups: Vec<String>,

    /// Roster files, one per group, with one subject id per line
    #[arg(short = 'u', long = "userlist", num_args = 1..)]
    pub rosters: Vec<PathBuf>,

    /// Field selection file copied into every opened group
    #[arg(short = 'c', long = "group-config")]
    pub group_config: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Repeat the collection every MINUTES until interrupted
    #[arg(short = 's', long, value_name = "MINUTES")]
    pub schedule: Option<u64>,

    /// Webhook notified when a run fails
    #[arg(short = 'n', long, value_name = "URL")]
    pub notify: Option<String>,

    /// Credential file
    #[arg(long, default_value = "twitter_keys.yaml")]
    pub credentials: PathBuf,

    /// Settings file (YAML)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Results directory, overrides the settings file
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Page size, overrides the settings file
    #[arg(long, value_parser = clap::value_parser!(u32).range(5..=100))]
    pub max_results: Option<u32>,

    /// Only collect items from the last N days
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    /// Collect the full available history of subjects without a cursor
    #[arg(long)]
    pub all_history: bool,
}

impl Cli {
    /// Pair every group with its roster
    ///
    /// Rosters are optional, but if given there must be one per group.
    pub fn group_specs(&self) -> crate::error::Result<Vec<(String, Option<PathBuf>)>> {
        if self.rosters.is_empty() {
            return Ok(self.groups.iter().map(|g| (g.clone(), None)).collect());
        }
        if self.rosters.len() != self.groups.len() {
            return Err(crate::error::Error::config(format!(
                "{} group names but {} user lists given; pass one user list per group",
                self.groups.len(),
                self.rosters.len()
            )));
        }
        Ok(self
            .groups
            .iter()
            .cloned()
            .zip(self.rosters.iter().cloned().map(Some))
            .collect())
    }
}
