//! CLI module
//!
//! Command-line interface of the harvester. One invocation opens the
//! requested groups, collects them once (or on a schedule) and exits.

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::{prompt_credentials, Runner};

#[cfg(test)]
mod tests;
