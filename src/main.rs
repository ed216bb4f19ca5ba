// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

//! timeline-harvest CLI
//!
//! Command-line interface for collecting user timelines

use clap::Parser;
use timeline_harvest::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::from(cli.log_level).into()),
        )
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        tracing::error!(error = %e, "Harvest failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
