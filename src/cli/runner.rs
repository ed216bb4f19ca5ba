//! CLI runner - executes a harvest

use crate::auth::{read_credentials, save_credentials, session, Credentials};
use crate::cli::commands::Cli;
use crate::config::HarvestSettings;
use crate::engine::{CollectOptions, Collector, TracingSink};
use crate::error::{Error, Result};
use crate::group::{GroupOptions, UserGroup};
use crate::http::ApiClient;
use crate::notify::Notifier;
use crate::retry::RetryPolicy;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Subject line of failure notifications
const FAILURE_SUBJECT: &str = "timeline-harvest run failed";

/// CLI runner
pub struct Runner {
    cli: Cli,
    cancel: CancellationToken,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            cancel: CancellationToken::new(),
        }
    }

    /// Token cancelling the run between subjects and pages
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Run the harvest, notifying the webhook if it fails
    pub async fn run(&self) -> Result<()> {
        let notifier = self.cli.notify.as_deref().map(Notifier::new).transpose()?;

        let result = self.harvest().await;
        if let (Err(e), Some(notifier)) = (&result, &notifier) {
            notifier.send(FAILURE_SUBJECT, &e.to_string()).await;
        }
        result
    }

    /// Settings from the settings file with CLI overrides applied
    pub fn settings(&self) -> Result<HarvestSettings> {
        let mut settings = match &self.cli.settings {
            Some(path) => HarvestSettings::from_file(path)?,
            None => HarvestSettings::default(),
        };
        if let Some(root) = &self.cli.root {
            settings.results_root.clone_from(root);
        }
        if let Some(max_results) = self.cli.max_results {
            settings.max_results_per_call = max_results;
        }
        settings.validate()?;
        Ok(settings)
    }

    /// Read the credential file, asking for keys on stdin if it is missing
    fn credentials(&self) -> Result<Credentials> {
        let path = &self.cli.credentials;
        if !path.exists() {
            tracing::info!(path = %path.display(), "Credential file not found, asking for keys");
            let stdin = std::io::stdin();
            let (key, secret) = prompt_credentials(&mut stdin.lock(), &mut std::io::stderr())?;
            save_credentials(path, &key, &secret)?;
        }
        read_credentials(path)
    }

    async fn harvest(&self) -> Result<()> {
        let specs = self.cli.group_specs()?;
        let settings = self.settings()?;
        let credentials = self.credentials()?;
        let client: Arc<dyn ApiClient> = Arc::new(session(&credentials, &settings)?);

        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, stopping after the current page");
                cancel.cancel();
            }
        });

        let mut groups = Vec::with_capacity(specs.len());
        for (name, roster) in specs {
            let options = GroupOptions {
                roster,
                config: self.cli.group_config.clone(),
                backfill: self.cli.all_history,
            };
            groups.push(UserGroup::open(&settings.results_root, &name, options).await?);
        }

        let collector = Collector::new(
            client,
            RetryPolicy::from(&settings.retry),
            Arc::new(TracingSink),
        )
        .with_options(
            CollectOptions::new()
                .with_max_results(settings.max_results_per_call)
                .with_days(self.cli.days),
        )
        .with_cancel(self.cancel.clone());

        loop {
            for group in &mut groups {
                let stats = collector.collect(group).await?;
                if stats.cancelled {
                    return Ok(());
                }
            }

            let Some(minutes) = self.cli.schedule else {
                return Ok(());
            };
            tracing::info!(minutes, "Waiting for the next scheduled run");
            tokio::select! {
                () = self.cancel.cancelled() => return Ok(()),
                () = tokio::time::sleep(Duration::from_secs(minutes * 60)) => {}
            }
        }
    }
}

/// Ask for an API key and secret
pub fn prompt_credentials<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<(String, String)> {
    let mut ask = |prompt: &str| -> Result<String> {
        write!(output, "{prompt}: ")?;
        output.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        let value = line.trim().to_string();
        if value.is_empty() {
            return Err(Error::auth(format!("{prompt} must not be empty")));
        }
        Ok(value)
    };

    let key = ask("API key")?;
    let secret = ask("API secret")?;
    Ok((key, secret))
}
