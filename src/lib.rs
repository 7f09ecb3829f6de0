#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

pub mod auth;
pub mod cli;
pub mod collector;
pub mod commands;
pub mod config;
pub mod fetch;
pub mod github;
pub mod helpers;
pub mod models;
pub mod output;
pub mod progress;
pub mod resolver;
pub mod source;
pub mod stats;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use github::GitHubClient;
use output::Output;

/// Logs go to stderr so stdout stays clean for the report.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "leadtime=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub async fn run(cli: Cli) -> Result<()> {
    let file = config::load()?;
    let config = Config::resolve(cli, file)?;

    let token = auth::resolve_token([
        config.token.clone(),
        std::env::var("GITHUB_TOKEN").ok(),
    ])
    .await?;
    let client = Arc::new(
        GitHubClient::new(&config.api_url, &token, config.timeout)
            .context("Failed to create GitHub client")?,
    );

    let output = Output::new(config.json);
    let report = commands::report::run(&config, client.clone(), client, &output).await?;
    output.report(&report)
}
