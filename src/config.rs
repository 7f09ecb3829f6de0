//! Run configuration.
//!
//! Values come from, in order of precedence: command-line flags (and the
//! environment variables clap maps onto them), a `.leadtime.toml` file, and
//! built-in defaults. The file is found through `LEADTIME_CONFIG` or by walking
//! up from the current directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use jiff::Timestamp;
use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::cli::Cli;
use crate::collector::DEFAULT_CONCURRENCY;
use crate::github::DEFAULT_API_URL;
use crate::helpers::find_similar;
use crate::models::RepoRef;
use crate::source::DeploymentQuery;

pub const CONFIG_FILE: &str = ".leadtime.toml";
pub const CONFIG_ENV: &str = "LEADTIME_CONFIG";
pub const DEFAULT_MAX_DEPLOYMENTS: usize = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const FILE_KEYS: &[&str] = &["api_url", "concurrency", "deployments", "timeout_secs"];

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub concurrency: Option<usize>,
    pub deployments: Option<usize>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug)]
pub struct Config {
    pub query: DeploymentQuery,
    pub cutoff: Option<Timestamp>,
    /// 0 means no cap.
    pub max_deployments: usize,
    pub concurrency: usize,
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
    pub json: bool,
}

impl Config {
    pub fn resolve(cli: Cli, file: FileConfig) -> Result<Self> {
        let cutoff = cli
            .cutoff
            .as_deref()
            .map(parse_cutoff)
            .transpose()?;

        let concurrency = cli
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        if concurrency == 0 {
            bail!("Concurrency must be at least 1");
        }
        if concurrency > Semaphore::MAX_PERMITS {
            bail!("Concurrency must be at most {}", Semaphore::MAX_PERMITS);
        }

        let timeout_secs = cli
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("Timeout must be at least 1 second");
        }

        Ok(Self {
            query: DeploymentQuery {
                repo: RepoRef::new(cli.owner, cli.repo),
                environment: cli.environment,
            },
            cutoff,
            max_deployments: cli
                .deployments
                .or(file.deployments)
                .unwrap_or(DEFAULT_MAX_DEPLOYMENTS),
            concurrency,
            api_url: cli
                .api_url
                .or(file.api_url)
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            token: cli.token,
            timeout: Duration::from_secs(timeout_secs),
            json: cli.json,
        })
    }
}

pub fn parse_cutoff(value: &str) -> Result<Timestamp> {
    value
        .parse::<Timestamp>()
        .with_context(|| format!("Invalid cutoff date: {value}"))
}

/// Finds `.leadtime.toml` by walking up from `start`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start;

    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }

        dir = dir.parent()?;
    }
}

/// Loads the file named by `LEADTIME_CONFIG`, or the nearest `.leadtime.toml`.
/// No file at all yields the defaults.
pub fn load() -> Result<FileConfig> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return load_file(Path::new(&path));
    }

    let Some(path) = std::env::current_dir().ok().and_then(|cwd| find_config_file(&cwd)) else {
        return Ok(FileConfig::default());
    };
    load_file(&path)
}

pub fn load_file(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_file(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_file(content: &str) -> Result<FileConfig> {
    let table: toml::Table = toml::from_str(content)?;

    for key in table.keys() {
        if FILE_KEYS.contains(&key.as_str()) {
            continue;
        }
        return Err(match find_similar(key, FILE_KEYS) {
            Some(suggestion) => anyhow!("Unknown config key: {key}\nDid you mean: {suggestion}"),
            None => anyhow!("Unknown config key: {key}"),
        });
    }

    Ok(toml::from_str(content)?)
}
