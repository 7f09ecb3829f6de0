use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "leadtime")]
#[command(
    about = "Deployment lead-time statistics for a GitHub environment",
    long_about = None
)]
pub struct Cli {
    /// GitHub repository owner
    pub owner: String,

    /// GitHub repository name
    pub repo: String,

    /// Deployment environment
    pub environment: String,

    /// Cutoff timestamp (RFC 3339) dividing results into old and new groups
    #[arg(long)]
    pub cutoff: Option<String>,

    /// Total number of deployments to consider, 0 for all [default: 500]
    #[arg(long)]
    pub deployments: Option<usize>,

    /// Maximum number of status lookups in flight [default: 10]
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// GitHub API base URL [default: https://api.github.com]
    #[arg(long, env = "LEADTIME_API_URL")]
    pub api_url: Option<String>,

    /// GitHub token; falls back to GITHUB_TOKEN, then `gh auth token`
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
