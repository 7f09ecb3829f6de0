use anyhow::{Result, bail};
use tokio::process::Command;
use tracing::debug;

/// Picks the first non-blank token, otherwise asks the GitHub CLI.
pub async fn resolve_token<I>(candidates: I) -> Result<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    if let Some(token) = first_token(candidates) {
        return Ok(token);
    }

    match gh_auth_token().await {
        Some(token) => Ok(token),
        None => bail!("Error getting GitHub auth token. Set GH_TOKEN or run 'gh auth login'."),
    }
}

fn first_token<I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(|token| token.trim().to_owned())
        .find(|token| !token.is_empty())
}

async fn gh_auth_token() -> Option<String> {
    let output = match Command::new("gh").args(["auth", "token"]).output().await {
        Ok(output) => output,
        Err(e) => {
            debug!(error = %e, "could not run gh");
            return None;
        }
    };

    if !output.status.success() {
        debug!(
            status = %output.status,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "gh auth token failed"
        );
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    (!token.is_empty()).then_some(token)
}
