use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::{DeploymentId, DeploymentStatus, RepoRef};
use crate::progress::Progress;
use crate::source::StatusSource;

/// Finds the status at which a deployment became successful.
pub struct StatusResolver {
    source: Arc<dyn StatusSource>,
    repo: RepoRef,
    progress: Arc<dyn Progress>,
}

impl StatusResolver {
    pub fn new(source: Arc<dyn StatusSource>, repo: RepoRef, progress: Arc<dyn Progress>) -> Self {
        Self {
            source,
            repo,
            progress,
        }
    }

    /// Returns the first `success` status in source order, or `None` when the
    /// deployment never succeeded. Lookup failures are errors, never `None`.
    pub async fn resolve(&self, id: DeploymentId) -> Result<Option<DeploymentStatus>> {
        let statuses = self
            .source
            .list_statuses(&self.repo, id)
            .await
            .with_context(|| format!("Failed to fetch statuses for deployment {id}"))?;

        self.progress.tick();

        let latest = statuses.first().map(DeploymentStatus::state);
        let success = statuses.into_iter().find(DeploymentStatus::is_success);
        debug!(
            deployment = %id,
            latest = latest.as_ref().map_or("none", |state| state.as_ref()),
            found = success.is_some(),
            "resolved status"
        );
        Ok(success)
    }
}
