use anyhow::{Context, Result};
use tracing::debug;

use crate::models::Deployment;
use crate::source::{DeploymentQuery, DeploymentSource, PageRequest};

pub const MAX_PER_PAGE: u32 = 100;

/// Pages through `source` until it runs out or `max` deployments are in hand.
/// `max == 0` means no cap.
pub async fn fetch_deployments(
    source: &dyn DeploymentSource,
    query: &DeploymentQuery,
    max: usize,
) -> Result<Vec<Deployment>> {
    let per_page = match u32::try_from(max) {
        Ok(max) if max > 0 && max < MAX_PER_PAGE => max,
        _ => MAX_PER_PAGE,
    };

    let mut deployments = Vec::new();
    let mut request = PageRequest { page: 1, per_page };

    loop {
        let page = source
            .list_deployments(query, request)
            .await
            .with_context(|| {
                format!(
                    "Failed to list deployments for {} ({})",
                    query.repo, query.environment
                )
            })?;
        deployments.extend(page.items);

        let capped = max > 0 && deployments.len() >= max;
        match page.next {
            Some(next) if !capped => request.page = next,
            _ => break,
        }
    }

    if max > 0 {
        deployments.truncate(max);
    }

    debug!(count = deployments.len(), pages = request.page, "fetched deployments");
    Ok(deployments)
}
