//! Bounded fan-out of status lookups.
//!
//! Every deployment gets its own task. A semaphore admits at most
//! `max_concurrency` lookups at a time; each task hands its permit back as soon
//! as its lookup returns and then publishes exactly one outcome on a channel.
//! The caller drains that channel into a [`StatusMap`].
//!
//! The first error received wins. With several concurrent failures, which one
//! arrives first depends on scheduling and is not deterministic. Outcomes still
//! in flight are discarded, but every spawned task is joined before
//! [`collect`] returns, so nothing outlives the call.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tracing::debug;

use crate::models::{Deployment, DeploymentId, DeploymentStatus};
use crate::resolver::StatusResolver;

pub const DEFAULT_CONCURRENCY: usize = 10;

/// Success status per deployment; `None` when it never succeeded.
pub type StatusMap = HashMap<DeploymentId, Option<DeploymentStatus>>;

type Outcome = (DeploymentId, Result<Option<DeploymentStatus>>);

pub async fn collect(
    resolver: Arc<StatusResolver>,
    deployments: &[Deployment],
    max_concurrency: usize,
) -> Result<StatusMap> {
    if max_concurrency == 0 {
        bail!("Concurrency must be at least 1");
    }
    if deployments.is_empty() {
        return Ok(StatusMap::new());
    }

    debug!(
        deployments = deployments.len(),
        max_concurrency, "collecting deployment statuses"
    );

    // More permits than tasks admits nothing extra.
    let gate = Arc::new(Semaphore::new(max_concurrency.min(deployments.len())));
    // One slot per task, so publishing never waits on the reader.
    let (tx, mut rx) = mpsc::channel::<Outcome>(deployments.len());
    let mut tasks = JoinSet::new();

    for deployment in deployments {
        let id = deployment.id();
        let resolver = Arc::clone(&resolver);
        let gate = Arc::clone(&gate);
        let tx = tx.clone();

        tasks.spawn(async move {
            let outcome = match gate.acquire_owned().await {
                Ok(permit) => {
                    let outcome = resolver.resolve(id).await;
                    drop(permit);
                    outcome
                }
                Err(e) => Err(e.into()),
            };
            // Fails only once the reader has stopped after an error.
            let _ = tx.send((id, outcome)).await;
        });
    }
    drop(tx);

    let mut statuses = StatusMap::with_capacity(deployments.len());
    let mut received = 0usize;
    let mut failure = None;

    while let Some((id, outcome)) = rx.recv().await {
        received += 1;
        match outcome {
            Ok(status) => {
                statuses.insert(id, status);
            }
            Err(e) => {
                debug!(deployment = %id, received, "status lookup failed");
                failure = Some(e);
                break;
            }
        }
    }
    drop(rx);

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            failure.get_or_insert_with(|| anyhow!("Status lookup task failed: {e}"));
        }
    }

    if let Some(e) = failure {
        return Err(e);
    }

    debug!(resolved = statuses.len(), "collected deployment statuses");
    Ok(statuses)
}
