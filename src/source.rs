//! Seams between the report pipeline and wherever deployments come from.
//!
//! The GitHub REST client implements both traits; tests substitute
//! in-memory fakes.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Deployment, DeploymentId, DeploymentStatus, RepoRef};

/// Which deployments to list.
#[derive(Debug, Clone)]
pub struct DeploymentQuery {
    pub repo: RepoRef,
    pub environment: String,
}

/// One page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of the following page, `None` on the last one.
    pub next: Option<u32>,
}

#[async_trait]
pub trait DeploymentSource: Send + Sync {
    async fn list_deployments(
        &self,
        query: &DeploymentQuery,
        page: PageRequest,
    ) -> Result<Page<Deployment>>;
}

#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Statuses recorded against one deployment, in the source's own order.
    async fn list_statuses(
        &self,
        repo: &RepoRef,
        id: DeploymentId,
    ) -> Result<Vec<DeploymentStatus>>;
}
