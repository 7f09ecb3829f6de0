use std::sync::Arc;

use anyhow::Result;
use jiff::Timestamp;
use serde::Serialize;
use tracing::info;

use crate::collector::{self, StatusMap};
use crate::config::Config;
use crate::fetch::fetch_deployments;
use crate::models::Deployment;
use crate::output::Output;
use crate::resolver::StatusResolver;
use crate::source::{DeploymentSource, StatusSource};
use crate::stats::{self, Stats};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cohort {
    All,
    Old,
    New,
}

impl Cohort {
    /// Word used in the printed summary; empty for the ungrouped report.
    pub fn label(self) -> &'static str {
        match self {
            Cohort::All => "",
            Cohort::Old => "old",
            Cohort::New => "new",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GroupStats {
    pub cohort: Cohort,
    pub stats: Stats,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub repository: String,
    pub environment: String,
    pub fetched: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cutoff: Option<Timestamp>,
    pub groups: Vec<GroupStats>,
}

pub async fn run(
    config: &Config,
    deployments: Arc<dyn DeploymentSource>,
    statuses: Arc<dyn StatusSource>,
    output: &Output,
) -> Result<Report> {
    let records = fetch_deployments(
        deployments.as_ref(),
        &config.query,
        config.max_deployments,
    )
    .await?;
    info!(count = records.len(), environment = %config.query.environment, "fetched deployments");
    output.fetched(records.len(), &config.query.environment)?;

    let progress = output.progress();
    let resolver = Arc::new(StatusResolver::new(
        statuses,
        config.query.repo.clone(),
        Arc::clone(&progress),
    ));

    progress.start();
    let resolved = collector::collect(resolver, &records, config.concurrency).await;
    progress.finish();

    Ok(build(config, &records, &resolved?))
}

/// Aggregates resolved statuses, split by the cutoff when one is set.
pub fn build(config: &Config, deployments: &[Deployment], statuses: &StatusMap) -> Report {
    let groups = match config.cutoff {
        Some(cutoff) => {
            let (older, newer) = stats::split(deployments, cutoff);
            vec![
                GroupStats {
                    cohort: Cohort::Old,
                    stats: stats::aggregate(&older, statuses),
                },
                GroupStats {
                    cohort: Cohort::New,
                    stats: stats::aggregate(&newer, statuses),
                },
            ]
        }
        None => vec![GroupStats {
            cohort: Cohort::All,
            stats: stats::aggregate(deployments, statuses),
        }],
    };

    Report {
        repository: config.query.repo.to_string(),
        environment: config.query.environment.clone(),
        fetched: deployments.len(),
        cutoff: config.cutoff,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use anyhow::bail;
    use async_trait::async_trait;
    use jiff::SignedDuration;

    use super::*;
    use crate::models::{DeploymentId, DeploymentStatus, RepoRef, StatusState};
    use crate::source::{DeploymentQuery, Page, PageRequest};

    fn t0() -> Timestamp {
        "2024-05-01T12:00:00Z".parse().unwrap()
    }

    fn at(secs: i64) -> Timestamp {
        t0() + SignedDuration::from_secs(secs)
    }

    fn config(cutoff: Option<Timestamp>) -> Config {
        Config {
            query: DeploymentQuery {
                repo: RepoRef::new("acme", "web"),
                environment: "production".to_string(),
            },
            cutoff,
            max_deployments: 500,
            concurrency: 2,
            api_url: "http://unused".to_string(),
            token: None,
            timeout: Duration::from_secs(1),
            json: true,
        }
    }

    struct FakeGitHub {
        deployments: Vec<Deployment>,
        statuses: HashMap<DeploymentId, Vec<DeploymentStatus>>,
        broken: Option<DeploymentId>,
    }

    #[async_trait]
    impl DeploymentSource for FakeGitHub {
        async fn list_deployments(
            &self,
            _query: &DeploymentQuery,
            _page: PageRequest,
        ) -> Result<Page<Deployment>> {
            Ok(Page {
                items: self.deployments.clone(),
                next: None,
            })
        }
    }

    #[async_trait]
    impl StatusSource for FakeGitHub {
        async fn list_statuses(
            &self,
            _repo: &RepoRef,
            id: DeploymentId,
        ) -> Result<Vec<DeploymentStatus>> {
            if self.broken == Some(id) {
                bail!("502 Bad Gateway");
            }
            Ok(self.statuses.get(&id).cloned().unwrap_or_default())
        }
    }

    fn fake(broken: Option<u64>) -> Arc<FakeGitHub> {
        Arc::new(FakeGitHub {
            deployments: vec![
                Deployment::new(1, at(0)),
                Deployment::new(2, at(60)),
                Deployment::new(3, at(120)),
            ],
            statuses: HashMap::from([
                (
                    DeploymentId::new(1),
                    vec![DeploymentStatus::new(StatusState::Success, at(30))],
                ),
                (
                    DeploymentId::new(3),
                    vec![
                        DeploymentStatus::new(StatusState::Failure, at(130)),
                        DeploymentStatus::new(StatusState::Success, at(210)),
                    ],
                ),
            ]),
            broken: broken.map(DeploymentId::new),
        })
    }

    #[tokio::test]
    async fn test_run_without_cutoff() {
        let github = fake(None);

        let report = run(&config(None), github.clone(), github, &Output::new(true))
            .await
            .unwrap();

        assert_eq!(report.fetched, 3);
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].cohort, Cohort::All);
        assert_eq!(
            report.groups[0].stats,
            Stats {
                total: 2,
                avg_duration_secs: 60,
                min_duration_secs: 30,
                max_duration_secs: 90,
            }
        );
    }

    #[tokio::test]
    async fn test_run_with_cutoff() {
        let github = fake(None);

        let report = run(&config(Some(at(60))), github.clone(), github, &Output::new(true))
            .await
            .unwrap();

        let cohorts: Vec<Cohort> = report.groups.iter().map(|g| g.cohort).collect();
        assert_eq!(cohorts, vec![Cohort::Old, Cohort::New]);
        assert_eq!(report.groups[0].stats.total, 1);
        assert_eq!(report.groups[0].stats.avg_duration_secs, 30);
        assert_eq!(report.groups[1].stats.total, 1);
        assert_eq!(report.groups[1].stats.avg_duration_secs, 90);
    }

    #[tokio::test]
    async fn test_run_surfaces_lookup_failure() {
        let github = fake(Some(2));

        let err = run(&config(None), github.clone(), github, &Output::new(true))
            .await
            .unwrap_err();

        let message = format!("{err:#}");
        assert!(message.contains("deployment 2"));
        assert!(message.contains("502 Bad Gateway"));
    }

    #[test]
    fn test_report_json_shape() {
        let report = build(&config(None), &[], &StatusMap::new());

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["repository"], "acme/web");
        assert_eq!(json["groups"][0]["cohort"], "all");
        assert_eq!(json["groups"][0]["stats"]["total"], 0);
        assert!(json.get("cutoff").is_none());
    }
}
