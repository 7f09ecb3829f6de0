use jiff::Timestamp;
use serde::Serialize;

use crate::collector::StatusMap;
use crate::models::Deployment;

/// Lead-time summary for a group of deployments. All zero when nothing
/// qualified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub avg_duration_secs: i64,
    pub min_duration_secs: i64,
    pub max_duration_secs: i64,
}

/// Seconds from creation to first success, truncated toward zero. Only
/// strictly positive lead times count; skew and unresolved deployments are
/// skipped.
pub fn aggregate(deployments: &[Deployment], statuses: &StatusMap) -> Stats {
    let durations: Vec<i64> = deployments
        .iter()
        .filter_map(|deployment| {
            let status = statuses.get(&deployment.id())?.as_ref()?;
            let secs = status
                .created_at()
                .duration_since(deployment.created_at())
                .as_secs();
            (secs > 0).then_some(secs)
        })
        .collect();

    let (Some(&min), Some(&max)) = (durations.iter().min(), durations.iter().max()) else {
        return Stats::default();
    };
    let total = durations.len();
    let sum: i64 = durations.iter().sum();

    Stats {
        total,
        avg_duration_secs: sum / i64::try_from(total).unwrap_or(i64::MAX),
        min_duration_secs: min,
        max_duration_secs: max,
    }
}

/// Splits into `(older, newer)`: created strictly before `cutoff` is older,
/// everything else newer. Input order is kept within each side.
pub fn split(deployments: &[Deployment], cutoff: Timestamp) -> (Vec<Deployment>, Vec<Deployment>) {
    deployments
        .iter()
        .cloned()
        .partition(|deployment| deployment.created_at() < cutoff)
}
