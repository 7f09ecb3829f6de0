use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// GitHub's numeric deployment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(u64);

impl DeploymentId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DeploymentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    id: DeploymentId,
    created_at: Timestamp,
}

impl Deployment {
    pub fn new(id: impl Into<DeploymentId>, created_at: Timestamp) -> Self {
        Self {
            id: id.into(),
            created_at,
        }
    }

    pub fn id(&self) -> DeploymentId {
        self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}
