mod deployment;
mod repo;
mod status;

pub use deployment::{Deployment, DeploymentId};
pub use repo::RepoRef;
pub use status::{DeploymentStatus, StatusState};
