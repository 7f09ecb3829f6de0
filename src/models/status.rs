use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusState {
    Error,
    Failure,
    Inactive,
    InProgress,
    Queued,
    Pending,
    Success,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    state: StatusState,
    created_at: Timestamp,
}

impl DeploymentStatus {
    pub fn new(state: StatusState, created_at: Timestamp) -> Self {
        Self { state, created_at }
    }

    pub fn state(&self) -> StatusState {
        self.state
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn is_success(&self) -> bool {
        self.state == StatusState::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_state_deserializes_as_unknown() {
        let status: DeploymentStatus =
            serde_json::from_str(r#"{"state":"destroyed","created_at":"2024-03-01T10:00:00Z"}"#)
                .unwrap();
        assert_eq!(status.state(), StatusState::Unknown);
        assert!(!status.is_success());
    }

    #[test]
    fn test_state_names_match_github() {
        assert_eq!(StatusState::InProgress.as_ref(), "in_progress");
        assert_eq!(
            "success".parse::<StatusState>().unwrap(),
            StatusState::Success
        );
    }
}
