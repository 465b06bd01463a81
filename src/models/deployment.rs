use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::state_machine::TestStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentResult {
    Success,
    Failed,
}

impl fmt::Display for DeploymentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Status of one suite (or gate) at the moment a deployment was recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteStatusSnapshot {
    pub id: String,
    pub name: String,
    pub status: TestStatus,
}

/// Deployment is the immutable record of one release placed into one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    pub release_id: String,
    pub environment_id: String,
    pub deployed_at: DateTime<Utc>,
    pub actor: String,
    pub result: DeploymentResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub required_suites: Vec<SuiteStatusSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_suites: Option<Vec<SuiteStatusSnapshot>>,
    pub logs: String,
}

impl Deployment {
    pub fn succeeded(&self) -> bool {
        self.result == DeploymentResult::Success
    }
}
