use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EnvironmentName;
use crate::state_machine::ReleaseStatus;

/// Release represents a named artifact cut from a branch at a commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub name: String,
    pub branch: String,
    pub commit: String,
    pub commit_message: String,
    pub created_at: DateTime<Utc>,
    pub status: ReleaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deployed_to: Vec<EnvironmentName>,
}

/// New Release for creation (without generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRelease {
    pub name: String,
    pub branch: String,
    pub notes: Option<String>,
    pub status: ReleaseStatus,
}

impl Release {
    /// Build a release record from creation input, generating id and commit
    pub fn from_new(new_release: NewRelease, created_at: DateTime<Utc>) -> Self {
        let id = Uuid::new_v4().simple().to_string();
        let commit = Uuid::new_v4().simple().to_string()[..7].to_string();
        let commit_message = format!("Cut release {} from {}", new_release.name, new_release.branch);

        Self {
            id: format!("rel-{}", &id[..12]),
            name: new_release.name,
            branch: new_release.branch,
            commit,
            commit_message,
            created_at,
            status: new_release.status,
            notes: new_release.notes.filter(|n| !n.trim().is_empty()),
            deployed_to: Vec::new(),
        }
    }

    pub fn is_deployed_to(&self, environment: EnvironmentName) -> bool {
        self.deployed_to.contains(&environment)
    }

    /// Record a deployment target, keeping the list free of duplicates
    pub fn mark_deployed_to(&mut self, environment: EnvironmentName) {
        if !self.is_deployed_to(environment) {
            self.deployed_to.push(environment);
        }
    }

    /// Advance the status; downgrades are ignored
    pub fn advance_status(&mut self, next: ReleaseStatus) -> bool {
        if self.status.can_advance_to(next) {
            self.status = next;
            true
        } else {
            false
        }
    }
}
