use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::EnvironmentName;
use crate::state_machine::TestStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Unit,
    Workflow,
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "unit"),
            Self::Workflow => write!(f, "workflow"),
        }
    }
}

/// TestSuite is a simulated group of tests bound to one environment
///
/// While `status` is `running` the counts still hold the previous run's
/// values and must not be read as results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub suite_type: TestType,
    pub environment: EnvironmentName,
    pub status: TestStatus,
    pub passed: u32,
    pub failed: u32,
    pub total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_id: Option<String>,
}

impl TestSuite {
    /// Counts are only meaningful once a run has resolved
    pub fn results(&self) -> Option<(u32, u32)> {
        if self.status.is_resolved() {
            Some((self.passed, self.failed))
        } else {
            None
        }
    }

    pub fn counts_consistent(&self) -> bool {
        self.passed.saturating_add(self.failed) <= self.total
    }

    /// Whether this suite backs the given gate label (`Unit Tests` covers `Unit Tests - API`)
    pub fn matches_gate(&self, gate: &str) -> bool {
        self.name.starts_with(gate)
    }
}
