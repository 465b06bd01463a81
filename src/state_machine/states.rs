use serde::{Deserialize, Serialize};
use std::fmt;

/// Release lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseStatus {
    /// Created without a deploy target
    Draft,
    /// Created for auto-deploy, waiting on its first deployment
    Ready,
    /// Promoted all the way to production
    Deployed,
    /// Marked broken; never selectable for deploy
    Failed,
}

impl ReleaseStatus {
    /// Only draft and ready releases show up in the deploy picker
    pub fn is_deployable(&self) -> bool {
        matches!(self, Self::Draft | Self::Ready)
    }

    /// Rank used to keep transitions one-directional
    fn rank(&self) -> u8 {
        match self {
            Self::Draft => 0,
            Self::Ready => 1,
            Self::Deployed | Self::Failed => 2,
        }
    }

    /// Whether moving from `self` to `next` would downgrade the release
    pub fn can_advance_to(&self, next: ReleaseStatus) -> bool {
        next.rank() >= self.rank() && !(self.rank() == 2 && *self != next)
    }
}

impl fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Ready => write!(f, "ready"),
            Self::Deployed => write!(f, "deployed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ReleaseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "ready" => Ok(Self::Ready),
            "deployed" => Ok(Self::Deployed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid release status: {s}")),
        }
    }
}

/// Test suite (and test gate) run states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Never run, or waiting for a run
    Pending,
    /// A simulated run is in flight; counts are stale
    Running,
    /// Last run passed
    Passed,
    /// Last run had failures
    Failed,
}

impl TestStatus {
    /// Check if this is a resolved state
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed)
    }

    /// Check if a run is in flight
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for TestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "passed" => Ok(Self::Passed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid test status: {s}")),
        }
    }
}

/// Default state for new releases
impl Default for ReleaseStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// Default state for new test suites
impl Default for TestStatus {
    fn default() -> Self {
        Self::Pending
    }
}
