use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of deployment targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentName {
    Dev,
    Stage,
    Prod,
}

impl EnvironmentName {
    pub const ALL: [EnvironmentName; 3] = [Self::Dev, Self::Stage, Self::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Stage => "stage",
            Self::Prod => "prod",
        }
    }

    /// Human label shown next to the environment
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Dev => "Development",
            Self::Stage => "Staging",
            Self::Prod => "Production",
        }
    }

    /// Stable environment record id (`env-dev`, ...)
    pub fn environment_id(&self) -> String {
        format!("env-{}", self.as_str())
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnvironmentName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Self::Dev),
            "stage" => Ok(Self::Stage),
            "prod" => Ok(Self::Prod),
            _ => Err(format!("Invalid environment: {s}")),
        }
    }
}

/// Environment health as reported on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Environment is a static deployment target with a current-release pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub id: String,
    pub name: EnvironmentName,
    pub display_name: String,
    /// Id of the release considered current; moved only by a deploy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deployed_at: Option<DateTime<Utc>>,
    pub status: HealthStatus,
}

impl Environment {
    /// A healthy environment with nothing deployed yet
    pub fn new(name: EnvironmentName) -> Self {
        Self {
            id: name.environment_id(),
            name,
            display_name: name.display_name().to_string(),
            current_release: None,
            last_deployed_at: None,
            status: HealthStatus::Healthy,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
