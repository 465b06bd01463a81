pub mod deployment;
pub mod environment;
pub mod release;
pub mod test_suite;

// Re-export core models for easy access
pub use deployment::{Deployment, DeploymentResult, SuiteStatusSnapshot};
pub use environment::{Environment, EnvironmentName, HealthStatus};
pub use release::{NewRelease, Release};
pub use test_suite::{TestSuite, TestType};

pub use crate::state_machine::{ReleaseStatus, TestStatus};
