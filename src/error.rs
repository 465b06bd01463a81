use crate::models::EnvironmentName;

/// Errors raised by the release, deploy and test-run workflows.
///
/// Every variant is a validation or addressing failure reported back to the
/// caller. None of them are retried and none leave the store half-written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Unknown release: {release_id}")]
    UnknownRelease { release_id: String },

    #[error("Unknown test suite: {suite_id}")]
    UnknownSuite { suite_id: String },

    #[error("Release {release_id} is {status} and cannot be deployed")]
    ReleaseNotEligible { release_id: String, status: String },

    /// Required test gates have not passed for the environment.
    ///
    /// `release_id` is set when the release was created anyway (auto-deploy
    /// from the release workflow) so the caller can find the draft.
    #[error("Required tests not passed for {environment}: {}", missing.join(", "))]
    GatesNotSatisfied {
        environment: EnvironmentName,
        missing: Vec<String>,
        release_id: Option<String>,
    },

    #[error("Invalid state transition from {from} on {event}")]
    InvalidTransition { from: String, event: String },

    #[error("Simulation error: {0}")]
    Simulation(String),
}

impl WorkflowError {
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// True for the plain field-level validation failures
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }

    /// True when the failure is an unmet test-gate precondition
    pub fn is_gate_failure(&self) -> bool {
        matches!(self, Self::GatesNotSatisfied { .. })
    }
}

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_error_lists_missing_gates() {
        let err = WorkflowError::GatesNotSatisfied {
            environment: EnvironmentName::Stage,
            missing: vec!["Unit Tests".to_string(), "Workflow Tests - Auth".to_string()],
            release_id: None,
        };
        assert_eq!(
            err.to_string(),
            "Required tests not passed for stage: Unit Tests, Workflow Tests - Auth"
        );
        assert!(err.is_gate_failure());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_missing_field_message() {
        let err = WorkflowError::missing_field("branch");
        assert_eq!(err.to_string(), "Missing required field: branch");
        assert!(err.is_validation());
    }
}
