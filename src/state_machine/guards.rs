use crate::error::{WorkflowError, WorkflowResult};
use crate::gates::{GateLedger, GateSubject};
use crate::models::{EnvironmentName, Release};
use crate::state_machine::ReleaseStatus;

/// Trait for implementing deploy preconditions
pub trait StateGuard<T: ?Sized> {
    /// Check if the transition is allowed
    fn check(&self, entity: &T) -> WorkflowResult<()>;

    /// Get a description of this guard for logging
    fn description(&self) -> &'static str;
}

/// Gate lookup for one subject against one environment
#[derive(Debug, Clone, Copy)]
pub struct GateCheck<'a> {
    pub subject: &'a GateSubject,
    pub environment: EnvironmentName,
    pub ledger: &'a GateLedger,
}

/// A release about to be placed into an environment
#[derive(Debug, Clone, Copy)]
pub struct DeployTarget<'a> {
    pub release: &'a Release,
    pub environment: EnvironmentName,
}

/// Guard to check the release may be deployed to the target
///
/// `draft` and `ready` releases go anywhere. A `deployed` release may only
/// be redeployed to an environment it already reached, which leaves the
/// environment state unchanged apart from a new record.
pub struct ReleaseEligibleGuard;

impl StateGuard<DeployTarget<'_>> for ReleaseEligibleGuard {
    fn check(&self, target: &DeployTarget<'_>) -> WorkflowResult<()> {
        let release = target.release;
        let redeploy = release.status == ReleaseStatus::Deployed
            && release.is_deployed_to(target.environment);

        if release.status.is_deployable() || redeploy {
            Ok(())
        } else {
            Err(WorkflowError::ReleaseNotEligible {
                release_id: release.id.clone(),
                status: release.status.to_string(),
            })
        }
    }

    fn description(&self) -> &'static str {
        "Release must be draft or ready, or already live in the target"
    }
}

/// Guard to check every required gate passed for the subject
pub struct TestGatesPassedGuard;

impl StateGuard<GateCheck<'_>> for TestGatesPassedGuard {
    fn check(&self, gate: &GateCheck<'_>) -> WorkflowResult<()> {
        let missing = gate.ledger.missing_gates(gate.subject, gate.environment);

        if missing.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            subject = %gate.subject,
            environment = %gate.environment,
            missing = ?missing,
            "Test gates not satisfied"
        );

        Err(WorkflowError::GatesNotSatisfied {
            environment: gate.environment,
            missing,
            release_id: None,
        })
    }

    fn description(&self) -> &'static str {
        "Required test gates must have passed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewRelease;
    use crate::state_machine::TestStatus;
    use chrono::Utc;

    fn release(status: ReleaseStatus) -> Release {
        Release::from_new(
            NewRelease {
                name: "v2.0".to_string(),
                branch: "main".to_string(),
                notes: None,
                status,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_guard_descriptions() {
        assert_eq!(
            ReleaseEligibleGuard.description(),
            "Release must be draft or ready, or already live in the target"
        );
        assert_eq!(
            TestGatesPassedGuard.description(),
            "Required test gates must have passed"
        );
    }

    fn target(release: &Release, environment: EnvironmentName) -> DeployTarget<'_> {
        DeployTarget {
            release,
            environment,
        }
    }

    #[test]
    fn test_release_eligibility() {
        let ready = release(ReleaseStatus::Ready);
        let draft = release(ReleaseStatus::Draft);
        assert!(ReleaseEligibleGuard.check(&target(&ready, EnvironmentName::Prod)).is_ok());
        assert!(ReleaseEligibleGuard.check(&target(&draft, EnvironmentName::Dev)).is_ok());

        let deployed = release(ReleaseStatus::Deployed);
        let err = ReleaseEligibleGuard
            .check(&target(&deployed, EnvironmentName::Dev))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ReleaseNotEligible { ref status, .. } if status == "deployed"));

        let failed = release(ReleaseStatus::Failed);
        assert!(ReleaseEligibleGuard.check(&target(&failed, EnvironmentName::Dev)).is_err());
    }

    #[test]
    fn test_deployed_release_may_repeat_a_target() {
        let mut live = release(ReleaseStatus::Deployed);
        live.mark_deployed_to(EnvironmentName::Prod);

        assert!(ReleaseEligibleGuard.check(&target(&live, EnvironmentName::Prod)).is_ok());
        assert!(ReleaseEligibleGuard.check(&target(&live, EnvironmentName::Stage)).is_err());

        let mut failed = release(ReleaseStatus::Failed);
        failed.mark_deployed_to(EnvironmentName::Prod);
        assert!(ReleaseEligibleGuard.check(&target(&failed, EnvironmentName::Prod)).is_err());
    }

    #[test]
    fn test_gate_guard() {
        let mut ledger = GateLedger::new();
        let subject = GateSubject::release("rel-1");

        let check = GateCheck {
            subject: &subject,
            environment: EnvironmentName::Dev,
            ledger: &ledger,
        };
        assert!(TestGatesPassedGuard.check(&check).is_ok());

        let check = GateCheck {
            environment: EnvironmentName::Prod,
            ..check
        };
        let err = TestGatesPassedGuard.check(&check).unwrap_err();
        assert!(err.is_gate_failure());

        ledger.record(subject.clone(), EnvironmentName::Prod, TestStatus::Passed, Utc::now());
        let check = GateCheck {
            subject: &subject,
            environment: EnvironmentName::Prod,
            ledger: &ledger,
        };
        assert!(TestGatesPassedGuard.check(&check).is_ok());
    }
}
