//! Deploy Workflow: place a release into an environment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DeployConfig;
use crate::constants::events;
use crate::error::{WorkflowError, WorkflowResult};
use crate::events::EventPublisher;
use crate::gates::{required_gates, GateSubject};
use crate::logging::log_deploy_operation;
use crate::models::{
    Deployment, DeploymentResult, EnvironmentName, Release, SuiteStatusSnapshot,
};
use crate::simulation::Clock;
use crate::state_machine::{
    DeployTarget, GateCheck, ReleaseEligibleGuard, ReleaseStatus, StateGuard,
    TestGatesPassedGuard,
};
use crate::store::{Catalog, DomainStore};

/// Selection made in the deploy sheet; either side may still be unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRequest {
    pub release_id: Option<String>,
    pub environment: Option<EnvironmentName>,
}

impl DeployRequest {
    pub fn new(release_id: impl Into<String>, environment: EnvironmentName) -> Self {
        Self {
            release_id: Some(release_id.into()),
            environment: Some(environment),
        }
    }
}

/// Stable snapshot id for a gate label (`Unit Tests` -> `gate-unit-tests`)
pub fn gate_snapshot_id(gate: &str) -> String {
    let slug = gate
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    format!("gate-{slug}")
}

#[derive(Debug, Clone)]
pub struct DeployWorkflow {
    store: DomainStore,
    clock: Arc<dyn Clock>,
    publisher: EventPublisher,
    config: DeployConfig,
}

impl DeployWorkflow {
    pub fn new(
        store: DomainStore,
        clock: Arc<dyn Clock>,
        publisher: EventPublisher,
        config: DeployConfig,
    ) -> Self {
        Self {
            store,
            clock,
            publisher,
            config,
        }
    }

    /// Deploy the selected release to the selected environment
    ///
    /// On success the deployment record, the environment's current release
    /// and the release's deploy targets are all written under one lock.
    pub fn deploy(&self, request: &DeployRequest) -> WorkflowResult<Deployment> {
        let environment = request
            .environment
            .ok_or_else(|| WorkflowError::missing_field("environment"))?;
        let release_id = request
            .release_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| WorkflowError::missing_field("release"))?;

        let now = self.clock.now();
        let result = self.store.write(|catalog| self.apply(catalog, release_id, environment, now));

        match result {
            Ok((deployment, release_name)) => {
                self.announce(&deployment, &release_name, environment);
                Ok(deployment)
            }
            Err(err) => {
                log_deploy_operation(
                    "deploy",
                    Some(release_id),
                    Some(environment.as_str()),
                    "rejected",
                    Some(&err.to_string()),
                );
                Err(err)
            }
        }
    }

    /// Check and record a deployment against an already locked catalog
    ///
    /// Returns the new record and the release name. Nothing is written when
    /// a guard fails.
    pub(crate) fn apply(
        &self,
        catalog: &mut Catalog,
        release_id: &str,
        environment: EnvironmentName,
        now: DateTime<Utc>,
    ) -> WorkflowResult<(Deployment, String)> {
        let release = catalog
            .release(release_id)
            .ok_or_else(|| WorkflowError::UnknownRelease {
                release_id: release_id.to_string(),
            })?;

        ReleaseEligibleGuard.check(&DeployTarget {
            release,
            environment,
        })?;

        let subject = GateSubject::release(release_id);
        TestGatesPassedGuard.check(&GateCheck {
            subject: &subject,
            environment,
            ledger: &catalog.gates,
        })?;

        let deployment = self.build_deployment(catalog, release, &subject, environment, now);
        let release_name = release.name.clone();

        catalog.deployments.push(deployment.clone());

        let target = catalog.environment_mut(environment);
        target.current_release = Some(release_id.to_string());
        target.last_deployed_at = Some(now);

        if let Some(release) = catalog.release_mut(release_id) {
            release.mark_deployed_to(environment);
            if environment == EnvironmentName::Prod {
                release.advance_status(ReleaseStatus::Deployed);
            }
        }

        Ok((deployment, release_name))
    }

    /// Log and publish a recorded deployment; call after the store lock is released
    pub(crate) fn announce(&self, deployment: &Deployment, release_name: &str, environment: EnvironmentName) {
        log_deploy_operation(
            "deploy",
            Some(&deployment.release_id),
            Some(environment.as_str()),
            &deployment.result.to_string(),
            Some(&deployment.id),
        );
        self.publisher.publish(
            events::DEPLOYMENT_COMPLETED,
            format!("Release \"{release_name}\" deployed to {environment}"),
            json!({
                "deployment_id": deployment.id,
                "release_id": deployment.release_id,
                "environment": environment,
            }),
        );
    }

    fn build_deployment(
        &self,
        catalog: &Catalog,
        release: &Release,
        subject: &GateSubject,
        environment: EnvironmentName,
        now: DateTime<Utc>,
    ) -> Deployment {
        let gates = required_gates(environment);

        let required_suites: Vec<SuiteStatusSnapshot> = gates
            .iter()
            .map(|gate| SuiteStatusSnapshot {
                id: gate_snapshot_id(gate),
                name: gate.to_string(),
                status: catalog.gates.status(subject, environment),
            })
            .collect();

        let optional_suites: Vec<SuiteStatusSnapshot> = catalog
            .test_suites
            .iter()
            .filter(|suite| suite.release_id.as_deref() == Some(release.id.as_str()))
            .filter(|suite| !gates.iter().any(|gate| suite.matches_gate(gate)))
            .map(|suite| SuiteStatusSnapshot {
                id: suite.id.clone(),
                name: suite.name.clone(),
                status: suite.status,
            })
            .collect();

        let stamp = now.to_rfc3339();
        let mut logs = format!(
            "[{stamp}] Starting deployment of {} ({}) to {}\n",
            release.name,
            release.commit,
            environment.display_name()
        );
        if gates.is_empty() {
            logs.push_str(&format!("[{stamp}] No test gates required\n"));
        } else {
            logs.push_str(&format!("[{stamp}] Test gates passed: {}\n", gates.join(", ")));
        }
        if let Some(region) = &self.config.region {
            logs.push_str(&format!("[{stamp}] Target region: {region}\n"));
        }
        logs.push_str(&format!(
            "[{stamp}] Deployment succeeded by {}\n",
            self.config.actor
        ));

        Deployment {
            id: format!("dep-{}", &Uuid::new_v4().simple().to_string()[..12]),
            release_id: release.id.clone(),
            environment_id: environment.environment_id(),
            deployed_at: now,
            actor: self.config.actor.clone(),
            result: DeploymentResult::Success,
            region: self.config.region.clone(),
            required_suites,
            optional_suites: if optional_suites.is_empty() {
                None
            } else {
                Some(optional_suites)
            },
            logs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_snapshot_ids() {
        assert_eq!(gate_snapshot_id("Unit Tests"), "gate-unit-tests");
        assert_eq!(gate_snapshot_id("Workflow Tests - Auth"), "gate-workflow-tests-auth");
    }

    #[test]
    fn test_default_request_is_unset() {
        let request = DeployRequest::default();
        assert!(request.release_id.is_none());
        assert!(request.environment.is_none());
    }
}
