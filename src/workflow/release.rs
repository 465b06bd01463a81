//! Release Workflow: cut a release from a branch, optionally deploying it.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use super::deploy::DeployWorkflow;
use crate::constants::events;
use crate::error::{WorkflowError, WorkflowResult};
use crate::events::EventPublisher;
use crate::gates::GateSubject;
use crate::logging::log_release_operation;
use crate::models::{Deployment, EnvironmentName, NewRelease, Release};
use crate::simulation::Clock;
use crate::state_machine::ReleaseStatus;
use crate::store::DomainStore;

/// Input of the create-release sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReleaseRequest {
    pub name: String,
    pub branch: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub auto_deploy: bool,
    #[serde(default)]
    pub target_environment: Option<EnvironmentName>,
}

impl CreateReleaseRequest {
    pub fn new(name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            branch: branch.into(),
            ..Self::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Deploy right after creation
    pub fn auto_deploy_to(mut self, environment: EnvironmentName) -> Self {
        self.auto_deploy = true;
        self.target_environment = Some(environment);
        self
    }
}

/// What a successful create produced
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub release: Release,
    pub deployment: Option<Deployment>,
    /// Confirmation shown to the operator
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct ReleaseWorkflow {
    store: DomainStore,
    clock: Arc<dyn Clock>,
    publisher: EventPublisher,
    deploy: DeployWorkflow,
}

impl ReleaseWorkflow {
    pub fn new(
        store: DomainStore,
        clock: Arc<dyn Clock>,
        publisher: EventPublisher,
        deploy: DeployWorkflow,
    ) -> Self {
        Self {
            store,
            clock,
            publisher,
            deploy,
        }
    }

    /// Create a release, chaining into deploy when auto-deploy is requested
    ///
    /// When auto-deploy targets an environment whose gates have not passed
    /// for the branch, the release is still stored as `draft`, no deploy
    /// happens, and `GatesNotSatisfied` carries the new release id. Otherwise
    /// the release, the gate carry-over and the deploy share one store write.
    pub fn create_release(&self, request: &CreateReleaseRequest) -> WorkflowResult<ReleaseOutcome> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(WorkflowError::missing_field("name"));
        }
        let branch = request.branch.trim();
        if branch.is_empty() {
            return Err(WorkflowError::missing_field("branch"));
        }
        let target = if request.auto_deploy {
            Some(
                request
                    .target_environment
                    .ok_or_else(|| WorkflowError::missing_field("environment"))?,
            )
        } else {
            None
        };

        let now = self.clock.now();
        let branch_subject = GateSubject::branch(branch);

        let result: WorkflowResult<_> = self.store.write(|catalog| {
            let missing = target
                .map(|env| catalog.gates.missing_gates(&branch_subject, env))
                .unwrap_or_default();

            let status = if target.is_some() && missing.is_empty() {
                ReleaseStatus::Ready
            } else {
                ReleaseStatus::Draft
            };

            let release = Release::from_new(
                NewRelease {
                    name: name.to_string(),
                    branch: branch.to_string(),
                    notes: request.notes.clone(),
                    status,
                },
                now,
            );
            catalog.releases.push(release.clone());

            let Some(environment) = target.filter(|_| missing.is_empty()) else {
                return Ok((release, missing, None));
            };

            catalog
                .gates
                .carry_over(&branch_subject, GateSubject::release(&release.id), environment);
            let deployment = self.deploy.apply(catalog, &release.id, environment, now)?;
            let release = catalog.release(&release.id).cloned().unwrap_or(release);
            Ok((release, missing, Some(deployment)))
        });
        let (release, missing, deployment) = result?;

        if let (Some(environment), false) = (target, missing.is_empty()) {
            log_release_operation(
                "create_release",
                Some(&release.id),
                Some(&release.name),
                Some(&release.branch),
                &release.status.to_string(),
                Some("auto-deploy skipped: gates not satisfied"),
            );
            self.publisher.publish(
                events::RELEASE_GATES_BLOCKED,
                format!(
                    "Release \"{}\" created as draft; run and pass required tests before deploying to {environment}",
                    release.name
                ),
                json!({ "release_id": release.id, "environment": environment, "missing": missing }),
            );
            return Err(WorkflowError::GatesNotSatisfied {
                environment,
                missing,
                release_id: Some(release.id),
            });
        }

        log_release_operation(
            "create_release",
            Some(&release.id),
            Some(&release.name),
            Some(&release.branch),
            &release.status.to_string(),
            target.as_ref().map(EnvironmentName::as_str),
        );

        let deployment = match (deployment, target) {
            (Some((deployment, release_name)), Some(environment)) => {
                self.deploy.announce(&deployment, &release_name, environment);
                Some(deployment)
            }
            _ => None,
        };

        let message = match target {
            Some(environment) => format!("Release \"{}\" created and deployed to {environment}", release.name),
            None => format!("Release \"{}\" created", release.name),
        };
        self.publisher.publish(
            events::RELEASE_CREATED,
            message.clone(),
            json!({
                "release_id": release.id,
                "status": release.status,
                "deployment_id": deployment.as_ref().map(|d| d.id.clone()),
            }),
        );

        Ok(ReleaseOutcome {
            release,
            deployment,
            message,
        })
    }
}
