//! Gate Run Simulator: the "Run Tests" action before a deploy.
//!
//! Gate runs always pass after the configured gate delay. The result is
//! recorded in the store's gate ledger, which the deploy guards consult.

use serde_json::json;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Clock, RunHandle, RunOutcome};
use crate::config::SimulationConfig;
use crate::constants::events;
use crate::error::{WorkflowError, WorkflowResult};
use crate::events::EventPublisher;
use crate::gates::{required_gates, GateRecord, GateSubject};
use crate::logging::log_test_run_operation;
use crate::models::EnvironmentName;
use crate::state_machine::TestStatus;
use crate::store::DomainStore;

#[derive(Debug, Clone)]
pub struct GateRunSimulator {
    store: DomainStore,
    clock: Arc<dyn Clock>,
    publisher: EventPublisher,
    config: SimulationConfig,
}

impl GateRunSimulator {
    pub fn new(
        store: DomainStore,
        clock: Arc<dyn Clock>,
        publisher: EventPublisher,
        config: SimulationConfig,
    ) -> Self {
        Self {
            store,
            clock,
            publisher,
            config,
        }
    }

    /// Run the required gates of `environment` for `subject`
    ///
    /// Environments without gates need no run. A gate run already in flight
    /// for the same subject and environment is left alone. Outside a Tokio
    /// runtime the run is refused before the ledger is touched.
    pub fn run_gates(
        &self,
        subject: GateSubject,
        environment: EnvironmentName,
    ) -> WorkflowResult<RunOutcome<GateRecord>> {
        let subject = subject.normalized();
        self.validate_subject(&subject)?;

        let gates = required_gates(environment);
        if gates.is_empty() {
            debug!(subject = %subject, environment = %environment, "No gates required");
            return Ok(RunOutcome::NotRequired);
        }

        let runtime = Handle::try_current()
            .map_err(|err| WorkflowError::Simulation(format!("run_gates needs a Tokio runtime: {err}")))?;

        let now = self.clock.now();
        let started = self.store.write(|catalog| {
            if catalog.gates.status(&subject, environment).is_active() {
                return None;
            }
            catalog
                .gates
                .record(subject.clone(), environment, TestStatus::Running, now);
            Some(catalog.runs.start_gates(&subject, environment))
        });

        let Some(token) = started else {
            debug!(subject = %subject, environment = %environment, "Gate run already in progress - ignored");
            return Ok(RunOutcome::Ignored);
        };

        let delay = self.config.gate_run_delay();
        log_test_run_operation(
            "run_gates",
            &subject.to_string(),
            Some(environment.as_str()),
            &TestStatus::Running.to_string(),
            Some(&gates.join(", ")),
        );
        self.publisher.publish(
            events::GATE_RUN_STARTED,
            format!("Running {} required gate(s) for {}", gates.len(), environment),
            json!({ "subject": subject.to_string(), "environment": environment, "gates": gates }),
        );

        let simulator = self.clone();
        let key = format!("{subject}@{environment}");
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            simulator.resolve(subject, environment, token)
        });

        Ok(RunOutcome::Scheduled(RunHandle::new(key, delay, handle)))
    }

    /// Record a gate result directly, bypassing the simulated delay
    pub fn record_gate_result(
        &self,
        subject: GateSubject,
        environment: EnvironmentName,
        passed: bool,
    ) -> WorkflowResult<GateRecord> {
        let subject = subject.normalized();
        self.validate_subject(&subject)?;

        let status = if passed {
            TestStatus::Passed
        } else {
            TestStatus::Failed
        };
        let checked_at = self.clock.now();
        self.store.write(|catalog| {
            // a recorded result supersedes a run in flight
            catalog.runs.cancel_gates(&subject, environment);
            catalog.gates.record(subject.clone(), environment, status, checked_at)
        });

        log_test_run_operation(
            "record_gates",
            &subject.to_string(),
            Some(environment.as_str()),
            &status.to_string(),
            None,
        );

        Ok(GateRecord { status, checked_at })
    }

    fn validate_subject(&self, subject: &GateSubject) -> WorkflowResult<()> {
        match subject {
            GateSubject::Branch(branch) if branch.trim().is_empty() => {
                Err(WorkflowError::missing_field("branch"))
            }
            GateSubject::Release(release_id) if self.store.release(release_id).is_none() => {
                Err(WorkflowError::UnknownRelease {
                    release_id: release_id.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    fn resolve(&self, subject: GateSubject, environment: EnvironmentName, token: Uuid) -> Option<GateRecord> {
        let now = self.clock.now();
        let resolved = self.store.write(|catalog| {
            if !catalog.runs.finish_gates(&subject, environment, token) {
                return None;
            }
            if !catalog.gates.status(&subject, environment).is_active() {
                return None;
            }
            catalog
                .gates
                .record(subject.clone(), environment, TestStatus::Passed, now);
            catalog.gates.get(&subject, environment)
        });

        let Some(record) = resolved else {
            warn!(subject = %subject, environment = %environment, "Gate run was reset or superseded before it resolved");
            return None;
        };

        log_test_run_operation(
            "resolve_gates",
            &subject.to_string(),
            Some(environment.as_str()),
            &record.status.to_string(),
            None,
        );
        self.publisher.publish(
            events::GATE_RUN_PASSED,
            format!("All tests passed for {environment}"),
            json!({ "subject": subject.to_string(), "environment": environment }),
        );

        Some(record)
    }
}
