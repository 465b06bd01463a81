//! # Workbench
//!
//! Wires one store, one event channel, the simulators and the workflows
//! together from a [`DeployKitConfig`]. Each workbench owns its own store, so
//! tests build a fresh one per case (or call [`Workbench::reset`]).

use std::sync::Arc;

use crate::config::DeployKitConfig;
use crate::error::WorkflowResult;
use crate::events::EventPublisher;
use crate::gates::{GateRecord, GateSubject};
use crate::models::{Deployment, EnvironmentName, TestSuite};
use crate::overview::{dashboard_summary, DashboardSummary};
use crate::simulation::{
    Clock, GateRunSimulator, RandomSource, RunOutcome, SystemClock, TestRunSimulator, ThreadRandom,
};
use crate::store::DomainStore;
use crate::workflow::{
    CreateReleaseRequest, DeployRequest, DeployWorkflow, ReleaseOutcome, ReleaseWorkflow,
};

#[derive(Debug, Clone)]
pub struct Workbench {
    store: DomainStore,
    publisher: EventPublisher,
    test_runner: TestRunSimulator,
    gate_runner: GateRunSimulator,
    deploy: DeployWorkflow,
    release: ReleaseWorkflow,
}

impl Workbench {
    /// Seeded workbench with ambient randomness and the system clock
    pub fn new(config: DeployKitConfig) -> Self {
        Self::with_sources(
            config,
            DomainStore::seeded(),
            Arc::new(ThreadRandom),
            Arc::new(SystemClock),
        )
    }

    /// Workbench over an explicit store, random source and clock
    pub fn with_sources(
        config: DeployKitConfig,
        store: DomainStore,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let publisher = EventPublisher::new(config.events.channel_capacity);

        let test_runner = TestRunSimulator::new(
            store.clone(),
            random,
            clock.clone(),
            publisher.clone(),
            config.simulation.clone(),
        );
        let gate_runner = GateRunSimulator::new(
            store.clone(),
            clock.clone(),
            publisher.clone(),
            config.simulation.clone(),
        );
        let deploy = DeployWorkflow::new(
            store.clone(),
            clock.clone(),
            publisher.clone(),
            config.deploy.clone(),
        );
        let release = ReleaseWorkflow::new(store.clone(), clock, publisher.clone(), deploy.clone());

        Self {
            store,
            publisher,
            test_runner,
            gate_runner,
            deploy,
            release,
        }
    }

    pub fn store(&self) -> &DomainStore {
        &self.store
    }

    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    pub fn create_release(&self, request: &CreateReleaseRequest) -> WorkflowResult<ReleaseOutcome> {
        self.release.create_release(request)
    }

    pub fn deploy(&self, request: &DeployRequest) -> WorkflowResult<Deployment> {
        self.deploy.deploy(request)
    }

    pub fn run_suite(&self, suite_id: &str) -> WorkflowResult<RunOutcome<TestSuite>> {
        self.test_runner.run_suite(suite_id)
    }

    pub fn run_gates(
        &self,
        subject: GateSubject,
        environment: EnvironmentName,
    ) -> WorkflowResult<RunOutcome<GateRecord>> {
        self.gate_runner.run_gates(subject, environment)
    }

    pub fn record_gate_result(
        &self,
        subject: GateSubject,
        environment: EnvironmentName,
        passed: bool,
    ) -> WorkflowResult<GateRecord> {
        self.gate_runner.record_gate_result(subject, environment, passed)
    }

    pub fn summary(&self) -> DashboardSummary {
        dashboard_summary(&self.store)
    }

    /// Reset the store to its seed
    pub fn reset(&self) {
        self.store.reset();
    }
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(DeployKitConfig::default())
    }
}
