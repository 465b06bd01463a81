//! Test Run Simulator: randomized, delayed resolution of test suites.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Clock, RandomSource, RunHandle, RunOutcome};
use crate::config::SimulationConfig;
use crate::constants::events;
use crate::error::{WorkflowError, WorkflowResult};
use crate::events::EventPublisher;
use crate::logging::log_test_run_operation;
use crate::models::TestSuite;
use crate::state_machine::{SuiteEvent, SuiteStateMachine, TestStatus};
use crate::store::DomainStore;

/// Delay uniform in `[min_run_delay_ms, max_run_delay_ms]`
pub fn draw_delay(random: &dyn RandomSource, config: &SimulationConfig) -> Duration {
    let span = config.max_run_delay_ms.saturating_sub(config.min_run_delay_ms);
    let offset = (random.next_f64() * span as f64) as u64;
    Duration::from_millis(config.min_run_delay_ms + offset.min(span))
}

/// Roll the outcome of a run over `total` tests
///
/// Draws once for pass/fail and, on failure, once more for the failure
/// fraction. At least one test fails in a failed run, never more than `total`.
pub fn draw_outcome(total: u32, random: &dyn RandomSource, config: &SimulationConfig) -> SuiteEvent {
    if random.next_f64() < config.pass_probability {
        return SuiteEvent::Pass;
    }

    let spread = config.max_failure_fraction - config.min_failure_fraction;
    let fraction = config.min_failure_fraction + random.next_f64() * spread;
    let failed = ((f64::from(total) * fraction).floor() as u32).max(1).min(total);

    SuiteEvent::Fail(failed)
}

/// Runs test suites against the store
#[derive(Debug, Clone)]
pub struct TestRunSimulator {
    store: DomainStore,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    publisher: EventPublisher,
    config: SimulationConfig,
}

impl TestRunSimulator {
    pub fn new(
        store: DomainStore,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
        publisher: EventPublisher,
        config: SimulationConfig,
    ) -> Self {
        Self {
            store,
            random,
            clock,
            publisher,
            config,
        }
    }

    /// Start a simulated run of `suite_id`
    ///
    /// A suite that is already running is left alone and `Ignored` comes
    /// back. Outside a Tokio runtime the run is refused before the suite
    /// is touched.
    pub fn run_suite(&self, suite_id: &str) -> WorkflowResult<RunOutcome<TestSuite>> {
        let runtime = Handle::try_current()
            .map_err(|err| WorkflowError::Simulation(format!("run_suite needs a Tokio runtime: {err}")))?;

        let now = self.clock.now();
        let started = self.store.write(|catalog| -> WorkflowResult<Option<(TestSuite, Uuid)>> {
            let suite = catalog
                .test_suite_mut(suite_id)
                .ok_or_else(|| WorkflowError::UnknownSuite {
                    suite_id: suite_id.to_string(),
                })?;

            if suite.status.is_active() {
                return Ok(None);
            }

            SuiteStateMachine::transition(suite, SuiteEvent::Start, now)?;
            let suite = suite.clone();
            let token = catalog.runs.start_suite(&suite.id);
            Ok(Some((suite, token)))
        })?;

        let Some((suite, token)) = started else {
            debug!(suite_id = %suite_id, "Suite already running - run request ignored");
            return Ok(RunOutcome::Ignored);
        };

        let delay = draw_delay(self.random.as_ref(), &self.config);

        log_test_run_operation(
            "run_suite",
            &suite.id,
            Some(&suite.name),
            &TestStatus::Running.to_string(),
            Some(&format!("resolves in {} ms", delay.as_millis())),
        );
        self.publisher.publish(
            events::TEST_RUN_STARTED,
            format!("Running {}", suite.name),
            json!({ "suite_id": suite.id, "delay_ms": delay.as_millis() as u64 }),
        );

        let simulator = self.clone();
        let id = suite.id.clone();
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            simulator.resolve(&id, token)
        });

        Ok(RunOutcome::Scheduled(RunHandle::new(suite.id, delay, handle)))
    }

    /// Resolve the run started with `token` with a fresh dice roll
    fn resolve(&self, suite_id: &str, token: Uuid) -> Option<TestSuite> {
        let now = self.clock.now();
        let resolved = self.store.write(|catalog| {
            if !catalog.runs.finish_suite(suite_id, token) {
                return None;
            }
            let suite = catalog.test_suite_mut(suite_id)?;
            if !suite.status.is_active() {
                return None;
            }

            let outcome = draw_outcome(suite.total, self.random.as_ref(), &self.config);
            SuiteStateMachine::transition(suite, outcome, now).ok()?;
            Some(suite.clone())
        });

        let Some(suite) = resolved else {
            warn!(suite_id = %suite_id, "Suite was reset or re-run before this run resolved");
            return None;
        };

        let (event_name, message) = match suite.status {
            TestStatus::Passed => (
                events::TEST_RUN_PASSED,
                format!("{} passed ({}/{})", suite.name, suite.passed, suite.total),
            ),
            _ => (
                events::TEST_RUN_FAILED,
                format!("{} failed ({} of {} failing)", suite.name, suite.failed, suite.total),
            ),
        };

        log_test_run_operation(
            "resolve_suite",
            &suite.id,
            Some(&suite.name),
            &suite.status.to_string(),
            Some(&format!("passed={} failed={} total={}", suite.passed, suite.failed, suite.total)),
        );
        self.publisher.publish(
            event_name,
            message,
            json!({
                "suite_id": suite.id,
                "passed": suite.passed,
                "failed": suite.failed,
                "total": suite.total,
            }),
        );

        Some(suite)
    }
}
