use chrono::{DateTime, Utc};

use super::{events::SuiteEvent, states::TestStatus};
use crate::error::{WorkflowError, WorkflowResult};
use crate::models::TestSuite;

/// Test suite state machine: `pending -> running -> (passed | failed)`
///
/// Resolved suites may be started again. A running suite can only resolve.
pub struct SuiteStateMachine;

impl SuiteStateMachine {
    /// Determine the target state based on current state and event
    pub fn determine_target_state(
        current_state: TestStatus,
        event: SuiteEvent,
    ) -> WorkflowResult<TestStatus> {
        let target = match (current_state, event) {
            (TestStatus::Running, SuiteEvent::Pass) => TestStatus::Passed,
            (TestStatus::Running, SuiteEvent::Fail(_)) => TestStatus::Failed,
            (TestStatus::Running, SuiteEvent::Start) => {
                return Err(WorkflowError::InvalidTransition {
                    from: current_state.to_string(),
                    event: event.event_type().to_string(),
                })
            }
            (_, SuiteEvent::Start) => TestStatus::Running,
            (from_state, _) => {
                return Err(WorkflowError::InvalidTransition {
                    from: from_state.to_string(),
                    event: event.event_type().to_string(),
                })
            }
        };

        Ok(target)
    }

    /// Apply the event to the suite, updating counts on resolution
    pub fn transition(
        suite: &mut TestSuite,
        event: SuiteEvent,
        at: DateTime<Utc>,
    ) -> WorkflowResult<TestStatus> {
        let target = Self::determine_target_state(suite.status, event)?;

        match event {
            // counts stay stale until the run resolves
            SuiteEvent::Start => {}
            SuiteEvent::Pass => {
                suite.passed = suite.total;
                suite.failed = 0;
                suite.last_run_at = Some(at);
            }
            SuiteEvent::Fail(failed) => {
                let failed = failed.min(suite.total);
                suite.failed = failed;
                suite.passed = suite.total - failed;
                suite.last_run_at = Some(at);
            }
        }

        suite.status = target;
        Ok(target)
    }
}
