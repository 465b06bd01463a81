//! # Run Simulation
//!
//! Timer-driven stand-ins for test execution. A run flips its subject to
//! `running` immediately, then a Tokio task sleeps for the run delay and
//! resolves it. Runs cannot be cancelled; a run whose subject was reset in
//! the meantime resolves to nothing.
//!
//! Randomness and timestamps come from injected [`RandomSource`] and
//! [`Clock`] implementations. Delays use Tokio time, so tests can pause and
//! advance time deterministically.

pub mod clock;
pub mod gate_runner;
pub mod random;
pub mod test_runner;

use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::{WorkflowError, WorkflowResult};

pub use clock::{Clock, ManualClock, SystemClock};
pub use gate_runner::GateRunSimulator;
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use test_runner::{draw_delay, draw_outcome, TestRunSimulator};

/// Result of asking for a simulated run
#[derive(Debug)]
pub enum RunOutcome<T> {
    /// A run is in flight and will resolve after its delay
    Scheduled(RunHandle<T>),
    /// The subject was already running; nothing was changed
    Ignored,
    /// Nothing to run (environment without gates)
    NotRequired,
}

impl<T> RunOutcome<T> {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled(_))
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    pub fn into_handle(self) -> Option<RunHandle<T>> {
        match self {
            Self::Scheduled(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Handle to a scheduled run
#[derive(Debug)]
pub struct RunHandle<T> {
    subject: String,
    delay: Duration,
    handle: JoinHandle<Option<T>>,
}

impl<T> RunHandle<T> {
    pub(crate) fn new(subject: String, delay: Duration, handle: JoinHandle<Option<T>>) -> Self {
        Self {
            subject,
            delay,
            handle,
        }
    }

    /// What the run was started for (suite id or gate key)
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the run to resolve
    ///
    /// `None` means the subject disappeared from the store (for example after
    /// a reset) before the run resolved.
    pub async fn resolved(self) -> WorkflowResult<Option<T>> {
        self.handle
            .await
            .map_err(|e| WorkflowError::Simulation(format!("run for {} did not complete: {e}", self.subject)))
    }
}
