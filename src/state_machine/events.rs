use serde::{Deserialize, Serialize};

/// Events that can trigger test suite state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SuiteEvent {
    /// Begin a simulated run
    Start,
    /// Resolve the run with every test passing
    Pass,
    /// Resolve the run with the given number of failing tests
    Fail(u32),
}

impl SuiteEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pass => "pass",
            Self::Fail(_) => "fail",
        }
    }

    /// Check if this event resolves a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Pass | Self::Fail(_))
    }
}
