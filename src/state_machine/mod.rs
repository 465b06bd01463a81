// State machine module for the release/test workflow
//
// Status enums, the test suite run state machine, and the guards consulted
// before a deploy is allowed through.

pub mod events;
pub mod guards;
pub mod states;
pub mod suite_state_machine;

// Re-export main types for convenient access
pub use events::SuiteEvent;
pub use guards::{DeployTarget, GateCheck, ReleaseEligibleGuard, StateGuard, TestGatesPassedGuard};
pub use states::{ReleaseStatus, TestStatus};
pub use suite_state_machine::SuiteStateMachine;
