//! # System Constants
//!
//! Event names, gate labels and simulation defaults that define the
//! operational boundaries of the DeployKit workflow simulation.

/// Lifecycle events published on the [`crate::events::EventPublisher`]
pub mod events {
    // Release lifecycle events
    pub const RELEASE_CREATED: &str = "release.created";
    pub const RELEASE_GATES_BLOCKED: &str = "release.gates_blocked";

    // Deployment events
    pub const DEPLOYMENT_COMPLETED: &str = "deployment.completed";

    // Test suite run events
    pub const TEST_RUN_STARTED: &str = "test_run.started";
    pub const TEST_RUN_PASSED: &str = "test_run.passed";
    pub const TEST_RUN_FAILED: &str = "test_run.failed";

    // Gate run events
    pub const GATE_RUN_STARTED: &str = "gate_run.started";
    pub const GATE_RUN_PASSED: &str = "gate_run.passed";
}

/// Test gate labels referenced by the gate policy table
pub mod gates {
    pub const UNIT_TESTS: &str = "Unit Tests";
    pub const WORKFLOW_TESTS_AUTH: &str = "Workflow Tests - Auth";
    pub const WORKFLOW_TESTS_PAYMENT: &str = "Workflow Tests - Payment";
}

/// Simulation defaults
pub mod system {
    /// Lower bound of a simulated suite run
    pub const MIN_RUN_DELAY_MS: u64 = 1000;
    /// Upper bound of a simulated suite run
    pub const MAX_RUN_DELAY_MS: u64 = 2000;
    pub const PASS_PROBABILITY: f64 = 0.8;
    pub const MIN_FAILURE_FRACTION: f64 = 0.01;
    pub const MAX_FAILURE_FRACTION: f64 = 0.20;
    /// Fixed duration of a gate run from the create/deploy sheets
    pub const GATE_RUN_DELAY_MS: u64 = 2000;
    pub const DEFAULT_ACTOR: &str = "deploykit-operator";
    pub const EVENT_CHANNEL_CAPACITY: usize = 1000;
}

/// Branches offered when cutting a release
pub const KNOWN_BRANCHES: &[&str] = &[
    "main",
    "develop",
    "feature/new-api",
    "feature/auth-improvements",
    "release/v1.2.1",
    "hotfix/payment-bug",
];
