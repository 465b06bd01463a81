//! Mock catalog the dashboard starts from.

use chrono::{DateTime, TimeZone, Utc};

use super::{ActiveRuns, Catalog};
use crate::gates::{required_gates, GateLedger, GateSubject};
use crate::models::{
    Deployment, DeploymentResult, Environment, EnvironmentName, HealthStatus, Release,
    SuiteStatusSnapshot, TestSuite, TestType,
};
use crate::state_machine::{ReleaseStatus, TestStatus};

fn at(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Catalog holding only the three static environments
pub fn empty_catalog() -> Catalog {
    Catalog {
        environments: EnvironmentName::ALL.into_iter().map(Environment::new).collect(),
        ..Catalog::default()
    }
}

/// Releases, environments, suites, deployments and gate results of the mock dashboard
pub fn mock_catalog() -> Catalog {
    let releases = vec![
        Release {
            id: "rel-1".to_string(),
            name: "v1.2.0".to_string(),
            branch: "feature/new-api".to_string(),
            commit: "a1b2c3d".to_string(),
            commit_message: "Add new API endpoints".to_string(),
            created_at: at(1, 15, 10, 30),
            status: ReleaseStatus::Ready,
            notes: Some("Includes new authentication flow".to_string()),
            deployed_to: vec![EnvironmentName::Dev],
        },
        Release {
            id: "rel-2".to_string(),
            name: "v1.1.5".to_string(),
            branch: "main".to_string(),
            commit: "e4f5a6b".to_string(),
            commit_message: "Fix critical bug in payment processing".to_string(),
            created_at: at(1, 14, 15, 20),
            status: ReleaseStatus::Deployed,
            notes: None,
            deployed_to: vec![EnvironmentName::Dev, EnvironmentName::Stage, EnvironmentName::Prod],
        },
        Release {
            id: "rel-3".to_string(),
            name: "v1.2.1-rc".to_string(),
            branch: "release/v1.2.1".to_string(),
            commit: "c7d8e9f".to_string(),
            commit_message: "Release candidate for v1.2.1".to_string(),
            created_at: at(1, 16, 9, 15),
            status: ReleaseStatus::Draft,
            notes: None,
            deployed_to: Vec::new(),
        },
    ];

    let environments = vec![
        seeded_environment(EnvironmentName::Dev, "rel-1", at(1, 15, 10, 35)),
        seeded_environment(EnvironmentName::Stage, "rel-2", at(1, 14, 16, 0)),
        seeded_environment(EnvironmentName::Prod, "rel-2", at(1, 14, 18, 30)),
    ];

    let test_suites = vec![
        suite("test-1", "Unit Tests - API", TestType::Unit, EnvironmentName::Dev)
            .resolved(TestStatus::Passed, 45, 0, 45, at(1, 15, 10, 36))
            .for_release("rel-1"),
        suite("test-2", "Workflow Tests - Auth", TestType::Workflow, EnvironmentName::Dev)
            .resolved(TestStatus::Passed, 12, 0, 12, at(1, 15, 10, 37))
            .for_release("rel-1"),
        suite("test-3", "Unit Tests - Database", TestType::Unit, EnvironmentName::Stage)
            .resolved(TestStatus::Failed, 38, 2, 40, at(1, 14, 16, 5))
            .for_release("rel-2"),
        suite("test-4", "Workflow Tests - Payment", TestType::Workflow, EnvironmentName::Prod)
            .resolved(TestStatus::Passed, 8, 0, 8, at(1, 14, 18, 35))
            .for_release("rel-2"),
        // no run backs this suite, so it starts pending rather than running
        suite("test-5", "Unit Tests - API", TestType::Unit, EnvironmentName::Dev)
            .pending(45)
            .for_release("rel-3"),
    ];

    let mut gates = GateLedger::new();
    gates.record(
        GateSubject::release("rel-2"),
        EnvironmentName::Stage,
        TestStatus::Passed,
        at(1, 14, 15, 55),
    );
    gates.record(
        GateSubject::release("rel-2"),
        EnvironmentName::Prod,
        TestStatus::Passed,
        at(1, 14, 18, 25),
    );

    let deployments = vec![
        seeded_deployment("dep-1", "rel-1", EnvironmentName::Dev, at(1, 15, 10, 35)),
        seeded_deployment("dep-2", "rel-2", EnvironmentName::Dev, at(1, 14, 15, 30)),
        seeded_deployment("dep-3", "rel-2", EnvironmentName::Stage, at(1, 14, 16, 0)),
        seeded_deployment("dep-4", "rel-2", EnvironmentName::Prod, at(1, 14, 18, 30)),
    ];

    Catalog {
        releases,
        environments,
        test_suites,
        deployments,
        gates,
        runs: ActiveRuns::default(),
    }
}

fn seeded_environment(
    name: EnvironmentName,
    release_id: &str,
    deployed_at: DateTime<Utc>,
) -> Environment {
    Environment {
        current_release: Some(release_id.to_string()),
        last_deployed_at: Some(deployed_at),
        status: HealthStatus::Healthy,
        ..Environment::new(name)
    }
}

fn seeded_deployment(
    id: &str,
    release_id: &str,
    environment: EnvironmentName,
    deployed_at: DateTime<Utc>,
) -> Deployment {
    let required_suites = required_gates(environment)
        .iter()
        .map(|gate| SuiteStatusSnapshot {
            id: crate::workflow::deploy::gate_snapshot_id(gate),
            name: gate.to_string(),
            status: TestStatus::Passed,
        })
        .collect();

    Deployment {
        id: id.to_string(),
        release_id: release_id.to_string(),
        environment_id: environment.environment_id(),
        deployed_at,
        actor: "release-manager".to_string(),
        result: DeploymentResult::Success,
        region: Some("us-east-1".to_string()),
        required_suites,
        optional_suites: None,
        logs: format!(
            "[{}] Deployed {release_id} to {}\n",
            deployed_at.to_rfc3339(),
            environment.display_name()
        ),
    }
}

fn suite(id: &str, name: &str, suite_type: TestType, environment: EnvironmentName) -> TestSuite {
    TestSuite {
        id: id.to_string(),
        name: name.to_string(),
        suite_type,
        environment,
        status: TestStatus::Pending,
        passed: 0,
        failed: 0,
        total: 0,
        last_run_at: None,
        release_id: None,
    }
}

trait SeedSuite {
    fn resolved(self, status: TestStatus, passed: u32, failed: u32, total: u32, at: DateTime<Utc>) -> Self;
    fn pending(self, total: u32) -> Self;
    fn for_release(self, release_id: &str) -> Self;
}

impl SeedSuite for TestSuite {
    fn resolved(mut self, status: TestStatus, passed: u32, failed: u32, total: u32, at: DateTime<Utc>) -> Self {
        self.status = status;
        self.passed = passed;
        self.failed = failed;
        self.total = total;
        self.last_run_at = Some(at);
        self
    }

    fn pending(mut self, total: u32) -> Self {
        self.status = TestStatus::Pending;
        self.total = total;
        self
    }

    fn for_release(mut self, release_id: &str) -> Self {
        self.release_id = Some(release_id.to_string());
        self
    }
}
