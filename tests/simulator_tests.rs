//! Timer-driven test and gate runs under paused Tokio time

mod common;

use std::time::Duration;

use common::*;
use deploykit_core::constants::events;
use deploykit_core::gates::GateSubject;
use deploykit_core::models::EnvironmentName;
use deploykit_core::simulation::RunOutcome;
use deploykit_core::state_machine::TestStatus;
use deploykit_core::workflow::{CreateReleaseRequest, DeployRequest};
use deploykit_core::WorkflowError;

#[tokio::test(start_paused = true)]
async fn test_failed_run_of_45_tests() {
    // delay 1500ms, fail roll, fraction 0.105
    let tb = seeded_bench([0.5, 0.9, 0.5]);

    let handle = tb.bench.run_suite("test-5").unwrap().into_handle().unwrap();
    assert_eq!(handle.delay(), Duration::from_millis(1500));
    assert_eq!(tb.bench.store().test_suite("test-5").unwrap().status, TestStatus::Running);

    tokio::time::sleep(Duration::from_millis(1499)).await;
    assert_eq!(tb.bench.store().test_suite("test-5").unwrap().status, TestStatus::Running);

    let suite = handle.resolved().await.unwrap().unwrap();
    assert_eq!(suite.status, TestStatus::Failed);
    assert!((1..=9).contains(&suite.failed));
    assert_eq!(suite.failed, 4);
    assert_eq!(suite.passed, 41);
    assert_eq!(suite.last_run_at, Some(start_time()));
    assert_eq!(tb.bench.store().test_suite("test-5").unwrap(), suite);
}

#[tokio::test(start_paused = true)]
async fn test_passed_run_counts_every_test() {
    let tb = seeded_bench([0.0, 0.1]);

    let handle = tb.bench.run_suite("test-3").unwrap().into_handle().unwrap();
    // counts stay stale while running
    let running = tb.bench.store().test_suite("test-3").unwrap();
    assert_eq!((running.passed, running.failed), (38, 2));
    assert!(running.results().is_none());

    let suite = handle.resolved().await.unwrap().unwrap();
    assert_eq!(suite.status, TestStatus::Passed);
    assert_eq!((suite.passed, suite.failed, suite.total), (40, 0, 40));
}

#[tokio::test(start_paused = true)]
async fn test_run_on_running_suite_is_ignored() {
    let tb = seeded_bench([0.0, 0.1]);

    let outcome = tb.bench.run_suite("test-1").unwrap();
    assert!(outcome.is_scheduled());

    let again = tb.bench.run_suite("test-1").unwrap();
    assert!(again.is_ignored());
    // the ignored request drew nothing
    assert_eq!(tb.random.remaining(), 1);

    let suite = outcome.into_handle().unwrap().resolved().await.unwrap().unwrap();
    assert_eq!(suite.status, TestStatus::Passed);

    // resolved suites can run again
    tb.random.push([0.0, 0.1]);
    assert!(tb.bench.run_suite("test-1").unwrap().is_scheduled());
}

#[tokio::test(start_paused = true)]
async fn test_unknown_suite_is_an_error() {
    let tb = seeded_bench([]);
    let err = tb.bench.run_suite("test-404").unwrap_err();
    assert_eq!(
        err,
        WorkflowError::UnknownSuite {
            suite_id: "test-404".to_string()
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_runs_resolve_independently() {
    // delays 1000ms and 1990ms; first resolution passes, second fails one test
    let tb = seeded_bench([0.0, 0.99, 0.1, 0.95, 0.0]);

    let fast = tb.bench.run_suite("test-1").unwrap().into_handle().unwrap();
    let slow = tb.bench.run_suite("test-3").unwrap().into_handle().unwrap();
    assert!(fast.delay() < slow.delay());

    let fast = fast.resolved().await.unwrap().unwrap();
    assert_eq!(fast.status, TestStatus::Passed);
    assert_eq!(
        tb.bench.store().test_suite("test-3").unwrap().status,
        TestStatus::Running
    );

    let slow = slow.resolved().await.unwrap().unwrap();
    assert_eq!(slow.status, TestStatus::Failed);
    assert_eq!((slow.passed, slow.failed), (39, 1));
}

#[tokio::test(start_paused = true)]
async fn test_failed_run_of_empty_suite() {
    let tb = seeded_bench([0.0, 0.9, 0.5]);
    tb.bench.store().insert_test_suite(pending_suite("test-0", "Unit Tests - Empty", 0));

    let suite = tb
        .bench
        .run_suite("test-0")
        .unwrap()
        .into_handle()
        .unwrap()
        .resolved()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(suite.status, TestStatus::Failed);
    assert_eq!((suite.passed, suite.failed, suite.total), (0, 0, 0));
}

#[tokio::test(start_paused = true)]
async fn test_reset_while_running_drops_the_result() {
    let tb = seeded_bench([0.0, 0.9, 0.5]);

    let handle = tb.bench.run_suite("test-5").unwrap().into_handle().unwrap();
    tb.bench.reset();

    assert!(handle.resolved().await.unwrap().is_none());
    let suite = tb.bench.store().test_suite("test-5").unwrap();
    assert_eq!(suite.status, TestStatus::Pending);
    assert_eq!(tb.random.remaining(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stale_timer_does_not_resolve_a_rerun() {
    // first run 1000ms, second run 1990ms, then a passing roll
    let tb = seeded_bench([0.0, 0.99, 0.1]);

    let stale = tb.bench.run_suite("test-5").unwrap().into_handle().unwrap();
    assert_eq!(stale.delay(), Duration::from_millis(1000));
    tokio::time::sleep(Duration::from_millis(100)).await;

    tb.bench.reset();
    let rerun = tb.bench.run_suite("test-5").unwrap().into_handle().unwrap();
    assert_eq!(rerun.delay(), Duration::from_millis(1990));

    // the first timer has fired by now and must not touch the new run
    tokio::time::sleep(Duration::from_millis(950)).await;
    assert!(stale.resolved().await.unwrap().is_none());
    assert_eq!(tb.bench.store().test_suite("test-5").unwrap().status, TestStatus::Running);
    assert_eq!(tb.random.remaining(), 1);

    let suite = rerun.resolved().await.unwrap().unwrap();
    assert_eq!(suite.status, TestStatus::Passed);
    assert_eq!(tb.random.remaining(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stale_gate_timer_does_not_resolve_a_rerun() {
    let tb = seeded_bench([]);
    let subject = GateSubject::branch("main");

    let stale = tb
        .bench
        .run_gates(subject.clone(), EnvironmentName::Stage)
        .unwrap()
        .into_handle()
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    tb.bench.reset();
    let rerun = tb
        .bench
        .run_gates(subject.clone(), EnvironmentName::Stage)
        .unwrap()
        .into_handle()
        .unwrap();

    assert!(stale.resolved().await.unwrap().is_none());
    assert_eq!(
        tb.bench.store().gate_status(&subject, EnvironmentName::Stage),
        TestStatus::Running
    );

    let record = rerun.resolved().await.unwrap().unwrap();
    assert_eq!(record.status, TestStatus::Passed);
}

#[test]
fn test_runs_outside_a_runtime_are_refused() {
    let tb = seeded_bench([0.0, 0.1]);
    let before = tb.bench.store().snapshot();

    let err = tb.bench.run_suite("test-5").unwrap_err();
    assert!(matches!(err, WorkflowError::Simulation(_)));

    let err = tb
        .bench
        .run_gates(GateSubject::branch("main"), EnvironmentName::Stage)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::Simulation(_)));

    // nothing was left running and nothing was drawn
    assert_eq!(tb.bench.store().snapshot(), before);
    assert_eq!(tb.random.remaining(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_padded_branch_gate_run_is_recorded_trimmed() {
    let tb = seeded_bench([]);

    let record = tb
        .bench
        .run_gates(GateSubject::Branch(" main ".to_string()), EnvironmentName::Stage)
        .unwrap()
        .into_handle()
        .unwrap()
        .resolved()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, TestStatus::Passed);
    assert_eq!(
        tb.bench.store().gate_status(&GateSubject::branch("main"), EnvironmentName::Stage),
        TestStatus::Passed
    );
}

#[tokio::test(start_paused = true)]
async fn test_run_events_are_published() {
    let tb = seeded_bench([0.0, 0.1]);
    let mut rx = tb.bench.publisher().subscribe();

    let handle = tb.bench.run_suite("test-2").unwrap().into_handle().unwrap();
    let started = rx.recv().await.unwrap();
    assert_eq!(started.name, events::TEST_RUN_STARTED);
    assert_eq!(started.context["suite_id"], "test-2");

    handle.resolved().await.unwrap();
    let passed = rx.recv().await.unwrap();
    assert_eq!(passed.name, events::TEST_RUN_PASSED);
    assert_eq!(passed.message, "Workflow Tests - Auth passed (12/12)");
}

#[tokio::test(start_paused = true)]
async fn test_gate_run_not_required_for_dev() {
    let tb = seeded_bench([]);
    let outcome = tb
        .bench
        .run_gates(GateSubject::branch("main"), EnvironmentName::Dev)
        .unwrap();
    assert!(matches!(outcome, RunOutcome::NotRequired));
}

#[tokio::test(start_paused = true)]
async fn test_gate_run_validates_subject() {
    let tb = seeded_bench([]);

    let err = tb
        .bench
        .run_gates(GateSubject::branch("  "), EnvironmentName::Stage)
        .unwrap_err();
    assert_eq!(err, WorkflowError::MissingField { field: "branch" });

    let err = tb
        .bench
        .run_gates(GateSubject::release("rel-404"), EnvironmentName::Stage)
        .unwrap_err();
    assert!(matches!(err, WorkflowError::UnknownRelease { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_gate_run_unlocks_auto_deploy() {
    let tb = seeded_bench([]);
    let subject = GateSubject::branch("hotfix/payment-bug");

    let handle = tb
        .bench
        .run_gates(subject.clone(), EnvironmentName::Prod)
        .unwrap()
        .into_handle()
        .unwrap();
    assert_eq!(handle.delay(), Duration::from_millis(2000));
    assert_eq!(
        tb.bench.store().gate_status(&subject, EnvironmentName::Prod),
        TestStatus::Running
    );
    assert!(tb
        .bench
        .run_gates(subject.clone(), EnvironmentName::Prod)
        .unwrap()
        .is_ignored());

    // still running: auto-deploy is blocked
    let blocked = tb.bench.create_release(
        &CreateReleaseRequest::new("v1.2.2", "hotfix/payment-bug").auto_deploy_to(EnvironmentName::Prod),
    );
    assert!(blocked.unwrap_err().is_gate_failure());

    let record = handle.resolved().await.unwrap().unwrap();
    assert_eq!(record.status, TestStatus::Passed);

    let outcome = tb
        .bench
        .create_release(
            &CreateReleaseRequest::new("v1.2.2", "hotfix/payment-bug").auto_deploy_to(EnvironmentName::Prod),
        )
        .unwrap();
    let deployment = outcome.deployment.unwrap();
    assert_eq!(deployment.environment_id, "env-prod");
    assert_eq!(deployment.required_suites.len(), 3);
    assert_eq!(
        tb.bench
            .store()
            .environment(EnvironmentName::Prod)
            .unwrap()
            .current_release,
        Some(outcome.release.id)
    );
}

#[tokio::test(start_paused = true)]
async fn test_release_gate_run_then_deploy_to_stage() {
    let tb = seeded_bench([]);
    let mut rx = tb.bench.publisher().subscribe();

    let handle = tb
        .bench
        .run_gates(GateSubject::release("rel-1"), EnvironmentName::Stage)
        .unwrap()
        .into_handle()
        .unwrap();
    handle.resolved().await.unwrap();

    let names: Vec<String> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|event| event.name)
        .collect();
    assert_eq!(
        names,
        vec![
            events::GATE_RUN_STARTED.to_string(),
            events::GATE_RUN_PASSED.to_string(),
        ]
    );

    let deployment = tb
        .bench
        .deploy(&DeployRequest::new("rel-1", EnvironmentName::Stage))
        .unwrap();
    assert_eq!(deployment.environment_id, "env-stage");
}

#[tokio::test(start_paused = true)]
async fn test_every_dev_suite_resolves() {
    let tb = seeded_bench([]);
    // fallback draw of 0.0 means shortest delay and a passing roll
    let handles: Vec<_> = ["test-1", "test-2", "test-5"]
        .into_iter()
        .map(|id| tb.bench.run_suite(id).unwrap().into_handle().unwrap())
        .collect();

    let suites = futures::future::join_all(handles.into_iter().map(|h| h.resolved())).await;
    for suite in suites {
        let suite = suite.unwrap().unwrap();
        assert_eq!(suite.status, TestStatus::Passed);
        assert!(suite.counts_consistent());
    }
    assert_eq!(tb.bench.summary().passed_suites, 4);
}
