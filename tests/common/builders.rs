use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use deploykit_core::config::DeployKitConfig;
use deploykit_core::models::{EnvironmentName, TestSuite, TestType};
use deploykit_core::simulation::{ManualClock, ScriptedRandom};
use deploykit_core::state_machine::TestStatus;
use deploykit_core::store::DomainStore;
use deploykit_core::workbench::Workbench;

/// Workbench with scripted draws and a hand-driven clock
pub struct TestBench {
    pub bench: Workbench,
    pub random: Arc<ScriptedRandom>,
    pub clock: Arc<ManualClock>,
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()
}

/// Seeded workbench; draws are consumed as delay, pass roll, failure fraction
pub fn seeded_bench(draws: impl IntoIterator<Item = f64>) -> TestBench {
    bench_with(DeployKitConfig::default(), DomainStore::seeded(), draws)
}

pub fn bench_with(
    config: DeployKitConfig,
    store: DomainStore,
    draws: impl IntoIterator<Item = f64>,
) -> TestBench {
    let random = Arc::new(ScriptedRandom::new(draws));
    let clock = Arc::new(ManualClock::new(start_time()));
    let bench = Workbench::with_sources(config, store, random.clone(), clock.clone());
    TestBench {
        bench,
        random,
        clock,
    }
}

pub fn pending_suite(id: &str, name: &str, total: u32) -> TestSuite {
    TestSuite {
        id: id.to_string(),
        name: name.to_string(),
        suite_type: TestType::Unit,
        environment: EnvironmentName::Dev,
        status: TestStatus::Pending,
        passed: 0,
        failed: 0,
        total,
        last_run_at: None,
        release_id: None,
    }
}
