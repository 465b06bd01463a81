//! # DeployKit Simulator
//!
//! Seeds a workbench, runs a few test suites, runs the gates for a branch,
//! cuts a release from it and prints the resulting dashboard state as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use deploykit_core::config::ConfigLoader;
use deploykit_core::gates::GateSubject;
use deploykit_core::logging::init_structured_logging;
use deploykit_core::models::{EnvironmentName, TestSuite};
use deploykit_core::overview;
use deploykit_core::simulation::{RandomSource, SeededRandom, SystemClock, ThreadRandom};
use deploykit_core::store::DomainStore;
use deploykit_core::workbench::Workbench;
use deploykit_core::workflow::CreateReleaseRequest;

#[derive(Parser)]
#[command(name = "deploykit-sim")]
#[command(about = "Simulate test runs, gate runs and a release deploy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// TOML configuration file (DEPLOYKIT__* variables still apply)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for reproducible run outcomes
    #[arg(short, long)]
    seed: Option<u64>,

    /// Suite ids to run before releasing
    #[arg(long = "suite", default_values = ["test-1", "test-2"])]
    suites: Vec<String>,

    /// Name of the release to cut
    #[arg(long, default_value = "v2.0.0")]
    release: String,

    /// Branch the release is cut from
    #[arg(long, default_value = "main")]
    branch: String,

    /// Environment to auto-deploy the new release to
    #[arg(short, long, default_value = "stage")]
    environment: EnvironmentName,

    /// Skip the gate run, leaving the auto-deploy to be blocked by gates
    #[arg(long)]
    skip_gates: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_structured_logging();

    let config = ConfigLoader::load(cli.config.as_deref()).context("loading configuration")?;

    let random: Arc<dyn RandomSource> = match cli.seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    };
    let bench = Workbench::with_sources(config, DomainStore::seeded(), random, Arc::new(SystemClock));

    let mut ran: Vec<TestSuite> = Vec::new();
    for suite_id in &cli.suites {
        let outcome = bench.run_suite(suite_id)?;
        if let Some(handle) = outcome.into_handle() {
            info!(suite_id = %suite_id, delay_ms = handle.delay().as_millis() as u64, "Waiting for suite run");
            if let Some(suite) = handle.resolved().await? {
                ran.push(suite);
            }
        }
    }

    if !cli.skip_gates {
        let outcome = bench.run_gates(GateSubject::branch(cli.branch.as_str()), cli.environment)?;
        if let Some(handle) = outcome.into_handle() {
            handle.resolved().await?;
        }
    }

    let request = CreateReleaseRequest::new(cli.release.as_str(), cli.branch.as_str())
        .auto_deploy_to(cli.environment);
    let release = match bench.create_release(&request) {
        Ok(outcome) => json!({
            "message": outcome.message,
            "release": outcome.release,
            "deployment": outcome.deployment,
        }),
        Err(err) if err.is_gate_failure() => {
            warn!(error = %err, "Release created but not deployed");
            json!({ "error": err.to_string() })
        }
        Err(err) => return Err(err.into()),
    };

    let report = json!({
        "suites": ran,
        "release": release,
        "summary": bench.summary(),
        "live": EnvironmentName::ALL
            .iter()
            .map(|env| (env.as_str(), overview::current_release(bench.store(), *env).map(|r| r.name)))
            .collect::<std::collections::BTreeMap<_, _>>(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
