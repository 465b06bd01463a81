#![allow(clippy::doc_markdown)] // Allow technical terms like DeployKit, TOML in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # DeployKit Core Rust
//!
//! Domain core of the DeployKit release dashboard: releases, environments,
//! test suites and deployments, plus the workflows that move them.
//!
//! ## Overview
//!
//! Everything lives in an in-memory [`store::DomainStore`] seeded with a mock
//! catalog. Test execution is simulated: a run flips a suite to `running` and
//! a Tokio timer resolves it to `passed` or `failed` a short while later.
//! Deploys to staging and production are gated on required tests having
//! passed for that environment.
//!
//! ## Module Organization
//!
//! - [`models`] - Release, environment, test suite and deployment records
//! - [`state_machine`] - Status enums, suite transitions and deploy guards
//! - [`gates`] - Required-gate policy and the gate result ledger
//! - [`store`] - In-memory catalog with seed and reset
//! - [`simulation`] - Timer-driven test and gate runs
//! - [`workflow`] - Create-release and deploy workflows
//! - [`overview`] - Dashboard read models
//! - [`workbench`] - One-stop wiring of all of the above
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`events`] - Confirmation event channel
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deploykit_core::config::DeployKitConfig;
//! use deploykit_core::models::EnvironmentName;
//! use deploykit_core::workbench::Workbench;
//! use deploykit_core::workflow::DeployRequest;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bench = Workbench::new(DeployKitConfig::default());
//!
//! // Dev has no gates, so any ready release deploys straight away
//! let deployment = bench.deploy(&DeployRequest::new("rel-1", EnvironmentName::Dev))?;
//! println!("{} -> {}", deployment.release_id, deployment.environment_id);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests, including paused-time simulator tests
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod gates;
pub mod logging;
pub mod models;
pub mod overview;
pub mod simulation;
pub mod state_machine;
pub mod store;
pub mod workbench;
pub mod workflow;

pub use config::{ConfigLoader, DeployConfig, DeployKitConfig, EventsConfig, SimulationConfig};
// Re-export constants events with different name to avoid conflict
pub use constants::events as system_events;
pub use error::{WorkflowError, WorkflowResult};
pub use events::{EventPublisher, PublishedEvent};
pub use gates::{GateLedger, GateRecord, GateSubject};
pub use models::{
    Deployment, DeploymentResult, Environment, EnvironmentName, HealthStatus, Release, TestSuite,
    TestType,
};
pub use overview::DashboardSummary;
pub use simulation::{RunHandle, RunOutcome};
pub use state_machine::{ReleaseStatus, SuiteEvent, TestStatus};
pub use store::DomainStore;
pub use workbench::Workbench;
pub use workflow::{CreateReleaseRequest, DeployRequest, ReleaseOutcome};
