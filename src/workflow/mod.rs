//! # Release and Deploy Workflows
//!
//! Validation and state changes behind the create-release and deploy
//! actions. Both report failures synchronously and never retry.

pub mod deploy;
pub mod release;

pub use deploy::{gate_snapshot_id, DeployRequest, DeployWorkflow};
pub use release::{CreateReleaseRequest, ReleaseOutcome, ReleaseWorkflow};
