//! # Test Gates
//!
//! Which test suites must pass before a release may land in an environment,
//! and the ledger recording which release (or branch) has passed them.

pub mod ledger;
pub mod policy;

pub use ledger::{GateLedger, GateRecord, GateSubject};
pub use policy::{has_gates, required_gates};
