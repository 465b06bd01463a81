use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::policy::required_gates;
use crate::models::EnvironmentName;
use crate::state_machine::TestStatus;

/// What a gate run was recorded against
///
/// The create-release flow runs gates against the branch because the
/// release does not exist yet; deploys run them against the release.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GateSubject {
    Release(String),
    Branch(String),
}

impl GateSubject {
    pub fn release(id: impl Into<String>) -> Self {
        Self::Release(id.into())
    }

    /// Branch names are stored trimmed, matching how releases record them
    pub fn branch(name: impl Into<String>) -> Self {
        Self::Branch(name.into()).normalized()
    }

    /// Trim surrounding whitespace from a branch name
    pub fn normalized(self) -> Self {
        match self {
            Self::Branch(name) => Self::Branch(name.trim().to_string()),
            release => release,
        }
    }
}

impl fmt::Display for GateSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Release(id) => write!(f, "release:{id}"),
            Self::Branch(name) => write!(f, "branch:{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRecord {
    pub status: TestStatus,
    pub checked_at: DateTime<Utc>,
}

/// Gate satisfaction per (subject, environment)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateLedger {
    records: HashMap<(GateSubject, EnvironmentName), GateRecord>,
}

impl GateLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        subject: GateSubject,
        environment: EnvironmentName,
        status: TestStatus,
        checked_at: DateTime<Utc>,
    ) {
        self.records
            .insert((subject, environment), GateRecord { status, checked_at });
    }

    pub fn get(&self, subject: &GateSubject, environment: EnvironmentName) -> Option<GateRecord> {
        // HashMap lookups on tuple keys need an owned key
        self.records.get(&(subject.clone(), environment)).copied()
    }

    pub fn status(&self, subject: &GateSubject, environment: EnvironmentName) -> TestStatus {
        self.get(subject, environment)
            .map(|record| record.status)
            .unwrap_or_default()
    }

    /// Environments without gates are always satisfied
    pub fn is_satisfied(&self, subject: &GateSubject, environment: EnvironmentName) -> bool {
        required_gates(environment).is_empty()
            || self.status(subject, environment) == TestStatus::Passed
    }

    /// Gate labels still outstanding for the subject
    pub fn missing_gates(&self, subject: &GateSubject, environment: EnvironmentName) -> Vec<String> {
        if self.is_satisfied(subject, environment) {
            Vec::new()
        } else {
            required_gates(environment)
                .iter()
                .map(|gate| gate.to_string())
                .collect()
        }
    }

    /// Copy a record to another subject, used when a branch becomes a release
    pub fn carry_over(&mut self, from: &GateSubject, to: GateSubject, environment: EnvironmentName) {
        if let Some(record) = self.get(from, environment) {
            self.records.insert((to, environment), record);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
