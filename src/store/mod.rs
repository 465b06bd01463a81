//! # Domain Store
//!
//! In-memory catalog of releases, environments, test suites, deployments and
//! gate results. A store is constructed explicitly from a seed catalog and can
//! be reset to that seed; cloning a [`DomainStore`] yields another handle to
//! the same catalog.
//!
//! Every workflow mutation runs inside a single [`DomainStore::write`] call,
//! so a caller observes either all of a workflow's changes or none of them.

pub mod seed;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::gates::{GateLedger, GateSubject};
use crate::models::{Deployment, Environment, EnvironmentName, HealthStatus, Release, TestSuite};
use crate::state_machine::TestStatus;

pub use seed::{empty_catalog, mock_catalog};

/// Everything the workflows read and mutate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub releases: Vec<Release>,
    pub environments: Vec<Environment>,
    pub test_suites: Vec<TestSuite>,
    pub deployments: Vec<Deployment>,
    pub gates: GateLedger,
    pub runs: ActiveRuns,
}

/// Token of every run in flight
///
/// A timer only resolves the run it started: a reset clears the tokens and
/// a re-run replaces them, so earlier timers find no match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveRuns {
    suites: HashMap<String, Uuid>,
    gates: HashMap<(GateSubject, EnvironmentName), Uuid>,
}

impl ActiveRuns {
    pub fn start_suite(&mut self, suite_id: &str) -> Uuid {
        let token = Uuid::new_v4();
        self.suites.insert(suite_id.to_string(), token);
        token
    }

    /// Consume the token if it is still the current one for `suite_id`
    pub fn finish_suite(&mut self, suite_id: &str, token: Uuid) -> bool {
        if self.suites.get(suite_id) == Some(&token) {
            self.suites.remove(suite_id);
            true
        } else {
            false
        }
    }

    pub fn start_gates(&mut self, subject: &GateSubject, environment: EnvironmentName) -> Uuid {
        let token = Uuid::new_v4();
        self.gates.insert((subject.clone(), environment), token);
        token
    }

    pub fn finish_gates(&mut self, subject: &GateSubject, environment: EnvironmentName, token: Uuid) -> bool {
        let key = (subject.clone(), environment);
        if self.gates.get(&key) == Some(&token) {
            self.gates.remove(&key);
            true
        } else {
            false
        }
    }

    pub fn cancel_gates(&mut self, subject: &GateSubject, environment: EnvironmentName) {
        self.gates.remove(&(subject.clone(), environment));
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty() && self.gates.is_empty()
    }
}

impl Catalog {
    pub fn release(&self, release_id: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.id == release_id)
    }

    pub fn release_mut(&mut self, release_id: &str) -> Option<&mut Release> {
        self.releases.iter_mut().find(|r| r.id == release_id)
    }

    pub fn environment(&self, name: EnvironmentName) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }

    /// Environments are static; a missing one is added on first write
    pub fn environment_mut(&mut self, name: EnvironmentName) -> &mut Environment {
        let index = match self.environments.iter().position(|e| e.name == name) {
            Some(index) => index,
            None => {
                self.environments.push(Environment::new(name));
                self.environments.len() - 1
            }
        };
        &mut self.environments[index]
    }

    pub fn test_suite(&self, suite_id: &str) -> Option<&TestSuite> {
        self.test_suites.iter().find(|s| s.id == suite_id)
    }

    pub fn test_suite_mut(&mut self, suite_id: &str) -> Option<&mut TestSuite> {
        self.test_suites.iter_mut().find(|s| s.id == suite_id)
    }
}

/// Shared handle to the catalog
#[derive(Debug, Clone)]
pub struct DomainStore {
    inner: Arc<Mutex<Catalog>>,
    seed: Arc<Catalog>,
}

impl DomainStore {
    /// Create a store whose initial (and reset) contents are `seed`
    pub fn new(seed: Catalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(seed.clone())),
            seed: Arc::new(seed),
        }
    }

    /// Store seeded with the dashboard's mock catalog
    pub fn seeded() -> Self {
        Self::new(mock_catalog())
    }

    /// Store with the three environments and nothing else
    pub fn empty() -> Self {
        Self::new(empty_catalog())
    }

    /// Restore the seed contents, dropping every simulated change
    pub fn reset(&self) {
        *self.inner.lock() = (*self.seed).clone();
        tracing::debug!("Domain store reset to seed catalog");
    }

    /// Run `f` with shared access to the catalog
    pub fn read<R>(&self, f: impl FnOnce(&Catalog) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Run `f` with exclusive access to the catalog
    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Catalog) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn snapshot(&self) -> Catalog {
        self.read(Catalog::clone)
    }

    pub fn releases(&self) -> Vec<Release> {
        self.read(|c| c.releases.clone())
    }

    pub fn release(&self, release_id: &str) -> Option<Release> {
        self.read(|c| c.release(release_id).cloned())
    }

    pub fn environments(&self) -> Vec<Environment> {
        self.read(|c| c.environments.clone())
    }

    pub fn environment(&self, name: EnvironmentName) -> Option<Environment> {
        self.read(|c| c.environment(name).cloned())
    }

    pub fn test_suites(&self) -> Vec<TestSuite> {
        self.read(|c| c.test_suites.clone())
    }

    pub fn test_suite(&self, suite_id: &str) -> Option<TestSuite> {
        self.read(|c| c.test_suite(suite_id).cloned())
    }

    pub fn deployments(&self) -> Vec<Deployment> {
        self.read(|c| c.deployments.clone())
    }

    pub fn gate_status(&self, subject: &GateSubject, environment: EnvironmentName) -> TestStatus {
        self.read(|c| c.gates.status(subject, environment))
    }

    /// Add or replace a release record
    pub fn insert_release(&self, release: Release) {
        self.write(|c| match c.release_mut(&release.id) {
            Some(existing) => *existing = release,
            None => c.releases.push(release),
        });
    }

    /// Add or replace a test suite record
    pub fn insert_test_suite(&self, suite: TestSuite) {
        self.write(|c| match c.test_suite_mut(&suite.id) {
            Some(existing) => *existing = suite,
            None => c.test_suites.push(suite),
        });
    }

    pub fn set_environment_health(&self, name: EnvironmentName, status: HealthStatus) {
        self.write(|c| c.environment_mut(name).status = status);
    }
}

impl Default for DomainStore {
    fn default() -> Self {
        Self::seeded()
    }
}
