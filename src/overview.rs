//! Read-only views the dashboard pages are built from.

use serde::{Deserialize, Serialize};

use crate::models::{Deployment, Environment, EnvironmentName, Release, TestSuite};
use crate::state_machine::{ReleaseStatus, TestStatus};
use crate::store::DomainStore;

/// Counters shown on the overview cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Releases not yet fully deployed
    pub active_releases: usize,
    pub total_releases: usize,
    pub healthy_environments: usize,
    pub total_environments: usize,
    pub passed_suites: usize,
    pub total_suites: usize,
}

pub fn dashboard_summary(store: &DomainStore) -> DashboardSummary {
    store.read(|catalog| DashboardSummary {
        active_releases: catalog
            .releases
            .iter()
            .filter(|r| r.status != ReleaseStatus::Deployed)
            .count(),
        total_releases: catalog.releases.len(),
        healthy_environments: catalog.environments.iter().filter(|e| e.is_healthy()).count(),
        total_environments: catalog.environments.len(),
        passed_suites: catalog
            .test_suites
            .iter()
            .filter(|s| s.status == TestStatus::Passed)
            .count(),
        total_suites: catalog.test_suites.len(),
    })
}

/// Releases offered in the deploy picker
pub fn deployable_releases(store: &DomainStore) -> Vec<Release> {
    store.read(|catalog| {
        catalog
            .releases
            .iter()
            .filter(|r| r.status.is_deployable())
            .cloned()
            .collect()
    })
}

/// Environments a release has been deployed to, in environment order
pub fn deployed_environments(store: &DomainStore, release_id: &str) -> Vec<Environment> {
    store.read(|catalog| {
        let Some(release) = catalog.release(release_id) else {
            return Vec::new();
        };
        catalog
            .environments
            .iter()
            .filter(|env| release.is_deployed_to(env.name))
            .cloned()
            .collect()
    })
}

/// Most recent deployment of a release into an environment
pub fn find_deployment(
    store: &DomainStore,
    release_id: &str,
    environment: EnvironmentName,
) -> Option<Deployment> {
    let environment_id = environment.environment_id();
    store.read(|catalog| {
        catalog
            .deployments
            .iter()
            .rev()
            .find(|d| d.release_id == release_id && d.environment_id == environment_id)
            .cloned()
    })
}

/// Release currently live in an environment
pub fn current_release(store: &DomainStore, environment: EnvironmentName) -> Option<Release> {
    store.read(|catalog| {
        let release_id = catalog.environment(environment)?.current_release.as_deref()?;
        catalog.release(release_id).cloned()
    })
}

pub fn suites_for_environment(store: &DomainStore, environment: EnvironmentName) -> Vec<TestSuite> {
    store.read(|catalog| {
        catalog
            .test_suites
            .iter()
            .filter(|s| s.environment == environment)
            .cloned()
            .collect()
    })
}

pub fn suites_for_release(store: &DomainStore, release_id: &str) -> Vec<TestSuite> {
    store.read(|catalog| {
        catalog
            .test_suites
            .iter()
            .filter(|s| s.release_id.as_deref() == Some(release_id))
            .cloned()
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HealthStatus;

    #[test]
    fn test_seeded_summary() {
        let store = DomainStore::seeded();
        let summary = dashboard_summary(&store);
        assert_eq!(summary.active_releases, 2);
        assert_eq!(summary.total_releases, 3);
        assert_eq!(summary.healthy_environments, 3);
        assert_eq!(summary.passed_suites, 3);
        assert_eq!(summary.total_suites, 5);

        store.set_environment_health(EnvironmentName::Stage, HealthStatus::Degraded);
        assert_eq!(dashboard_summary(&store).healthy_environments, 2);
    }

    #[test]
    fn test_picker_excludes_deployed_releases() {
        let store = DomainStore::seeded();
        let ids: Vec<String> = deployable_releases(&store).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["rel-1".to_string(), "rel-3".to_string()]);
    }

    #[test]
    fn test_deployed_environments_and_lookup() {
        let store = DomainStore::seeded();
        let envs: Vec<EnvironmentName> = deployed_environments(&store, "rel-2")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(envs, EnvironmentName::ALL.to_vec());
        assert!(deployed_environments(&store, "rel-3").is_empty());
        assert!(deployed_environments(&store, "nope").is_empty());

        let deployment = find_deployment(&store, "rel-2", EnvironmentName::Prod).unwrap();
        assert_eq!(deployment.environment_id, "env-prod");
        assert_eq!(deployment.required_suites.len(), 3);
        assert!(find_deployment(&store, "rel-3", EnvironmentName::Dev).is_none());
    }

    #[test]
    fn test_current_release_and_suite_filters() {
        let store = DomainStore::seeded();
        assert_eq!(current_release(&store, EnvironmentName::Dev).unwrap().id, "rel-1");
        assert_eq!(suites_for_environment(&store, EnvironmentName::Dev).len(), 3);
        assert_eq!(suites_for_release(&store, "rel-2").len(), 2);
    }
}
