//! # DeployKit Configuration
//!
//! Tunables for the simulators and the deploy workflow. Defaults reproduce the
//! dashboard's behaviour; a TOML file and `DEPLOYKIT__*` environment variables
//! can override them (see [`loader::ConfigLoader`]).
//!
//! ```rust,no_run
//! use deploykit_core::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load(None)?;
//! println!("runs take {}-{} ms", config.simulation.min_run_delay_ms, config.simulation.max_run_delay_ms);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::system;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigLoader;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployKitConfig {
    /// Test and gate run simulation
    pub simulation: SimulationConfig,

    /// Deployment record defaults
    pub deploy: DeployConfig,

    /// Event channel settings
    pub events: EventsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub min_run_delay_ms: u64,
    pub max_run_delay_ms: u64,
    /// Chance a suite run resolves to `passed`
    pub pass_probability: f64,
    pub min_failure_fraction: f64,
    pub max_failure_fraction: f64,
    pub gate_run_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_run_delay_ms: system::MIN_RUN_DELAY_MS,
            max_run_delay_ms: system::MAX_RUN_DELAY_MS,
            pass_probability: system::PASS_PROBABILITY,
            min_failure_fraction: system::MIN_FAILURE_FRACTION,
            max_failure_fraction: system::MAX_FAILURE_FRACTION,
            gate_run_delay_ms: system::GATE_RUN_DELAY_MS,
        }
    }
}

impl SimulationConfig {
    pub fn gate_run_delay(&self) -> Duration {
        Duration::from_millis(self.gate_run_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Identity recorded as the deployment actor
    pub actor: String,
    pub region: Option<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            actor: system::DEFAULT_ACTOR.to_string(),
            region: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: system::EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl DeployKitConfig {
    /// Validate ranges and probabilities
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let sim = &self.simulation;

        if sim.min_run_delay_ms > sim.max_run_delay_ms {
            return Err(ConfigurationError::invalid_value(
                "simulation.min_run_delay_ms",
                sim.min_run_delay_ms,
                "must not exceed simulation.max_run_delay_ms",
            ));
        }

        if !(0.0..=1.0).contains(&sim.pass_probability) {
            return Err(ConfigurationError::invalid_value(
                "simulation.pass_probability",
                sim.pass_probability,
                "must be between 0 and 1",
            ));
        }

        for (field, value) in [
            ("simulation.min_failure_fraction", sim.min_failure_fraction),
            ("simulation.max_failure_fraction", sim.max_failure_fraction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::invalid_value(
                    field,
                    value,
                    "must be between 0 and 1",
                ));
            }
        }

        if sim.min_failure_fraction > sim.max_failure_fraction {
            return Err(ConfigurationError::invalid_value(
                "simulation.min_failure_fraction",
                sim.min_failure_fraction,
                "must not exceed simulation.max_failure_fraction",
            ));
        }

        if self.deploy.actor.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "deploy.actor",
                "deploy configuration",
            ));
        }

        if self.events.channel_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "events.channel_capacity",
                0,
                "channel capacity must be greater than 0",
            ));
        }

        Ok(())
    }
}
