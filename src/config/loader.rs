//! Configuration Loader
//!
//! Layers built-in defaults, an optional TOML file and prefixed environment
//! variables (`DEPLOYKIT__SIMULATION__PASS_PROBABILITY=0.5`), then validates
//! the result.

use ::config::{Config, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

use super::error::ConfigResult;
use super::DeployKitConfig;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "DEPLOYKIT";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an optional file plus `DEPLOYKIT__*` variables
    pub fn load(path: Option<&Path>) -> ConfigResult<DeployKitConfig> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load configuration reading environment overrides under `prefix`
    pub fn load_with_prefix(path: Option<&Path>, prefix: &str) -> ConfigResult<DeployKitConfig> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: DeployKitConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            environment = %Self::detect_environment(),
            actor = %config.deploy.actor,
            min_run_delay_ms = config.simulation.min_run_delay_ms,
            max_run_delay_ms = config.simulation.max_run_delay_ms,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Deployment environment of this process (not a deploy target)
    pub fn detect_environment() -> String {
        std::env::var("DEPLOYKIT_ENV")
            .or_else(|_| std::env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults_without_sources() {
        let config = ConfigLoader::load_with_prefix(None, "DEPLOYKIT_LOADER_DEFAULTS").unwrap();
        assert_eq!(config, DeployKitConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[simulation]
min_run_delay_ms = 10
max_run_delay_ms = 20
pass_probability = 1.0

[deploy]
actor = "ci-bot"
region = "eu-west-1"
"#
        )
        .unwrap();

        let config =
            ConfigLoader::load_with_prefix(Some(file.path()), "DEPLOYKIT_LOADER_FILE").unwrap();
        assert_eq!(config.simulation.min_run_delay_ms, 10);
        assert_eq!(config.simulation.max_run_delay_ms, 20);
        assert_eq!(config.simulation.pass_probability, 1.0);
        // untouched keys keep their defaults
        assert_eq!(config.simulation.gate_run_delay_ms, 2000);
        assert_eq!(config.deploy.actor, "ci-bot");
        assert_eq!(config.deploy.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn test_env_overrides() {
        std::env::set_var("DEPLOYKIT_LOADER_ENV__DEPLOY__ACTOR", "env-bot");
        std::env::set_var("DEPLOYKIT_LOADER_ENV__SIMULATION__GATE_RUN_DELAY_MS", "50");

        let config = ConfigLoader::load_with_prefix(None, "DEPLOYKIT_LOADER_ENV").unwrap();
        assert_eq!(config.deploy.actor, "env-bot");
        assert_eq!(config.simulation.gate_run_delay_ms, 50);

        std::env::remove_var("DEPLOYKIT_LOADER_ENV__DEPLOY__ACTOR");
        std::env::remove_var("DEPLOYKIT_LOADER_ENV__SIMULATION__GATE_RUN_DELAY_MS");
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[simulation]\nmin_run_delay_ms = 5000").unwrap();

        let result = ConfigLoader::load_with_prefix(Some(file.path()), "DEPLOYKIT_LOADER_INVALID");
        assert!(result.is_err());
    }
}
