//! Configuration loading with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Host app candidate list cannot be empty")]
    NoHostCandidates,

    #[error("Invalid poll interval: {0} ms. Must be positive")]
    InvalidPollInterval(u64),

    #[error("Invalid wait timeout: {0} ms. Must be at least the poll interval ({1} ms)")]
    InvalidWaitTimeout(u64, u64),

    #[error("Invalid max_scroll_passes: {0}. Must be between 1 and 100")]
    InvalidScrollPasses(u32),

    #[error("Invalid min_token_len: {0}. Must be at least 1")]
    InvalidMinTokenLen(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Sync endpoint cannot be empty when sync is enabled")]
    EmptySyncEndpoint,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .changeling/config.yaml (project config)
    /// 3. .changeling/local.yaml (local overrides, optional)
    /// 4. Environment variables (CHANGELING_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".changeling/config.yaml"))
            .merge(Yaml::file(".changeling/local.yaml"))
            .merge(Env::prefixed("CHANGELING_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.host.app_candidates.is_empty() {
            return Err(ConfigError::NoHostCandidates);
        }

        if config.timing.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidPollInterval(
                config.timing.poll_interval_ms,
            ));
        }

        if config.timing.wait_timeout_ms < config.timing.poll_interval_ms {
            return Err(ConfigError::InvalidWaitTimeout(
                config.timing.wait_timeout_ms,
                config.timing.poll_interval_ms,
            ));
        }

        if config.scan.max_scroll_passes == 0 || config.scan.max_scroll_passes > 100 {
            return Err(ConfigError::InvalidScrollPasses(
                config.scan.max_scroll_passes,
            ));
        }

        if config.scan.min_token_len == 0 {
            return Err(ConfigError::InvalidMinTokenLen(config.scan.min_token_len));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.sync.enabled && config.sync.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptySyncEndpoint);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.scan.max_scroll_passes, 10);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
host:
  app_candidates: [org.example.messenger]
  screen_marker: Lists
timing:
  poll_interval_ms: 50
  wait_timeout_ms: 2000
scan:
  max_scroll_passes: 20
sync:
  endpoint: http://10.0.0.5:3002
";
        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.host.app_candidates, vec!["org.example.messenger"]);
        assert_eq!(config.host.screen_marker, "Lists");
        assert_eq!(config.timing.poll_interval_ms, 50);
        assert_eq!(config.scan.max_scroll_passes, 20);
        assert_eq!(config.sync.endpoint, "http://10.0.0.5:3002");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_empty_candidates() {
        let mut config = Config::default();
        config.host.app_candidates.clear();

        let result = ConfigLoader::validate(&config);
        assert!(matches!(result.unwrap_err(), ConfigError::NoHostCandidates));
    }

    #[test]
    fn test_validate_zero_poll_interval() {
        let mut config = Config::default();
        config.timing.poll_interval_ms = 0;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidPollInterval(0)
        ));
    }

    #[test]
    fn test_validate_timeout_below_interval() {
        let mut config = Config::default();
        config.timing.poll_interval_ms = 500;
        config.timing.wait_timeout_ms = 100;

        let result = ConfigLoader::validate(&config);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidWaitTimeout(100, 500)
        ));
    }

    #[test]
    fn test_validate_scroll_passes_bounds() {
        let mut config = Config::default();
        config.scan.max_scroll_passes = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidScrollPasses(0)
        ));

        config.scan.max_scroll_passes = 101;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidScrollPasses(101)
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "verbose"),
            other => panic!("Expected InvalidLogLevel, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_empty_endpoint_only_when_enabled() {
        let mut config = Config::default();
        config.sync.endpoint = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptySyncEndpoint
        ));

        config.sync.enabled = false;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "scan:\n  max_scroll_passes: 5\nhost:\n  screen_marker: Lists"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "scan:\n  max_scroll_passes: 15").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.scan.max_scroll_passes, 15, "Override should win");
        assert_eq!(
            config.host.screen_marker, "Lists",
            "Base value should persist when not overridden"
        );
    }
}
