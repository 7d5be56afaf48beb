// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Lookup configuration
//!
//! Configuration is layered with the `config` crate, later sources winning:
//!
//! 1. Default values
//! 2. `fraud-lookup.json`
//! 3. `fraud-lookup.{environment}.json`
//! 4. Environment variables prefixed with `FRAUD_LOOKUP__`, using `__` to
//!    reach nested keys (`FRAUD_LOOKUP__LOADER__MAX_ATTEMPTS=5`)
//!
//! `HF_TOKEN` supplies `loader.auth_token` when no other source sets it.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment as ConfigEnv, File};
use serde::{Deserialize, Serialize};
use sms_predictor::{ClassifierConfig, LoaderConfig};

use crate::error::LookupResult;

const CONFIG_FILE_STEM: &str = "fraud-lookup";
const ENV_PREFIX: &str = "FRAUD_LOOKUP";
const TOKEN_VAR: &str = "HF_TOKEN";

/// Environment types for configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    #[default]
    Development,
    /// Testing environment
    Testing,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

/// Configuration of the lookup context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Environment type
    pub environment: Environment,
    /// Model artifact loader settings
    pub loader: LoaderConfig,
    /// SMS classifier settings
    pub classifier: ClassifierConfig,
    /// YAML or JSON file of stored heading rules
    pub headings_file: Option<PathBuf>,
    /// Seed the store with the international country codes
    ///
    /// Seeded codes classify exactly as the built-in table does but report
    /// the stored rule's id.
    pub populate_defaults: bool,
    /// Load the model during startup instead of on first use
    pub warm_up: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            loader: LoaderConfig::default(),
            classifier: ClassifierConfig::default(),
            headings_file: None,
            populate_defaults: false,
            warm_up: false,
        }
    }
}

impl LookupConfig {
    /// Load and validate configuration from the working directory and process environment
    pub fn from_env() -> LookupResult<Self> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the working directory
    ///
    /// `ENVIRONMENT` selects the environment-specific file and overrides the
    /// `environment` key.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("ENVIRONMENT").ok();
        Self::load_from(Path::new("."), environment.as_deref())
    }

    /// Load configuration files from `dir`
    pub fn load_from(dir: &Path, environment: Option<&str>) -> Result<Self, ConfigError> {
        let environment = environment.map(str::to_lowercase);
        let file_environment = environment.as_deref().unwrap_or("development");

        let mut config_builder = Config::builder()
            // Start with default values
            .set_default("environment", "development")?
            .set_default("populate_defaults", false)?
            .set_default("warm_up", false)?
            .add_source(File::from(dir.join(format!("{CONFIG_FILE_STEM}.json"))).required(false))
            .add_source(
                File::from(dir.join(format!("{CONFIG_FILE_STEM}.{file_environment}.json")))
                    .required(false),
            )
            .add_source(
                ConfigEnv::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(token) = std::env::var(TOKEN_VAR) {
            config_builder = config_builder.set_default("loader.auth_token", token)?;
        }

        if let Some(environment) = environment {
            config_builder = config_builder.set_override("environment", environment)?;
        }

        config_builder.build()?.try_deserialize()
    }

    /// Validate nested settings
    pub fn validate(&self) -> LookupResult<()> {
        self.loader.validate()?;
        self.classifier.validate()?;
        Ok(())
    }

    /// Create configuration for tests: one load attempt, no retry delay
    pub fn for_testing() -> Self {
        Self {
            environment: Environment::Testing,
            loader: LoaderConfig::default()
                .with_cache_dir(std::env::temp_dir().join("fraud_lookup_test_cache"))
                .with_max_attempts(1)
                .with_retry_delay_seconds(0)
                .with_download_retries(0),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults() {
        let config = LookupConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.populate_defaults);
        assert!(!config.warm_up);
        assert!(config.headings_file.is_none());
        assert!(config.classifier.lazy_load);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_display() {
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Testing.to_string(), "testing");
    }

    #[test]
    fn missing_files_yield_defaults() {
        let dir = TempDir::new().unwrap();
        let config = LookupConfig::load_from(dir.path(), None).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.populate_defaults);
        assert_eq!(config.loader.max_attempts, LoaderConfig::default().max_attempts);
    }

    #[test]
    fn environment_file_overrides_base_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("fraud-lookup.json"),
            r#"{
                "populate_defaults": true,
                "warm_up": false,
                "loader": {"remote_repo_id": "acme/sms-model", "max_attempts": 5}
            }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("fraud-lookup.testing.json"),
            r#"{"warm_up": true, "classifier": {"lazy_load": false}}"#,
        )
        .unwrap();

        let config = LookupConfig::load_from(dir.path(), Some("Testing")).unwrap();
        assert_eq!(config.environment, Environment::Testing);
        assert!(config.populate_defaults);
        assert!(config.warm_up);
        assert!(!config.classifier.lazy_load);
        assert_eq!(config.loader.remote_repo_id, "acme/sms-model");
        assert_eq!(config.loader.max_attempts, 5);
        assert_eq!(
            config.loader.artifact_filename,
            LoaderConfig::default().artifact_filename
        );
    }

    #[test]
    fn invalid_nested_settings_are_rejected() {
        let mut config = LookupConfig::for_testing();
        config.loader.max_attempts = 0;
        assert!(config.validate().unwrap_err().is_config_error());

        let mut config = LookupConfig::for_testing();
        config.classifier.default_confidence = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn testing_profile() {
        let config = LookupConfig::for_testing();
        assert_eq!(config.environment, Environment::Testing);
        assert_eq!(config.loader.max_attempts, 1);
        assert_eq!(config.loader.retry_delay_seconds, 0);
        assert!(config.validate().is_ok());
    }
}
