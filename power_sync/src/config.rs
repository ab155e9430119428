//! TOML configuration for `psr-sync`.
//!
//! Every section is optional. The database URL is never read from the file;
//! it comes from `POSTGRES_CONNECTION_STRING`.

use std::{path::{Path, PathBuf}, time::Duration};

use generation_ingestor::providers::elexon_rest::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use secrecy::SecretString;
use serde::Deserialize;
use shared_utils::{
    config::{ConfigError, load_toml_path, load_toml_str},
    env::get_env_var,
};

use crate::{
    quality::{DEFAULT_MAX_QUANTITY, DEFAULT_PSR_TYPES, QualityRules},
    runner::RetryPolicy,
    transform::DEFAULT_SOURCE_TAG,
};

/// Environment variable holding the destination database URL.
pub const DATABASE_URL_VAR: &str = "POSTGRES_CONNECTION_STRING";

/// Every half hour, on the hour and the half.
pub const DEFAULT_CRON: &str = "0 */30 * * * *";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub source: SourceConfig,
    pub quality: QualityConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// First component of every curve name.
    pub source_tag: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            source_tag: DEFAULT_SOURCE_TAG.to_string(),
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    pub max_quantity: f64,
    pub psr_types: Vec<String>,
    /// Where JSON quality reports go. No reports when unset.
    pub report_dir: Option<PathBuf>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            max_quantity: DEFAULT_MAX_QUANTITY,
            psr_types: DEFAULT_PSR_TYPES.iter().map(|s| s.to_string()).collect(),
            report_dir: None,
        }
    }
}

impl QualityConfig {
    pub fn rules(&self) -> QualityRules {
        QualityRules {
            max_quantity: self.max_quantity,
            psr_types: self.psr_types.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Six-field cron expression (seconds first).
    pub cron: String,
    pub retries: u32,
    pub retry_delay_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            cron: DEFAULT_CRON.to_string(),
            retries: policy.retries,
            retry_delay_secs: policy.retry_delay.as_secs(),
        }
    }
}

impl ScheduleConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

impl SyncConfig {
    /// Loads `path`, or the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let cfg: Self = match path {
            Some(p) => load_toml_path(p)?,
            None => Self::default(),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = load_toml_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(key: &str, message: &str) -> ConfigError {
            ConfigError::Invalid {
                key: key.to_string(),
                message: message.to_string(),
            }
        }

        if self.source.timeout_secs == 0 {
            return Err(invalid("source.timeout_secs", "must be greater than zero"));
        }
        if self.source.source_tag.trim().is_empty() {
            return Err(invalid("source.source_tag", "must not be empty"));
        }
        if !(self.quality.max_quantity.is_finite() && self.quality.max_quantity > 0.0) {
            return Err(invalid("quality.max_quantity", "must be a positive number"));
        }
        if self.quality.psr_types.is_empty() {
            return Err(invalid("quality.psr_types", "must list at least one psrType"));
        }
        if self.schedule.cron.trim().is_empty() {
            return Err(invalid("schedule.cron", "must not be empty"));
        }
        Ok(())
    }
}

/// Reads the destination URL from the environment.
pub fn database_url() -> Result<SecretString, ConfigError> {
    Ok(SecretString::new(get_env_var(DATABASE_URL_VAR)?.into()))
}
