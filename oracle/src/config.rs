//! Oracle deployment configuration.
//!
//! Loaded from TOML. One config describes one deployment scope: the ledger
//! the oracle answers for and the single identity allowed to mark
//! completions there.

use crate::ConfigError;
use fitstake_types::{Identity, VerificationParams};
use fitstake_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Deployment scope, e.g. the challenge contract address.
    #[serde(default = "default_scope")]
    pub scope: String,

    /// The only caller allowed to mark completions. Compared case-insensitively.
    #[serde(default)]
    pub oracle_identity: String,

    #[serde(default)]
    pub log_format: LogFormat,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub verification: VerificationParams,
}

fn default_scope() -> String {
    "local".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl OracleConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The configured oracle identity, parsed.
    pub fn oracle(&self) -> Result<Identity, ConfigError> {
        if self.oracle_identity.trim().is_empty() {
            return Err(ConfigError::Invalid("oracle_identity must be set".into()));
        }
        Ok(Identity::parse(self.oracle_identity.as_str())?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scope.trim().is_empty() {
            return Err(ConfigError::Invalid("scope must not be empty".into()));
        }
        self.oracle()?;
        self.verification.validate()?;
        Ok(())
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            scope: default_scope(),
            oracle_identity: String::new(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            verification: VerificationParams::default(),
        }
    }
}
