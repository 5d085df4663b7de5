//! # Configuration Management
//!
//! Handles all configuration for GVP components. Every section has a
//! `Default`, so a TOML file only needs to mention what it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result, ResultExt};
use crate::types::{DistanceMetric, UpdateMode};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| Error::Configuration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(Error::from)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Reject values no component can run with
    pub fn validate(&self) -> Result<()> {
        if self.index.max_top_k == 0 {
            return Err(Error::Configuration {
                message: "index.max_top_k must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Index configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Metric used when a query does not name one
    pub default_metric: DistanceMetric,
    /// Upper bound accepted for a query's `top_k`
    pub max_top_k: usize,
    pub update_mode: UpdateMode,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            default_metric: DistanceMetric::Cosine,
            max_top_k: 10_000,
            update_mode: UpdateMode::ReplaceOrCreate,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
}

/// Log levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
