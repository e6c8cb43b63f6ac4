//! Configuration loading for the matching engine
//!
//! JSON files covering:
//! - Matching thread settings
//! - Trade sequence numbering
//! - Log output format
//! - Seed orders placed before any live flow

use chrono::{DateTime, Utc};
use limitbook_core::{Order, Price, Quantity};
use limitbook_matching::{MatchingCore, parse_side};
use limitbook_ports::{MatchEventSink, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::matching_service::ServiceConfig;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "LIMITBOOK_CONFIG";

/// Root configuration for the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the matching command queue
    #[serde(default = "default_command_buffer_size")]
    pub command_buffer_size: usize,

    /// Name of the matching thread
    #[serde(default = "default_thread_name")]
    pub thread_name: String,

    /// Sequence number of the first trade
    #[serde(default = "default_starting_sequence")]
    pub starting_sequence: u64,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Orders submitted at startup, in order
    #[serde(default)]
    pub seed_orders: Vec<SeedOrderConfig>,
}

fn default_command_buffer_size() -> usize {
    10_000
}

fn default_thread_name() -> String {
    "limitbook-matcher".to_string()
}

fn default_starting_sequence() -> u64 {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: default_command_buffer_size(),
            thread_name: default_thread_name(),
            starting_sequence: default_starting_sequence(),
            log_format: LogFormat::default(),
            seed_orders: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the file named by `LIMITBOOK_CONFIG`, or defaults if unset
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_buffer_size == 0 {
            return Err(ConfigError::Invalid(
                "command_buffer_size must be at least 1".to_string(),
            ));
        }
        if self.thread_name.trim().is_empty() {
            return Err(ConfigError::Invalid("thread_name must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            thread_name: self.thread_name.clone(),
            command_buffer_size: self.command_buffer_size,
        }
    }

    /// Empty book numbered per this config
    pub fn build_core(&self, sink: Arc<dyn MatchEventSink>) -> MatchingCore {
        MatchingCore::with_sink(sink).with_starting_trade_sequence(self.starting_sequence)
    }

    /// Seed orders as domain orders; those without a timestamp get `now`
    pub fn seed(&self, now: DateTime<Utc>) -> Result<Vec<Order>, ConfigError> {
        self.seed_orders
            .iter()
            .map(|seed| seed.to_order(now).map_err(ConfigError::InvalidSeedOrder))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Order placed when the engine starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedOrderConfig {
    pub id: String,
    /// "BUY" or "SELL", any case
    pub side: String,
    pub price: i64,
    pub quantity: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SeedOrderConfig {
    pub fn to_order(&self, now: DateTime<Utc>) -> Result<Order, ValidationError> {
        let side = parse_side(&self.side)?;
        Ok(Order::new(
            self.id.as_str(),
            side,
            Price::new(self.price),
            Quantity::new(self.quantity),
            self.created_at.unwrap_or(now),
        ))
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid seed order: {0}")]
    InvalidSeedOrder(ValidationError),
}
