//! Configuration loading and management.
//!
//! A single JSON file holds runner, simulation and logging settings.
//! Missing file means defaults; a present file must parse.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::application::RunnerConfig;
use crate::domain::MAX_BATCH_SIZE;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Batch runner settings.
    pub batch: BatchConfig,

    /// Simulated fetcher settings.
    pub simulation: SimulationConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Settings for the batch pipeline itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum applications accepted per uploaded batch.
    pub max_batch_size: usize,

    /// Courtesy delay between consecutive fetches in milliseconds.
    pub request_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_batch_size: MAX_BATCH_SIZE,
            request_delay_ms: 0,
        }
    }
}

impl BatchConfig {
    #[must_use]
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            request_delay_ms: self.request_delay_ms,
        }
    }
}

/// Settings for the simulated status fetcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Lower bound of the simulated network delay in milliseconds.
    pub min_delay_ms: u64,

    /// Upper bound of the simulated network delay in milliseconds.
    pub max_delay_ms: u64,

    /// Probability in `[0, 1]` that a fetch fails.
    pub failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 500,
            max_delay_ms: 2500,
            failure_rate: 0.1,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no config file found, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Writes the configuration back out as pretty-printed JSON.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let raw = serde_json::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, raw)
            .await
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("config.json")).await.unwrap();
        assert_eq!(config.batch.max_batch_size, MAX_BATCH_SIZE);
        assert_eq!(config.logging.level, "info");
    }

    #[tokio::test]
    async fn save_and_reload_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.batch.request_delay_ms = 750;
        config.simulation.failure_rate = 0.25;
        config.save(&path).await.unwrap();

        let reloaded = AppConfig::load(&path).await.unwrap();
        assert_eq!(reloaded.batch.request_delay_ms, 750);
        assert!((reloaded.simulation.failure_rate - 0.25).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        tokio::fs::write(&path, r#"{"batch":{"request_delay_ms":100}}"#)
            .await
            .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.batch.request_delay_ms, 100);
        assert_eq!(config.batch.max_batch_size, MAX_BATCH_SIZE);
        assert_eq!(config.simulation.min_delay_ms, 500);
    }
}
