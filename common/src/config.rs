use crate::constants::*;
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunables consumed by the pure grid clusterer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Zoom below which every restaurant becomes its own pin.
    pub individual_pin_threshold: f64,
    /// Cap on singleton pins in individual-pin mode.
    pub max_individual_pins: usize,
    /// Cell size as a fraction of the zoom level.
    pub clustering_factor: f64,
    /// Smallest allowed cell size, in degrees.
    pub min_grid_size: f64,
    /// Zoom above which lone grid cells are hidden.
    pub singleton_filter_threshold: f64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            individual_pin_threshold: INDIVIDUAL_PIN_THRESHOLD,
            max_individual_pins: MAX_INDIVIDUAL_PINS,
            clustering_factor: CLUSTERING_FACTOR,
            min_grid_size: MIN_GRID_SIZE,
            singleton_filter_threshold: SINGLETON_FILTER_THRESHOLD,
        }
    }
}

/// Full engine configuration. Durations are expressed in milliseconds so the
/// JSON form stays flat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub clustering: ClusteringConfig,
    pub debounce_delay_ms: u64,
    pub similarity_tolerance: f64,
    pub cache_ttl_ms: u64,
    pub max_cache_size: usize,
    pub cache_purge_interval_ms: u64,
    pub transition_settle_ms: u64,
    pub verbose_logging: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clustering: ClusteringConfig::default(),
            debounce_delay_ms: DEBOUNCE_DELAY.as_millis() as u64,
            similarity_tolerance: SIMILARITY_TOLERANCE,
            cache_ttl_ms: CACHE_TTL.as_millis() as u64,
            max_cache_size: MAX_CACHE_SIZE,
            cache_purge_interval_ms: CACHE_PURGE_INTERVAL.as_millis() as u64,
            transition_settle_ms: TRANSITION_SETTLE.as_millis() as u64,
            verbose_logging: false,
        }
    }
}

impl EngineConfig {
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn cache_purge_interval(&self) -> Duration {
        Duration::from_millis(self.cache_purge_interval_ms)
    }

    pub fn transition_settle(&self) -> Duration {
        Duration::from_millis(self.transition_settle_ms)
    }

    /// Parses and validates a configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        let clustering = &self.clustering;
        let positive = [
            ("individual_pin_threshold", clustering.individual_pin_threshold),
            ("clustering_factor", clustering.clustering_factor),
            ("min_grid_size", clustering.min_grid_size),
            ("singleton_filter_threshold", clustering.singleton_filter_threshold),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !self.similarity_tolerance.is_finite() || self.similarity_tolerance < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "similarity_tolerance must be non-negative, got {}",
                self.similarity_tolerance
            )));
        }
        if self.max_cache_size == 0 {
            return Err(EngineError::InvalidConfig(
                "max_cache_size must be at least 1".to_string(),
            ));
        }
        if self.cache_purge_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "cache_purge_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
