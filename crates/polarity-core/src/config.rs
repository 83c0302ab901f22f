//! Configuration System
//!
//! Runtime parameters plus population setup, loadable from a TOML file.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "polarity.toml";

/// Resource: parameters adjustable while the simulation runs.
///
/// Values are not range-checked; out-of-range settings flow straight into the
/// force and metric formulas.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Strength of repulsion between agents on opposite extremes, 0..1
    pub affective_polarization: f64,
    /// Scales the per-step chance of an opportunistic party jump, 0..1
    pub party_opportunism: f64,
    /// Width of the uniform velocity noise
    pub noise: f64,
    /// Per-step probability of a media shock, 0..1
    pub media_frequency: f64,
    /// Multiplier on every radicalization-weighted force
    pub radicalization_scale: f64,
    /// Steps executed per external frame
    pub simulation_speed: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            affective_polarization: 0.5,
            party_opportunism: 0.3,
            noise: 0.005,
            media_frequency: 0.005,
            radicalization_scale: 1.0,
            simulation_speed: 1,
        }
    }
}

/// Population setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of agents created at (re)initialization
    pub size: usize,
    /// Random friendship draws per agent
    pub friends_per_agent: usize,
    /// Optional JSON file of `{ideology, y}` records
    pub seed_data: Option<PathBuf>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 600,
            friends_per_agent: 5,
            seed_data: None,
        }
    }
}

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub params: SimParams,
    pub population: PopulationConfig,
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a path, or use defaults if it cannot be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Could not load {}: {}. Using defaults.", path.display(), e);
            Self::default()
        })
    }

    /// Returns this configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
