//! Engine configuration, deserialized from TOML. Every field has a default so an empty document
//! is a valid configuration.
//!
//! ```toml
//! seed = 7
//!
//! [hill_climbing]
//! restarts = 10
//!
//! [annealing]
//! max_iterations = 500
//! initial_temperature = 100.0
//! cooling_rate = 0.99
//!
//! [agent]
//! max_consecutive_replans = 5
//! max_steps = 10000
//!
//! [[obstacles]]
//! time = 2
//! cells = [[2, 2]]
//! ```
use crate::coord::Coord;
use crate::error::ConfigError;
use crate::grid_model::ObstacleSchedule;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HillClimbingConfig {
    /// Independent greedy attempts; the shortest successful one is kept.
    pub restarts: usize,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self { restarts: 10 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnealingConfig {
    pub max_iterations: usize,
    pub initial_temperature: f64,
    /// Multiplied into the temperature once per iteration
    pub cooling_rate: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            initial_temperature: 100.0,
            cooling_rate: 0.99,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Replans allowed in a row without an executed move in between.
    pub max_consecutive_replans: usize,
    /// Time steps allowed for the whole delivery.
    pub max_steps: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_consecutive_replans: 5,
            max_steps: 10_000,
        }
    }
}

/// Cells blocked at a single time step.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduledObstacle {
    pub time: usize,
    pub cells: Vec<[i32; 2]>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub hill_climbing: HillClimbingConfig,
    pub annealing: AnnealingConfig,
    pub agent: AgentConfig,
    /// Seed for [EngineConfig::rng]; entropy is used when absent.
    pub seed: Option<u64>,
    pub obstacles: Vec<ScheduledObstacle>,
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<EngineConfig, ConfigError> {
        let config: EngineConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
        EngineConfig::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hill_climbing.restarts == 0 {
            return Err(ConfigError::Invalid {
                field: "hill_climbing.restarts",
                reason: "must be at least 1".to_owned(),
            });
        }
        let t = self.annealing.initial_temperature;
        if !(t.is_finite() && t > 0.0) {
            return Err(ConfigError::Invalid {
                field: "annealing.initial_temperature",
                reason: format!("must be positive and finite, got {t}"),
            });
        }
        let r = self.annealing.cooling_rate;
        if !(r > 0.0 && r <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "annealing.cooling_rate",
                reason: format!("must lie in (0, 1], got {r}"),
            });
        }
        if self.agent.max_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "agent.max_steps",
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    pub fn obstacle_schedule(&self) -> ObstacleSchedule {
        self.obstacles
            .iter()
            .flat_map(|o| {
                o.cells
                    .iter()
                    .map(move |&[row, col]| (o.time, Coord::new(row, col)))
            })
            .collect()
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
