//! Engine configuration: JSON-backed settings for the simulation core.
//!
//! Every section and field has a default, so a partial file (or `{}`) loads.
//! The configuration is a plain value handed to whoever needs it; nothing is
//! stored globally.
//!
//! # Layout
//! ```json
//! {
//!   "physics": {
//!     "gravity": { "enabled": true, "constant": 6.6743e-11 },
//!     "time": { "fixed_timestep": 0.016666, "max_timestep": 0.1, "time_scale": 1.0 }
//!   },
//!   "simulation": { "max_objects": 1000, "force_strategy": "direct" },
//!   "debug": {
//!     "logging": { "level": "info" },
//!     "profiling": { "enabled": true, "sample_window": 120 }
//!   },
//!   "optimization": { "threading": { "physics_threads": 4 } }
//! }
//! ```

use orrery_kernel::{
    FixedTimestep, GRAVITATIONAL_CONSTANT, Simulator, SimulatorConfig, SimulatorError,
    TimestepError, World,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading, saving or applying a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Simulator(#[from] SimulatorError),
    #[error(transparent)]
    Timestep(#[from] TimestepError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub simulation: SimulationConfig,
    pub debug: DebugConfig,
    pub optimization: OptimizationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: GravityConfig,
    pub time: TimeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    pub enabled: bool,
    pub constant: f64,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            constant: GRAVITATIONAL_CONSTANT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Seconds of simulated time per step.
    pub fixed_timestep: f64,
    /// Longest real frame delta fed to the fixed-step driver.
    pub max_timestep: f64,
    pub time_scale: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 0.016666,
            max_timestep: 0.1,
            time_scale: 1.0,
        }
    }
}

/// Which force accumulation strategy the simulator uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceStrategy {
    #[default]
    Direct,
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub max_objects: usize,
    pub force_strategy: ForceStrategy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_objects: 1000,
            force_strategy: ForceStrategy::Direct,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    pub logging: LoggingConfig,
    pub profiling: ProfilingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilingConfig {
    pub enabled: bool,
    /// Number of samples each timer keeps.
    pub sample_window: usize,
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_window: 120,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    pub threading: ThreadingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadingConfig {
    pub physics_threads: usize,
}

impl Default for ThreadingConfig {
    fn default() -> Self {
        Self { physics_threads: 4 }
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl EngineConfig {
    /// Parse and validate a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        tracing::info!(path = %path.display(), "configuration saved");
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let gravity = &self.physics.gravity;
        if !gravity.constant.is_finite() || gravity.constant < 0.0 {
            return Err(invalid(
                "physics.gravity.constant",
                format!("must be finite and non-negative, got {}", gravity.constant),
            ));
        }

        let time = &self.physics.time;
        if !time.fixed_timestep.is_finite() || time.fixed_timestep <= 0.0 {
            return Err(invalid(
                "physics.time.fixed_timestep",
                format!("must be positive, got {}", time.fixed_timestep),
            ));
        }
        if time.max_timestep.is_nan() || time.max_timestep < time.fixed_timestep {
            return Err(invalid(
                "physics.time.max_timestep",
                format!(
                    "must be at least fixed_timestep ({}), got {}",
                    time.fixed_timestep, time.max_timestep
                ),
            ));
        }
        if !time.time_scale.is_finite() || time.time_scale < 0.0 {
            return Err(invalid(
                "physics.time.time_scale",
                format!("must be finite and non-negative, got {}", time.time_scale),
            ));
        }

        if self.simulation.max_objects == 0 {
            return Err(invalid("simulation.max_objects", "must be at least 1".into()));
        }
        if self.optimization.threading.physics_threads == 0 {
            return Err(invalid(
                "optimization.threading.physics_threads",
                "must be at least 1".into(),
            ));
        }
        if self.debug.profiling.sample_window == 0 {
            return Err(invalid(
                "debug.profiling.sample_window",
                "must be at least 1".into(),
            ));
        }

        let level = self.debug.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(invalid(
                "debug.logging.level",
                format!("unknown level {:?}", self.debug.logging.level),
            ));
        }
        Ok(())
    }

    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            gravitational_constant: self.physics.gravity.constant,
            gravity_enabled: self.physics.gravity.enabled,
        }
    }

    /// Build a simulator with the configured constant and force strategy.
    pub fn build_simulator(&self) -> Result<Simulator, ConfigError> {
        let config = self.simulator_config();
        let simulator = match self.simulation.force_strategy {
            ForceStrategy::Direct => Simulator::new(config),
            ForceStrategy::Parallel => {
                Simulator::parallel(config, self.optimization.threading.physics_threads)?
            }
        };
        tracing::debug!(
            strategy = simulator.strategy_name(),
            g = config.gravitational_constant,
            "simulator built"
        );
        Ok(simulator)
    }

    /// Fixed-step driver for the configured step, frame clamp and scale.
    pub fn timestep(&self) -> Result<FixedTimestep, ConfigError> {
        let time = &self.physics.time;
        Ok(FixedTimestep::new(
            time.fixed_timestep,
            time.max_timestep,
            time.time_scale,
        )?)
    }

    /// Empty world capped at `simulation.max_objects` bodies.
    pub fn new_world(&self) -> World {
        World::with_body_limit(self.simulation.max_objects)
    }

    /// Logging level normalised to lower case.
    pub fn log_level(&self) -> String {
        self.debug.logging.level.to_ascii_lowercase()
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

pub fn crate_info() -> &'static str {
    "orrery-config v0.1.0"
}
