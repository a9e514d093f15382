//! Designer-tunable configuration for the orbiting system and asteroid storm.
//!
//! Every field has a compiled default, and all structs use `#[serde(default)]`
//! so a TOML file only needs the values it wants to override:
//!
//! ```toml
//! seed = 7
//!
//! [orbit]
//! distance = 250.0
//!
//! [spawn]
//! delay = 5.0
//! max_asteroids = 10
//! ```
//!
//! Configs are validated before use. Changing a running simulation goes
//! through [`crate::orbit::reconfigure`], never through direct mutation.

use std::path::Path;

use bevy::math::DVec3;
use bevy::prelude::*;
use serde::Deserialize;

use crate::error::ConfigError;

/// Largest allowed per-axis aim deviation, in degrees.
pub const MAX_DEGREE_VARIATION: f64 = 180.0;

/// Handedness of the moon's orbit, seen from +Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrbitDirection {
    #[default]
    CounterClockwise,
    Clockwise,
}

impl OrbitDirection {
    /// Sign applied to the orbit tangent
    pub fn sign(&self) -> f64 {
        match self {
            OrbitDirection::CounterClockwise => 1.0,
            OrbitDirection::Clockwise => -1.0,
        }
    }
}

/// Planet, moon and world parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    /// Gravitational constant (scaled up for a toy system; the real value is 6.674e-11)
    pub gravitational_constant: f64,
    pub planet_mass: f64,
    pub planet_size: f64,
    pub planet_position: [f64; 3],
    pub moon_mass: f64,
    pub moon_size: f64,
    /// Whether the moon exists at start
    pub spawn_moon: bool,
    /// Planet to moon separation
    pub distance: f64,
    /// Asteroids farther than this from the planet are removed
    pub render_distance: f64,
    /// Whether collision destruction emits a particle burst
    pub explosions: bool,
    pub orbit_direction: OrbitDirection,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: 10000.0,
            planet_mass: 5.972,
            planet_size: 12.742,
            planet_position: [0.0, 0.0, 0.0],
            moon_mass: 0.007347,
            moon_size: 3.4748,
            spawn_moon: true,
            distance: 191.25,
            render_distance: 400.0,
            explosions: true,
            orbit_direction: OrbitDirection::CounterClockwise,
        }
    }
}

impl OrbitConfig {
    pub fn planet_position(&self) -> DVec3 {
        DVec3::from_array(self.planet_position)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("orbit.gravitational_constant", self.gravitational_constant)?;
        positive("orbit.planet_mass", self.planet_mass)?;
        positive("orbit.planet_size", self.planet_size)?;
        finite_vec("orbit.planet_position", self.planet_position)?;
        positive("orbit.moon_mass", self.moon_mass)?;
        positive("orbit.moon_size", self.moon_size)?;
        positive("orbit.distance", self.distance)?;
        positive("orbit.render_distance", self.render_distance)?;
        Ok(())
    }
}

/// Asteroid factory parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    // Fixed asteroid, used when `randomize` is off
    pub size: f64,
    pub mass: f64,
    pub position: [f64; 3],
    /// Velocity vector of the fixed asteroid
    pub direction: [f64; 3],

    /// Seconds between spawns
    pub delay: f64,
    /// Upper bound on live asteroids
    pub max_asteroids: usize,

    pub randomize: bool,
    pub min_size: f64,
    pub max_size: f64,
    pub min_velocity: f64,
    pub max_velocity: f64,
    /// Mass of an asteroid of size 1
    pub size_mass_ratio: f64,
    /// Maximum deviation (degrees) from the planet-facing direction, per axis
    pub max_degree_variation: f64,
    /// Gap between the moon's orbit and the spawn shell
    pub shell_margin: f64,
    /// Thickness of the spawn shell
    pub shell_band: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            size: 1.0,
            mass: 1.0,
            position: [0.0, 0.0, 100.0],
            direction: [-40.0, 0.0, -40.0],
            delay: 15.0,
            max_asteroids: 40,
            randomize: true,
            min_size: 0.000001,
            max_size: 1.0,
            min_velocity: 1.0,
            max_velocity: 50.0,
            size_mass_ratio: 0.01759,
            max_degree_variation: 45.0,
            shell_margin: 50.0,
            shell_band: 200.0,
        }
    }
}

impl SpawnConfig {
    pub fn position(&self) -> DVec3 {
        DVec3::from_array(self.position)
    }

    pub fn direction(&self) -> DVec3 {
        DVec3::from_array(self.direction)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("spawn.size", self.size)?;
        positive("spawn.mass", self.mass)?;
        finite_vec("spawn.position", self.position)?;
        finite_vec("spawn.direction", self.direction)?;
        non_negative("spawn.delay", self.delay)?;

        positive("spawn.min_size", self.min_size)?;
        ordered("spawn.size", self.min_size, self.max_size)?;
        non_negative("spawn.min_velocity", self.min_velocity)?;
        ordered("spawn.velocity", self.min_velocity, self.max_velocity)?;
        positive("spawn.size_mass_ratio", self.size_mass_ratio)?;
        non_negative("spawn.max_degree_variation", self.max_degree_variation)?;
        at_most(
            "spawn.max_degree_variation",
            self.max_degree_variation,
            MAX_DEGREE_VARIATION,
        )?;
        non_negative("spawn.shell_margin", self.shell_margin)?;
        positive("spawn.shell_band", self.shell_band)?;
        Ok(())
    }
}

/// Complete simulation configuration.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed timestep in seconds
    pub fixed_dt: f64,
    /// Seed for asteroid generation; `None` draws one from the OS
    pub seed: Option<u64>,
    /// Seconds a destroyed body lingers before it is reclaimed
    pub reclaim_delay: f64,
    pub orbit: OrbitConfig,
    pub spawn: SpawnConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 0.02,
            seed: None,
            reclaim_delay: 20.0,
            orbit: OrbitConfig::default(),
            spawn: SpawnConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("fixed_dt", self.fixed_dt)?;
        non_negative("reclaim_delay", self.reclaim_delay)?;
        self.orbit.validate()?;
        self.spawn.validate()?;
        // Outer edge of the spawn shell when the moon is at its configured distance
        finite(
            "spawn.shell_band",
            self.orbit.distance + self.spawn.shell_margin + self.spawn.shell_band,
        )
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn finite_vec(field: &'static str, value: [f64; 3]) -> Result<(), ConfigError> {
    value.into_iter().try_for_each(|v| finite(field, v))
}

fn at_most(field: &'static str, value: f64, max: f64) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::AboveMaximum { field, value, max })
    }
}

fn ordered(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    finite(field, max)?;
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    // Sampling needs a finite range width
    finite(field, max - min)
}
