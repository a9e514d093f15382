//! Asteroid Storm - planet, moon and asteroid orbital toy
//!
//! A headless simulation of a planet with one moon in a circular orbit and a
//! steady stream of asteroids spawned around them. Bodies attract each other
//! with Newtonian gravity; touching bodies collide elastically and the
//! lighter one is destroyed.
//!
//! Add [`SimulationPlugin`] to a Bevy app (with at least `MinimalPlugins`) and
//! the fixed-step simulation runs in `FixedUpdate`.

pub mod asteroid;
pub mod collision;
pub mod config;
pub mod destruction;
pub mod error;
pub mod orbit;
pub mod physics;
pub mod time;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use bevy::prelude::*;

use asteroid::AsteroidPlugin;
use collision::CollisionPlugin;
use config::SimulationConfig;
use destruction::DestructionPlugin;
use error::ConfigError;
use orbit::OrbitPlugin;
use physics::PhysicsPlugin;
use time::{ClockPlugin, SimulationClock};

/// Top-level plugin: registers every stage and creates the initial bodies.
#[derive(Default)]
pub struct SimulationPlugin {
    config: SimulationConfig,
}

impl SimulationPlugin {
    /// Create the plugin from a validated configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let dt = self.config.fixed_dt;

        // Resources first so the sub-plugins' init_resource calls keep them
        app.insert_resource(self.config.clone())
            .insert_resource(SimulationClock::with_dt(dt))
            .insert_resource(Time::<Fixed>::from_seconds(dt))
            .add_plugins((
                ClockPlugin,
                PhysicsPlugin,
                CollisionPlugin,
                DestructionPlugin,
                AsteroidPlugin,
                OrbitPlugin,
            ));

        orbit::initialize(app.world_mut(), &self.config);
    }
}
