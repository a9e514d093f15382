//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec3;
use bevy::prelude::*;
use asteroid_storm::SimulationPlugin;
use asteroid_storm::config::SimulationConfig;
use asteroid_storm::orbit::OrbitingSystem;
use asteroid_storm::types::{BodyKind, BodyName, BodyState, CollisionResolver, ForceAccumulator};

/// Default config with a fixed seed and no automatic spawning.
pub fn quiet_config() -> SimulationConfig {
    let mut config = SimulationConfig {
        seed: Some(42),
        ..Default::default()
    };
    config.spawn.max_asteroids = 0;
    config
}

/// Config where gravity is negligible and asteroids fly in straight lines.
pub fn weightless_config() -> SimulationConfig {
    let mut config = quiet_config();
    config.orbit.gravitational_constant = 1e-9;
    config
}

/// Headless app running the full simulation.
pub fn simulation_app(config: SimulationConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(SimulationPlugin::new(config).expect("test config should be valid"));
    app
}

/// Run exactly `n` fixed ticks.
pub fn run_ticks(app: &mut App, n: usize) {
    for _ in 0..n {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

/// Add an asteroid with the given state to the roster.
pub fn add_asteroid(app: &mut App, name: &str, state: BodyState) -> Entity {
    let world = app.world_mut();
    let entity = world
        .spawn((
            BodyKind::Asteroid,
            BodyName(name.to_string()),
            state,
            ForceAccumulator::default(),
            CollisionResolver,
        ))
        .id();
    world.resource_mut::<OrbitingSystem>().push_asteroid(entity);
    entity
}

/// Take every message of type `M` written so far.
///
/// Ticks are driven with `run_schedule`, so message buffers are never swapped
/// and everything written since the last drain is still there.
pub fn drain_messages<M: Message>(app: &mut App) -> Vec<M> {
    app.world_mut().resource_mut::<Messages<M>>().drain().collect()
}

pub fn body(app: &App, entity: Entity) -> BodyState {
    app.world()
        .get::<BodyState>(entity)
        .cloned()
        .expect("body should exist")
}

pub fn system(app: &App) -> OrbitingSystem {
    app.world().resource::<OrbitingSystem>().clone()
}

pub fn at(x: f64, y: f64, z: f64) -> DVec3 {
    DVec3::new(x, y, z)
}
