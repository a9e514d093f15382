//! Asteroid Storm - headless runner
//!
//! Runs the simulation for a fixed span of simulated time and logs a summary.
//!
//! Usage: `asteroid-storm [config.toml] [seconds]`

use std::process::ExitCode;
use std::time::Duration;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use asteroid_storm::SimulationPlugin;
use asteroid_storm::asteroid::AsteroidCounter;
use asteroid_storm::collision::CollisionStats;
use asteroid_storm::config::SimulationConfig;
use asteroid_storm::destruction::DestructionStats;
use asteroid_storm::orbit::OrbitingSystem;
use asteroid_storm::time::SimulationClock;

const DEFAULT_SECONDS: f64 = 120.0;

fn main() -> ExitCode {
    let mut config_path = None;
    let mut seconds = DEFAULT_SECONDS;
    for arg in std::env::args().skip(1) {
        match arg.parse::<f64>() {
            Ok(value) if value.is_finite() && value >= 0.0 => seconds = value,
            _ => config_path = Some(arg),
        }
    }

    let mut app = App::new();
    // Logging is installed when LogPlugin is built, so config errors below are logged
    app.add_plugins((MinimalPlugins, LogPlugin::default()));

    let config = match config_path {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                error!("Failed to load {}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };

    let plugin = match SimulationPlugin::new(config) {
        Ok(plugin) => plugin,
        Err(err) => {
            error!("Invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // One fixed tick per update regardless of wall-clock pacing
    let dt = plugin.config().fixed_dt;
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(dt)))
        .add_plugins(plugin);
    app.finish();
    app.cleanup();

    info!("Simulating {:.1}s with dt {}", seconds, dt);
    while app.world().resource::<SimulationClock>().elapsed < seconds {
        app.update();
    }

    report(app.world());
    ExitCode::SUCCESS
}

fn report(world: &World) {
    let clock = world.resource::<SimulationClock>();
    let system = world.resource::<OrbitingSystem>();
    let spawned = world.resource::<AsteroidCounter>();
    let destruction = world.resource::<DestructionStats>();
    let collisions = world.resource::<CollisionStats>();

    info!(
        "Finished after {} ticks ({:.2}s simulated)",
        clock.ticks, clock.elapsed
    );
    info!(
        "Asteroids: {} spawned, {} live, {} culled",
        spawned.0,
        system.asteroid_count(),
        destruction.culled
    );
    info!(
        "Collisions: {} resolved, {} bodies destroyed, {} reclaimed",
        collisions.resolved, destruction.destroyed, destruction.reclaimed
    );
    info!(
        "Moon: {}",
        if system.moon.is_some() {
            "still orbiting"
        } else {
            "destroyed"
        }
    );
}
