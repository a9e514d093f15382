//! Test utilities for the orbiting system.
//!
//! Provides fixtures for configs and bodies, assertions for physical
//! invariants, and helpers for driving a headless app tick by tick.

use bevy::math::DVec3;

use crate::config::SimulationConfig;
use crate::types::BodyState;

/// Fixtures for creating test configs and bodies.
pub mod fixtures {
    use super::*;

    /// Default config with a fixed seed and no automatic spawning.
    pub fn quiet_config() -> SimulationConfig {
        let mut config = SimulationConfig {
            seed: Some(42),
            ..Default::default()
        };
        config.spawn.max_asteroids = 0;
        config
    }

    /// Body at rest.
    pub fn resting_body(position: DVec3, mass: f64, scale: f64) -> BodyState {
        BodyState::new(position, DVec3::ZERO, mass, scale)
    }
}

/// Assertions for verifying physical invariants.
pub mod assertions {
    use super::*;

    /// Total linear momentum of a set of bodies.
    pub fn total_momentum<'a>(bodies: impl IntoIterator<Item = &'a BodyState>) -> DVec3 {
        bodies.into_iter().map(BodyState::momentum).sum()
    }

    /// Total kinetic energy of `(mass, velocity)` pairs.
    pub fn kinetic_energy(bodies: &[(f64, DVec3)]) -> f64 {
        bodies
            .iter()
            .map(|(m, v)| 0.5 * m * v.length_squared())
            .sum()
    }

    /// Assert two vectors agree component-wise within `tolerance`.
    ///
    /// # Panics
    /// Panics if any component differs by more than the tolerance.
    pub fn assert_vec_close(actual: DVec3, expected: DVec3, tolerance: f64) {
        let diff = (actual - expected).abs().max_element();
        assert!(
            diff <= tolerance,
            "vectors differ: actual={actual:?}, expected={expected:?}, diff={diff:.3e}, tolerance={tolerance:.3e}"
        );
    }
}

/// Helpers for headless Bevy apps.
pub mod bevy_test {
    use bevy::prelude::*;

    use crate::config::SimulationConfig;
    use crate::SimulationPlugin;

    /// App with `MinimalPlugins` and nothing else.
    pub fn headless_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app
    }

    /// Headless app running the full simulation with `config`.
    pub fn simulation_app(config: SimulationConfig) -> App {
        let mut app = headless_app();
        let plugin = SimulationPlugin::new(config).expect("test config should be valid");
        app.add_plugins(plugin);
        app
    }

    /// Run exactly `n` fixed ticks, independent of wall-clock time.
    pub fn run_ticks(app: &mut App, n: usize) {
        for _ in 0..n {
            app.world_mut().run_schedule(FixedUpdate);
        }
    }
}
