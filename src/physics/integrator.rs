//! Force integration for simulated bodies.
//!
//! Semi-implicit (symplectic) Euler: the accumulated force changes the
//! velocity first, then the new velocity moves the body. Bodies only
//! accelerate through forces added explicitly during the tick; there is no
//! ambient free-fall.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::time::SimulationClock;
use crate::types::{BodyState, Destroyed, ForceAccumulator};

/// Advance one body by `dt` under a constant `force`.
#[inline]
pub fn integrate_step(state: &mut BodyState, force: DVec3, dt: f64) {
    // impulse = F·dt, Δv = impulse / m
    state.velocity += force * (dt / state.mass);
    state.position += state.velocity * dt;
}

/// Integrate every live body and clear its force accumulator.
///
/// Destroyed bodies are frozen in place; their accumulators are still
/// cleared so no stale force survives.
pub fn integrate_bodies(
    mut bodies: Query<(&mut BodyState, &mut ForceAccumulator, Has<Destroyed>)>,
    clock: Res<SimulationClock>,
) {
    for (mut state, mut force, destroyed) in bodies.iter_mut() {
        let force = force.take();
        if destroyed {
            continue;
        }
        integrate_step(&mut state, force, clock.dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_force_moves_linearly() {
        let mut state = BodyState::new(DVec3::ZERO, DVec3::new(2.0, 0.0, -1.0), 3.0, 1.0);

        integrate_step(&mut state, DVec3::ZERO, 0.5);

        assert_eq!(state.velocity, DVec3::new(2.0, 0.0, -1.0));
        assert_eq!(state.position, DVec3::new(1.0, 0.0, -0.5));
    }

    #[test]
    fn test_force_applies_impulse_over_mass() {
        let mut state = BodyState::new(DVec3::ZERO, DVec3::ZERO, 2.0, 1.0);

        integrate_step(&mut state, DVec3::new(4.0, 0.0, 0.0), 0.1);

        // Δv = F·dt/m = 4·0.1/2
        assert_relative_eq!(state.velocity.x, 0.2, epsilon = 1e-12);
        // Position uses the updated velocity
        assert_relative_eq!(state.position.x, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_heavier_body_accelerates_less() {
        let mut light = BodyState::new(DVec3::ZERO, DVec3::ZERO, 1.0, 1.0);
        let mut heavy = BodyState::new(DVec3::ZERO, DVec3::ZERO, 10.0, 1.0);

        integrate_step(&mut light, DVec3::X, 1.0);
        integrate_step(&mut heavy, DVec3::X, 1.0);

        assert_relative_eq!(light.velocity.x, 10.0 * heavy.velocity.x, epsilon = 1e-12);
    }
}
