//! Property-based tests for the physics formulas using proptest.
//!
//! These tests verify physical invariants across a wide range of masses,
//! positions and velocities.

use bevy::math::DVec3;
use proptest::prelude::*;

use crate::asteroid::{perturb_direction, AsteroidFactory};
use crate::collision::elastic_collision;
use crate::config::SpawnConfig;
use crate::test_utils::assertions;
use crate::types::BodyState;

use super::{gravity_force, integrate_step, orbit_tangent};

fn vec3(range: std::ops::Range<f64>) -> impl Strategy<Value = DVec3> {
    (range.clone(), range.clone(), range).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Gravity follows the inverse-square law and points at the attractor.
    #[test]
    fn prop_gravity_inverse_square(
        g in 1.0f64..1e5,
        m1 in 1e-3f64..100.0,
        m2 in 1e-3f64..100.0,
        attractor in vec3(-500.0..500.0),
        offset in vec3(-500.0..500.0),
    ) {
        prop_assume!(offset.length() > 1e-3);
        let body = attractor + offset;

        let force = gravity_force(g, attractor, m1, body, m2);
        let r = offset.length();
        let expected = g * m1 * m2 / (r * r);

        prop_assert!(
            ((force.length() - expected) / expected).abs() < 1e-9,
            "magnitude {} != {}", force.length(), expected
        );
        prop_assert!(force.normalize().dot(-offset.normalize()) > 1.0 - 1e-9);
    }

    /// Forces between two bodies are equal and opposite.
    #[test]
    fn prop_gravity_is_symmetric(
        m1 in 1e-3f64..100.0,
        m2 in 1e-3f64..100.0,
        a in vec3(-500.0..500.0),
        b in vec3(-500.0..500.0),
    ) {
        let on_b = gravity_force(10000.0, a, m1, b, m2);
        let on_a = gravity_force(10000.0, b, m2, a, m1);

        assertions::assert_vec_close(on_a, -on_b, 1e-9 * (1.0 + on_b.length()));
    }

    /// Elastic collisions conserve momentum and kinetic energy.
    #[test]
    fn prop_elastic_collision_conserves(
        m1 in 1e-3f64..100.0,
        m2 in 1e-3f64..100.0,
        u1 in vec3(-50.0..50.0),
        u2 in vec3(-50.0..50.0),
    ) {
        let (v1, v2) = elastic_collision(m1, u1, m2, u2);

        let before = u1 * m1 + u2 * m2;
        let after = v1 * m1 + v2 * m2;
        assertions::assert_vec_close(after, before, 1e-9 * (1.0 + before.length()));

        let e_before = assertions::kinetic_energy(&[(m1, u1), (m2, u2)]);
        let e_after = assertions::kinetic_energy(&[(m1, v1), (m2, v2)]);
        prop_assert!((e_after - e_before).abs() <= 1e-9 * (1.0 + e_before));
    }

    /// Equal masses swap velocities.
    #[test]
    fn prop_equal_masses_swap(
        m in 1e-3f64..100.0,
        u1 in vec3(-50.0..50.0),
        u2 in vec3(-50.0..50.0),
    ) {
        let (v1, v2) = elastic_collision(m, u1, m, u2);

        assertions::assert_vec_close(v1, u2, 1e-12);
        assertions::assert_vec_close(v2, u1, 1e-12);
    }

    /// The orbit tangent is a unit vector perpendicular to the radius.
    #[test]
    fn prop_orbit_tangent_is_perpendicular(
        offset in vec3(-500.0..500.0),
        clockwise in any::<bool>(),
    ) {
        prop_assume!(offset.length() > 1e-3);
        let sign = if clockwise { -1.0 } else { 1.0 };

        let tangent = orbit_tangent(DVec3::ZERO, offset, sign);

        prop_assert!((tangent.length() - 1.0).abs() < 1e-9);
        prop_assert!(tangent.dot(offset.normalize()).abs() < 1e-9);
    }

    /// With no force the integrator moves a body in a straight line.
    #[test]
    fn prop_free_motion_is_linear(
        position in vec3(-100.0..100.0),
        velocity in vec3(-50.0..50.0),
        steps in 1usize..200,
    ) {
        let dt = 0.02;
        let mut state = BodyState::new(position, velocity, 1.0, 1.0);

        for _ in 0..steps {
            integrate_step(&mut state, DVec3::ZERO, dt);
        }

        assertions::assert_vec_close(state.velocity, velocity, 1e-12);
        assertions::assert_vec_close(
            state.position,
            position + velocity * (dt * steps as f64),
            1e-9,
        );
    }

    /// Random asteroids always spawn inside the shell around the moon's orbit,
    /// including a moon sitting on the planet.
    #[test]
    fn prop_asteroids_spawn_inside_shell(
        seed in any::<u64>(),
        moon_distance in prop_oneof![Just(0.0f64), 0.0f64..500.0],
    ) {
        let config = SpawnConfig::default();
        let moon = DVec3::new(moon_distance, 0.0, 0.0);
        let mut factory = AsteroidFactory::new(seed, moon);

        let spec = factory.create_asteroid(&config, DVec3::ZERO, Some(moon));
        let r = spec.position.length();
        let inner = moon_distance + config.shell_margin;

        prop_assert!(r >= inner - 1e-9 && r <= inner + config.shell_band + 1e-9);
        prop_assert!(spec.mass > 0.0);
    }

    /// Perturbing a direction never changes its length.
    #[test]
    fn prop_perturbation_preserves_length(
        direction in vec3(-1.0..1.0),
        x in -180.0f64..180.0,
        y in -180.0f64..180.0,
        z in -180.0f64..180.0,
    ) {
        let rotated = perturb_direction(direction, [x, y, z]);
        prop_assert!((rotated.length() - direction.length()).abs() < 1e-9);
    }
}
