//! Gravity and circular-orbit formulas.
//!
//! All functions are pure so they can be exercised without a Bevy world.

use bevy::math::DVec3;

use crate::types::MIN_GRAVITY_SEPARATION;

/// Compute the gravitational force that `attractor` exerts on `body`.
///
/// F = g · (m_a · m_b) / r², directed from the body toward the attractor.
///
/// # Arguments
/// * `g` - Gravitational constant
/// * `attractor_pos` / `attractor_mass` - The pulling body
/// * `body_pos` / `body_mass` - The body being pulled
///
/// # Returns
/// Force vector acting on `body`. Zero when the separation is below
/// [`MIN_GRAVITY_SEPARATION`].
#[inline]
pub fn gravity_force(
    g: f64,
    attractor_pos: DVec3,
    attractor_mass: f64,
    body_pos: DVec3,
    body_mass: f64,
) -> DVec3 {
    let delta = attractor_pos - body_pos;
    let r_squared = delta.length_squared();

    if r_squared <= MIN_GRAVITY_SEPARATION * MIN_GRAVITY_SEPARATION {
        return DVec3::ZERO;
    }

    let r = r_squared.sqrt();
    // delta / r is the unit vector toward the attractor
    delta * (g * attractor_mass * body_mass / (r_squared * r))
}

/// Speed of a circular orbit at distance `r` around a central mass.
///
/// v = √(g · M / r)
#[inline]
pub fn orbital_speed(g: f64, central_mass: f64, r: f64) -> f64 {
    (g * central_mass / r).sqrt()
}

/// Unit tangent of a circular orbit around `center` in the plane normal to +Y.
///
/// `sign` selects the handedness: +1 counter-clockwise seen from +Y, -1
/// clockwise. If the radius is parallel to +Y any perpendicular direction is
/// used.
pub fn orbit_tangent(center: DVec3, body: DVec3, sign: f64) -> DVec3 {
    let to_center = (center - body).normalize_or_zero();
    let tangent = DVec3::Y.cross(to_center);

    let tangent = if tangent.length_squared() > f64::EPSILON {
        tangent.normalize()
    } else {
        DVec3::Y.any_orthonormal_vector()
    };

    tangent * sign
}

/// Initial velocity for a circular orbit of `body` around `center`.
pub fn circular_orbit_velocity(
    g: f64,
    center: DVec3,
    central_mass: f64,
    body: DVec3,
    sign: f64,
) -> DVec3 {
    let r = center.distance(body);
    orbit_tangent(center, body, sign) * orbital_speed(g, central_mass, r)
}
