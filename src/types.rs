//! Core body types and constants for the orbiting system.

use bevy::math::DVec3;
use bevy::prelude::*;

/// Degrees to radians conversion factor
pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Separations below this exert no gravity (avoids the r → 0 singularity).
pub const MIN_GRAVITY_SEPARATION: f64 = 1e-6;

/// Ordered stages of one fixed simulation tick.
///
/// The sets are chained, so every message written in an earlier stage is
/// drained by its single consumer in a later stage of the same tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Advance the simulation clock
    Clock,
    /// Accumulate gravitational forces
    Gravity,
    /// Flag asteroids that left the render distance
    Cull,
    /// Turn forces into motion
    Integrate,
    /// Detect sphere contacts
    Contacts,
    /// Decide collision outcomes
    Resolve,
    /// Apply destroy requests and reclaim expired bodies
    Destroy,
    /// Spawn new asteroids
    Spawn,
}

/// Role of a body in the orbiting system.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Planet,
    Moon,
    Asteroid,
}

impl BodyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyKind::Planet => "planet",
            BodyKind::Moon => "moon",
            BodyKind::Asteroid => "asteroid",
        }
    }
}

/// Physical state of a body in the simulation.
///
/// `scale` is the uniform scale of a unit-diameter sphere, so the collision
/// radius is half of it.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct BodyState {
    /// Position in simulation units
    pub position: DVec3,
    /// Velocity in units per second
    pub velocity: DVec3,
    /// Mass (always > 0 while the body is alive)
    pub mass: f64,
    /// Uniform scale (diameter)
    pub scale: f64,
}

impl BodyState {
    /// Create a new body state
    pub fn new(position: DVec3, velocity: DVec3, mass: f64, scale: f64) -> Self {
        Self {
            position,
            velocity,
            mass,
            scale,
        }
    }

    /// Collision sphere radius
    pub fn radius(&self) -> f64 {
        self.scale * 0.5
    }

    /// Euclidean distance between centers
    pub fn distance_to(&self, other: &BodyState) -> f64 {
        self.position.distance(other.position)
    }

    /// Linear momentum
    pub fn momentum(&self) -> DVec3 {
        self.velocity * self.mass
    }
}

/// Force accumulated on a body during the current tick.
///
/// Cleared by the integrator once it has been applied.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct ForceAccumulator(pub DVec3);

impl ForceAccumulator {
    pub fn add(&mut self, force: DVec3) {
        self.0 += force;
    }

    /// Return the accumulated force and reset it to zero.
    pub fn take(&mut self) -> DVec3 {
        std::mem::take(&mut self.0)
    }
}

/// Marker for bodies that take part in contact resolution.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct CollisionResolver;

/// Marker for bodies that have been destroyed and no longer interact.
///
/// Destroyed bodies keep existing until their reclaim delay expires.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Destroyed;

/// Display name used in logs.
#[derive(Component, Clone, Debug)]
pub struct BodyName(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_radius_is_half_scale() {
        let state = BodyState::new(DVec3::ZERO, DVec3::ZERO, 1.0, 12.742);
        assert_relative_eq!(state.radius(), 6.371);
    }

    #[test]
    fn test_distance_between_bodies() {
        let a = BodyState::new(DVec3::ZERO, DVec3::ZERO, 1.0, 1.0);
        let b = BodyState::new(DVec3::new(3.0, 4.0, 0.0), DVec3::ZERO, 1.0, 1.0);
        assert_relative_eq!(a.distance_to(&b), 5.0);
        assert_relative_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_force_accumulator_take_resets() {
        let mut acc = ForceAccumulator::default();
        acc.add(DVec3::X);
        acc.add(DVec3::new(0.0, 2.0, 0.0));

        assert_eq!(acc.take(), DVec3::new(1.0, 2.0, 0.0));
        assert_eq!(acc.0, DVec3::ZERO);
    }
}
