//! Physics layer for the orbiting system.
//!
//! Pure formulas (gravity, circular orbits) plus the two engine-side
//! collaborators the controller relies on: force integration and sphere
//! contact detection. Both run in Bevy's FixedUpdate schedule inside their
//! [`SimulationSet`] stage.

mod contacts;
mod gravity;
mod integrator;

#[cfg(test)]
mod proptest_physics;

use bevy::prelude::*;

pub use contacts::{detect_contacts, spheres_touch, ActiveContacts, ContactEvent, ContactPair};
pub use gravity::{circular_orbit_velocity, gravity_force, orbit_tangent, orbital_speed};
pub use integrator::{integrate_bodies, integrate_step};

use crate::types::SimulationSet;

/// Plugin providing force integration and contact detection.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveContacts>()
            .add_message::<ContactEvent>()
            .add_systems(
                FixedUpdate,
                (
                    integrate_bodies.in_set(SimulationSet::Integrate),
                    detect_contacts.in_set(SimulationSet::Contacts),
                ),
            );
    }
}
