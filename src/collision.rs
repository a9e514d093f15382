//! Collision resolution between touching bodies.
//!
//! Each contact is judged once, by a single arbiter keyed on the canonical
//! (lower, higher) entity pair:
//! - Post-collision velocities follow the 1-D elastic collision formula
//!   applied to 3-D vectors
//! - The lighter body is destroyed; equal masses destroy both
//! - A destroyed body gets its post-collision velocity before removal
//!
//! Destruction itself is requested through [`DestroyRequest`] and carried out
//! by the destruction stage later in the same tick.

use std::collections::HashSet;

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::destruction::{DestroyCause, DestroyRequest};
use crate::physics::{ContactEvent, ContactPair};
use crate::types::{BodyName, BodyState, Destroyed, SimulationSet};

/// Velocities after a perfectly elastic collision.
///
/// v1 = ((m1 − m2)/(m1 + m2))·u1 + (2·m2/(m1 + m2))·u2
/// v2 = (2·m1/(m1 + m2))·u1 + ((m2 − m1)/(m1 + m2))·u2
///
/// # Arguments
/// * `m1`, `u1` - Mass and velocity of the first body
/// * `m2`, `u2` - Mass and velocity of the second body
///
/// # Returns
/// `(v1, v2)`, the velocities after impact
#[inline]
pub fn elastic_collision(m1: f64, u1: DVec3, m2: f64, u2: DVec3) -> (DVec3, DVec3) {
    let total = m1 + m2;
    let v1 = u1 * ((m1 - m2) / total) + u2 * (2.0 * m2 / total);
    let v2 = u1 * (2.0 * m1 / total) + u2 * ((m2 - m1) / total);
    (v1, v2)
}

/// Result of judging one contact.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionOutcome {
    pub pair: ContactPair,
    /// Post-collision velocity of `pair.low`
    pub low_velocity: DVec3,
    /// Post-collision velocity of `pair.high`
    pub high_velocity: DVec3,
    pub destroy_low: bool,
    pub destroy_high: bool,
}

impl CollisionOutcome {
    /// Destroyed entities with their post-collision velocities.
    pub fn destroyed(&self) -> impl Iterator<Item = (Entity, DVec3)> + '_ {
        let low = self
            .destroy_low
            .then_some((self.pair.low, self.low_velocity));
        let high = self
            .destroy_high
            .then_some((self.pair.high, self.high_velocity));
        low.into_iter().chain(high)
    }
}

/// Judge a contact between `low` and `high` (the pair's two bodies).
pub fn resolve_contact(pair: ContactPair, low: &BodyState, high: &BodyState) -> CollisionOutcome {
    let (low_velocity, high_velocity) =
        elastic_collision(low.mass, low.velocity, high.mass, high.velocity);

    CollisionOutcome {
        pair,
        low_velocity,
        high_velocity,
        destroy_low: low.mass <= high.mass,
        destroy_high: high.mass <= low.mass,
    }
}

/// Running collision statistics.
#[derive(Resource, Default, Debug)]
pub struct CollisionStats {
    /// Contacts judged so far
    pub resolved: u64,
    /// Most recent outcome, if any
    pub last_outcome: Option<CollisionOutcome>,
}

/// Consume contact events and request destruction of the losers.
///
/// Contacts are skipped when the pair was already judged this tick, or when
/// either body is gone or already lost an earlier contact.
pub fn resolve_collisions(
    mut contacts: MessageReader<ContactEvent>,
    mut bodies: Query<(&mut BodyState, Option<&BodyName>), Without<Destroyed>>,
    mut requests: MessageWriter<DestroyRequest>,
    mut stats: ResMut<CollisionStats>,
) {
    let mut judged = HashSet::new();
    let mut doomed = HashSet::new();

    for contact in contacts.read() {
        let pair = contact.pair;
        if !judged.insert(pair) || doomed.contains(&pair.low) || doomed.contains(&pair.high) {
            continue;
        }

        let Ok([(low, low_name), (high, high_name)]) = bodies.get_many([pair.low, pair.high])
        else {
            continue;
        };

        let outcome = resolve_contact(pair, low, high);
        debug!(
            "Contact {} (m={:.5}) <-> {} (m={:.5})",
            display_name(low_name, pair.low),
            low.mass,
            display_name(high_name, pair.high),
            high.mass,
        );

        for (entity, velocity) in outcome.destroyed() {
            if let Ok((mut state, _)) = bodies.get_mut(entity) {
                state.velocity = velocity;
            }
            doomed.insert(entity);
            requests.write(DestroyRequest {
                entity,
                cause: DestroyCause::Collision,
            });
        }

        stats.resolved += 1;
        stats.last_outcome = Some(outcome);
    }
}

pub(crate) fn display_name(name: Option<&BodyName>, entity: Entity) -> String {
    match name {
        Some(name) => name.0.clone(),
        None => format!("{entity}"),
    }
}

/// Plugin providing collision resolution.
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionStats>().add_systems(
            FixedUpdate,
            resolve_collisions.in_set(SimulationSet::Resolve),
        );
    }
}
