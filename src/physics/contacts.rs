//! Sphere contact detection.
//!
//! Emits a [`ContactEvent`] when two live bodies start touching. Pairs that
//! were already touching on the previous tick do not fire again until they
//! separate.

use std::collections::HashSet;

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::types::{BodyState, CollisionResolver, Destroyed};

/// Two entities in canonical (lower, higher) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactPair {
    pub low: Entity,
    pub high: Entity,
}

impl ContactPair {
    pub fn new(a: Entity, b: Entity) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.low == entity || self.high == entity
    }
}

/// Sent when two bodies begin touching.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactEvent {
    pub pair: ContactPair,
}

/// Pairs that were in contact at the end of the last detection pass.
#[derive(Resource, Default, Debug)]
pub struct ActiveContacts {
    pairs: HashSet<ContactPair>,
}

impl ActiveContacts {
    pub fn is_touching(&self, pair: ContactPair) -> bool {
        self.pairs.contains(&pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Whether two spheres overlap or touch.
#[inline]
pub fn spheres_touch(a: DVec3, radius_a: f64, b: DVec3, radius_b: f64) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) <= reach * reach
}

/// Detect contact-enter events between live collidable bodies.
pub fn detect_contacts(
    bodies: Query<(Entity, &BodyState), (With<CollisionResolver>, Without<Destroyed>)>,
    mut active: ResMut<ActiveContacts>,
    mut contacts: MessageWriter<ContactEvent>,
) {
    // Stable order so events come out the same way every run
    let mut spheres: Vec<(Entity, DVec3, f64)> = bodies
        .iter()
        .map(|(entity, state)| (entity, state.position, state.radius()))
        .collect();
    spheres.sort_by_key(|(entity, _, _)| *entity);

    let mut touching = HashSet::new();

    for (i, &(a, pos_a, radius_a)) in spheres.iter().enumerate() {
        for &(b, pos_b, radius_b) in &spheres[i + 1..] {
            if !spheres_touch(pos_a, radius_a, pos_b, radius_b) {
                continue;
            }

            let pair = ContactPair::new(a, b);
            touching.insert(pair);

            if !active.is_touching(pair) {
                contacts.write(ContactEvent { pair });
            }
        }
    }

    active.pairs = touching;
}
