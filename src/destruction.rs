//! Destruction of bodies.
//!
//! Every removal goes through a [`DestroyRequest`], drained here by a single
//! consumer once per tick. Requests are idempotent: a body that is already
//! gone or already destroyed is ignored.
//!
//! - Culled asteroids are removed silently and despawned at once.
//! - Collision losers are disabled immediately (no contacts, no motion),
//!   optionally get an [`Explosion`], and are reclaimed after the configured
//!   delay so trailing visuals can finish.
//! - The planet is never destroyed.

use std::collections::HashSet;

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::collision::display_name;
use crate::config::SimulationConfig;
use crate::orbit::OrbitingSystem;
use crate::time::SimulationClock;
use crate::types::{BodyKind, BodyName, BodyState, Destroyed, SimulationSet};

/// Why a body is being removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DestroyCause {
    /// Lost a collision
    Collision,
    /// Left the render distance
    Culled,
}

/// Request to remove a body from the simulation.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DestroyRequest {
    pub entity: Entity,
    pub cause: DestroyCause,
}

/// Sent once a body has actually been destroyed or culled.
#[derive(Message, Clone, Debug)]
pub struct BodyDestroyed {
    pub entity: Entity,
    pub name: String,
    pub kind: BodyKind,
    pub position: DVec3,
    pub cause: DestroyCause,
}

/// Radial particle burst emitted where a body was destroyed.
///
/// Describes the burst for whatever renders it; the simulation does not
/// animate particles.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Explosion {
    /// Seconds the emitter runs
    pub emit_duration: f64,
    /// Seconds each particle lives
    pub particle_lifetime: f64,
    /// Particles emitted per second
    pub emission_rate: f64,
    /// Particle size, relative to the destroyed body
    pub particle_size: f64,
    pub looping: bool,
}

impl Explosion {
    /// Burst sized for a body of the given scale.
    pub fn for_scale(scale: f64) -> Self {
        Self {
            emit_duration: 0.1,
            particle_lifetime: 3.0,
            emission_rate: 300.0,
            particle_size: scale / 25.0,
            looping: false,
        }
    }
}

/// Countdown until a destroyed body is despawned.
#[derive(Component, Clone, Copy, Debug)]
pub struct PendingReclaim {
    pub remaining: f64,
}

/// Running destruction statistics.
#[derive(Resource, Default, Debug)]
pub struct DestructionStats {
    pub destroyed: u32,
    pub culled: u32,
    pub reclaimed: u32,
}

/// Drain destroy requests.
pub fn handle_destroy_requests(
    mut commands: Commands,
    mut requests: MessageReader<DestroyRequest>,
    mut system: ResMut<OrbitingSystem>,
    bodies: Query<(&BodyKind, &BodyState, Option<&BodyName>), Without<Destroyed>>,
    config: Res<SimulationConfig>,
    mut destroyed: MessageWriter<BodyDestroyed>,
    mut stats: ResMut<DestructionStats>,
) {
    let mut handled = HashSet::new();
    let planet_position = bodies
        .get(system.planet)
        .map(|(_, state, _)| state.position)
        .unwrap_or(DVec3::ZERO);

    for request in requests.read() {
        let entity = request.entity;
        if !handled.insert(entity) {
            continue;
        }

        system.remove_asteroid(entity);

        let Ok((&kind, state, name)) = bodies.get(entity) else {
            // Already gone or already destroyed
            continue;
        };

        if kind == BodyKind::Planet {
            debug!("Ignoring request to destroy the planet");
            continue;
        }

        if system.moon == Some(entity) {
            system.moon = None;
        }

        let name = display_name(name, entity);

        match request.cause {
            DestroyCause::Culled => {
                debug!(
                    "{} left render distance at {:.1}",
                    name,
                    state.position.distance(planet_position)
                );
                commands.entity(entity).despawn();
                stats.culled += 1;
            }
            DestroyCause::Collision => {
                info!(
                    "{} destroyed at ({:.1}, {:.1}, {:.1})",
                    name, state.position.x, state.position.y, state.position.z
                );
                let mut body = commands.entity(entity);
                body.insert((
                    Destroyed,
                    PendingReclaim {
                        remaining: config.reclaim_delay,
                    },
                ));
                if config.orbit.explosions {
                    body.insert(Explosion::for_scale(state.scale));
                }
                stats.destroyed += 1;
            }
        }

        destroyed.write(BodyDestroyed {
            entity,
            name,
            kind,
            position: state.position,
            cause: request.cause,
        });
    }
}

/// Count down pending reclaims and despawn expired bodies.
///
/// Runs before [`handle_destroy_requests`] in the same stage, so a body
/// destroyed on tick `k` is first aged on tick `k + 1` and lives for
/// `reclaim_delay` of simulated time.
pub fn reclaim_destroyed(
    mut commands: Commands,
    mut pending: Query<(Entity, &mut PendingReclaim)>,
    clock: Res<SimulationClock>,
    mut stats: ResMut<DestructionStats>,
) {
    for (entity, mut reclaim) in pending.iter_mut() {
        reclaim.remaining -= clock.dt;
        if reclaim.remaining <= 0.0 {
            commands.entity(entity).despawn();
            stats.reclaimed += 1;
        }
    }
}

/// Plugin providing the destruction stage.
pub struct DestructionPlugin;

impl Plugin for DestructionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DestructionStats>()
            .add_message::<DestroyRequest>()
            .add_message::<BodyDestroyed>()
            .add_systems(
                FixedUpdate,
                // Reclaim first so a body destroyed this tick keeps its full delay
                (reclaim_destroyed, handle_destroy_requests)
                    .chain()
                    .in_set(SimulationSet::Destroy),
            );
    }
}
