//! Orbit controller.
//!
//! Owns the planet, the optional moon and the insertion-ordered asteroid
//! roster, and drives the per-tick work:
//! - Gravity: moon pulled by the planet, asteroids by planet and moon
//! - Culling: asteroids beyond the render distance are flagged for removal
//! - Spawning: one asteroid per spawn delay, up to the configured maximum
//!
//! Bodies are referenced through explicit entity handles in
//! [`OrbitingSystem`]. A missing moon is a normal state: everything that
//! depends on it is skipped.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::asteroid::{spawn_asteroid, AsteroidCounter, AsteroidFactory, AsteroidSpawned};
use crate::config::{OrbitConfig, SimulationConfig};
use crate::destruction::{DestroyCause, DestroyRequest};
use crate::error::ConfigError;
use crate::physics::{circular_orbit_velocity, gravity_force};
use crate::time::SimulationClock;
use crate::types::{
    BodyKind, BodyName, BodyState, CollisionResolver, Destroyed, ForceAccumulator, SimulationSet,
};

/// Handles to the bodies of the orbiting system.
#[derive(Resource, Debug, Clone)]
pub struct OrbitingSystem {
    pub planet: Entity,
    /// `None` once the moon has been destroyed (or if it was never created)
    pub moon: Option<Entity>,
    asteroids: Vec<Entity>,
    /// Elapsed time at which the next asteroid may spawn
    pub next_spawn_at: f64,
}

impl OrbitingSystem {
    pub fn new(planet: Entity, moon: Option<Entity>) -> Self {
        Self {
            planet,
            moon,
            asteroids: Vec::new(),
            next_spawn_at: 0.0,
        }
    }

    /// Live asteroids in spawn order.
    pub fn asteroids(&self) -> &[Entity] {
        &self.asteroids
    }

    pub fn asteroid_count(&self) -> usize {
        self.asteroids.len()
    }

    pub fn contains_asteroid(&self, entity: Entity) -> bool {
        self.asteroids.contains(&entity)
    }

    pub fn push_asteroid(&mut self, entity: Entity) {
        self.asteroids.push(entity);
    }

    /// Remove an asteroid if present. Returns whether it was in the roster.
    pub fn remove_asteroid(&mut self, entity: Entity) -> bool {
        match self.asteroids.iter().position(|&e| e == entity) {
            Some(index) => {
                self.asteroids.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Initial moon velocity for a circular orbit around the planet.
pub fn moon_orbit_velocity(config: &OrbitConfig, planet: DVec3, moon: DVec3) -> DVec3 {
    circular_orbit_velocity(
        config.gravitational_constant,
        planet,
        config.planet_mass,
        moon,
        config.orbit_direction.sign(),
    )
}

/// Create the planet and moon, the empty roster and the asteroid factory.
///
/// The moon starts `distance` away from the planet along +X with a circular
/// orbit velocity. Inserts [`OrbitingSystem`] and [`AsteroidFactory`] into
/// the world and returns a copy of the handles.
pub fn initialize(world: &mut World, config: &SimulationConfig) -> OrbitingSystem {
    let orbit = &config.orbit;
    let planet_position = orbit.planet_position();

    let planet = world
        .spawn((
            BodyKind::Planet,
            BodyName("Planet".to_string()),
            BodyState::new(planet_position, DVec3::ZERO, orbit.planet_mass, orbit.planet_size),
            ForceAccumulator::default(),
            CollisionResolver,
        ))
        .id();

    let moon_position = planet_position + DVec3::X * orbit.distance;
    let moon = orbit.spawn_moon.then(|| {
        let velocity = moon_orbit_velocity(orbit, planet_position, moon_position);
        info!(
            "Moon placed at distance {:.2} with orbital speed {:.3}",
            orbit.distance,
            velocity.length()
        );
        world
            .spawn((
                BodyKind::Moon,
                BodyName("Moon".to_string()),
                BodyState::new(moon_position, velocity, orbit.moon_mass, orbit.moon_size),
                ForceAccumulator::default(),
                CollisionResolver,
            ))
            .id()
    });

    let seed = config.seed.unwrap_or_else(rand::random);
    let factory_moon = if moon.is_some() {
        moon_position
    } else {
        planet_position
    };
    info!("Asteroid factory seed {}", seed);

    let system = OrbitingSystem::new(planet, moon);
    world.insert_resource(system.clone());
    world.insert_resource(AsteroidFactory::new(seed, factory_moon));
    system
}

/// Apply a new configuration between ticks.
///
/// Validates first and leaves the world untouched on error. On success the
/// planet and moon take the new masses and sizes, the moon moves to the new
/// distance along its current direction from the planet, and its velocity is
/// reset to a circular orbit. The planet is not moved and asteroids are not
/// touched.
pub fn reconfigure(world: &mut World, config: SimulationConfig) -> Result<(), ConfigError> {
    config.validate()?;
    let orbit = &config.orbit;

    if let Some(system) = world.get_resource::<OrbitingSystem>().cloned() {
        let planet_position = match world.get_mut::<BodyState>(system.planet) {
            Some(mut planet) => {
                planet.mass = orbit.planet_mass;
                planet.scale = orbit.planet_size;
                planet.position
            }
            None => {
                warn!("Reconfigure: planet entity is missing");
                orbit.planet_position()
            }
        };

        if let Some(moon) = system.moon
            && let Some(mut moon) = world.get_mut::<BodyState>(moon)
        {
            let direction = (moon.position - planet_position).normalize_or(DVec3::X);
            moon.mass = orbit.moon_mass;
            moon.scale = orbit.moon_size;
            moon.position = planet_position + direction * orbit.distance;
            moon.velocity = moon_orbit_velocity(orbit, planet_position, moon.position);
        }
    }

    if let Some(mut clock) = world.get_resource_mut::<SimulationClock>() {
        clock.dt = config.fixed_dt;
    }
    if let Some(mut fixed) = world.get_resource_mut::<Time<Fixed>>() {
        fixed.set_timestep_seconds(config.fixed_dt);
    }

    info!(
        "Reconfigured: distance {:.2}, planet mass {:.4}, moon mass {:.6}",
        orbit.distance, orbit.planet_mass, orbit.moon_mass
    );
    world.insert_resource(config);
    Ok(())
}

/// Accumulate gravity on the moon and on every live asteroid.
pub fn apply_orbit_gravity(
    system: Res<OrbitingSystem>,
    config: Res<SimulationConfig>,
    mut bodies: Query<(&BodyState, &mut ForceAccumulator), Without<Destroyed>>,
) {
    let g = config.orbit.gravitational_constant;

    let Ok((planet, _)) = bodies.get(system.planet) else {
        warn!("Planet entity is missing, skipping gravity");
        return;
    };
    let (planet_pos, planet_mass) = (planet.position, planet.mass);

    let moon = system.moon.and_then(|moon| {
        let (state, _) = bodies.get(moon).ok()?;
        Some((moon, state.position, state.mass))
    });

    if let Some((entity, moon_pos, moon_mass)) = moon
        && let Ok((_, mut force)) = bodies.get_mut(entity)
    {
        force.add(gravity_force(g, planet_pos, planet_mass, moon_pos, moon_mass));
    }

    for &asteroid in system.asteroids() {
        let Ok((state, mut force)) = bodies.get_mut(asteroid) else {
            continue;
        };

        force.add(gravity_force(g, planet_pos, planet_mass, state.position, state.mass));
        if let Some((_, moon_pos, moon_mass)) = moon {
            force.add(gravity_force(g, moon_pos, moon_mass, state.position, state.mass));
        }
    }
}

/// Flag asteroids farther than the render distance from the planet.
pub fn cull_asteroids(
    system: Res<OrbitingSystem>,
    config: Res<SimulationConfig>,
    bodies: Query<&BodyState, Without<Destroyed>>,
    mut requests: MessageWriter<DestroyRequest>,
) {
    let Ok(planet) = bodies.get(system.planet) else {
        return;
    };

    for &asteroid in system.asteroids() {
        let Ok(state) = bodies.get(asteroid) else {
            continue;
        };

        if planet.distance_to(state) > config.orbit.render_distance {
            requests.write(DestroyRequest {
                entity: asteroid,
                cause: DestroyCause::Culled,
            });
        }
    }
}

/// Spawn one asteroid when the spawn timer has elapsed and there is room.
pub fn spawn_asteroids(
    mut commands: Commands,
    mut system: ResMut<OrbitingSystem>,
    config: Res<SimulationConfig>,
    clock: Res<SimulationClock>,
    mut factory: ResMut<AsteroidFactory>,
    mut counter: ResMut<AsteroidCounter>,
    bodies: Query<&BodyState, Without<Destroyed>>,
    mut spawned: MessageWriter<AsteroidSpawned>,
) {
    let spawn = &config.spawn;
    if clock.elapsed < system.next_spawn_at || system.asteroid_count() >= spawn.max_asteroids {
        return;
    }

    let Ok(planet) = bodies.get(system.planet) else {
        return;
    };
    let moon = system
        .moon
        .and_then(|moon| bodies.get(moon).ok())
        .map(|state| state.position);

    let spec = factory.create_asteroid(spawn, planet.position, moon);
    let (entity, name) = spawn_asteroid(&mut commands, &mut counter, &spec);

    system.push_asteroid(entity);
    system.next_spawn_at += spawn.delay;

    debug!(
        "Spawned {} (mass {:.6}) at ({:.1}, {:.1}, {:.1}), {} live",
        name,
        spec.mass,
        spec.position.x,
        spec.position.y,
        spec.position.z,
        system.asteroid_count()
    );
    spawned.write(AsteroidSpawned { entity, name, spec });
}

/// Plugin providing the orbit controller's per-tick systems.
///
/// Expects [`OrbitingSystem`] and [`AsteroidFactory`] to have been created
/// by [`initialize`].
pub struct OrbitPlugin;

impl Plugin for OrbitPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (
                apply_orbit_gravity.in_set(SimulationSet::Gravity),
                cull_asteroids.in_set(SimulationSet::Cull),
                spawn_asteroids.in_set(SimulationSet::Spawn),
            ),
        );
    }
}
