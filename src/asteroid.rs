//! Asteroid generation and spawning.
//!
//! The [`AsteroidFactory`] builds asteroid specs either from the fixed
//! designer values or randomly within the configured ranges. Random
//! asteroids appear in a spherical shell just outside the moon's orbit and
//! are aimed roughly at the planet. The factory owns a seeded RNG so a run
//! can be replayed exactly.

use bevy::math::{DQuat, DVec3};
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::SpawnConfig;
use crate::types::{BodyKind, BodyName, BodyState, CollisionResolver, ForceAccumulator, DEG_TO_RAD};

/// Initial conditions for a new asteroid.
#[derive(Clone, Debug, PartialEq)]
pub struct AsteroidSpec {
    pub position: DVec3,
    pub velocity: DVec3,
    pub mass: f64,
    /// Uniform scale (diameter)
    pub scale: f64,
}

impl AsteroidSpec {
    pub fn body_state(&self) -> BodyState {
        BodyState::new(self.position, self.velocity, self.mass, self.scale)
    }
}

/// Sent after an asteroid has been added to the roster.
#[derive(Message, Clone, Debug)]
pub struct AsteroidSpawned {
    pub entity: Entity,
    pub name: String,
    pub spec: AsteroidSpec,
}

/// Resource for generating unique asteroid names.
#[derive(Resource, Default)]
pub struct AsteroidCounter(pub u32);

/// Procedural asteroid source.
#[derive(Resource, Debug, Clone)]
pub struct AsteroidFactory {
    rng: Pcg32,
    /// Moon position at the last spawn while the moon was alive
    last_moon_position: DVec3,
}

impl AsteroidFactory {
    /// Create a factory with a fixed seed.
    ///
    /// `moon_position` seeds the last known moon position used to size the
    /// spawn shell if the moon is gone before the first spawn.
    pub fn new(seed: u64, moon_position: DVec3) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            last_moon_position: moon_position,
        }
    }

    pub fn last_moon_position(&self) -> DVec3 {
        self.last_moon_position
    }

    /// Inner and outer radius of the spawn shell around the planet.
    ///
    /// A live moon refreshes the remembered moon position first, so the
    /// shell follows the moon and keeps its last size once the moon is gone.
    pub fn spawn_shell(
        &mut self,
        config: &SpawnConfig,
        planet: DVec3,
        moon: Option<DVec3>,
    ) -> (f64, f64) {
        if let Some(moon) = moon {
            self.last_moon_position = moon;
        }

        let inner = planet.distance(self.last_moon_position) + config.shell_margin;
        (inner, inner + config.shell_band)
    }

    /// Build the next asteroid.
    ///
    /// # Arguments
    /// * `config` - Spawn ranges and fixed values
    /// * `planet` - Planet position (shell center and aim point)
    /// * `moon` - Current moon position, `None` once the moon is destroyed
    pub fn create_asteroid(
        &mut self,
        config: &SpawnConfig,
        planet: DVec3,
        moon: Option<DVec3>,
    ) -> AsteroidSpec {
        if !config.randomize {
            return AsteroidSpec {
                position: config.position(),
                velocity: config.direction(),
                mass: config.mass,
                scale: config.size,
            };
        }

        let scale = self.rng.random_range(config.min_size..=config.max_size);
        let mass = scale * config.size_mass_ratio;

        let (inner, outer) = self.spawn_shell(config, planet, moon);
        let radius = sample_open(&mut self.rng, inner, outer);
        let position = planet + random_unit_vector(&mut self.rng) * radius;

        let toward_planet = (planet - position).normalize_or_zero();
        let max = config.max_degree_variation;
        let angles = [
            self.rng.random_range(-max..=max),
            self.rng.random_range(-max..=max),
            self.rng.random_range(-max..=max),
        ];
        let direction = perturb_direction(toward_planet, angles);

        let speed = self.rng.random_range(config.min_velocity..=config.max_velocity);

        AsteroidSpec {
            position,
            velocity: direction * speed,
            mass,
            scale,
        }
    }
}

/// Rotate `direction` about X, then Y, then Z by the given angles in degrees.
pub fn perturb_direction(direction: DVec3, angles_deg: [f64; 3]) -> DVec3 {
    let [x, y, z] = angles_deg;
    let about_x = DQuat::from_axis_angle(DVec3::X, x * DEG_TO_RAD) * direction;
    let about_y = DQuat::from_axis_angle(DVec3::Y, y * DEG_TO_RAD) * about_x;
    DQuat::from_axis_angle(DVec3::Z, z * DEG_TO_RAD) * about_y
}

/// Uniform sample strictly between `low` and `high` (requires `low < high`).
fn sample_open(rng: &mut Pcg32, low: f64, high: f64) -> f64 {
    loop {
        let value = rng.random_range(low..high);
        if value > low {
            return value;
        }
    }
}

/// Uniformly distributed direction, by rejection sampling the unit ball.
fn random_unit_vector(rng: &mut Pcg32) -> DVec3 {
    loop {
        let candidate = DVec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        let length_squared = candidate.length_squared();
        if length_squared > 1e-12 && length_squared <= 1.0 {
            return candidate / length_squared.sqrt();
        }
    }
}

/// Spawn an asteroid entity from a spec, using the counter for naming.
///
/// # Returns
/// The spawned asteroid's Entity ID and display name
pub fn spawn_asteroid(
    commands: &mut Commands,
    counter: &mut AsteroidCounter,
    spec: &AsteroidSpec,
) -> (Entity, String) {
    counter.0 += 1;
    let name = format!("Asteroid {}", counter.0);

    let entity = commands
        .spawn((
            BodyKind::Asteroid,
            BodyName(name.clone()),
            spec.body_state(),
            ForceAccumulator::default(),
            CollisionResolver,
        ))
        .id();

    (entity, name)
}

/// Plugin registering asteroid bookkeeping.
///
/// The factory itself is inserted by [`crate::SimulationPlugin`] because it
/// depends on the seed.
pub struct AsteroidPlugin;

impl Plugin for AsteroidPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AsteroidCounter>()
            .add_message::<AsteroidSpawned>();
    }
}
