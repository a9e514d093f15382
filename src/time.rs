//! Fixed-step simulation clock.
//!
//! The clock is advanced once per FixedUpdate tick by its configured `dt`
//! rather than by wall-clock deltas, so a run is reproducible regardless of
//! frame pacing.

use bevy::prelude::*;

use crate::types::SimulationSet;

/// Simulation time resource.
#[derive(Resource, Clone, Debug)]
pub struct SimulationClock {
    /// Simulated seconds since start
    pub elapsed: f64,
    /// Fixed timestep in seconds
    pub dt: f64,
    /// Completed ticks
    pub ticks: u64,
    /// Whether the simulation is paused
    pub paused: bool,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::with_dt(0.02)
    }
}

impl SimulationClock {
    pub fn with_dt(dt: f64) -> Self {
        Self {
            elapsed: 0.0,
            dt,
            ticks: 0,
            paused: false,
        }
    }

    fn advance(&mut self) {
        self.elapsed += self.dt;
        self.ticks += 1;
    }
}

/// Run condition: true while the simulation is not paused.
pub fn simulation_running(clock: Res<SimulationClock>) -> bool {
    !clock.paused
}

/// Plugin that owns the tick ordering and the clock.
///
/// All [`SimulationSet`] stages are chained in FixedUpdate and skipped while
/// the clock is paused.
pub struct ClockPlugin;

impl Plugin for ClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationClock>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Clock,
                    SimulationSet::Gravity,
                    SimulationSet::Cull,
                    SimulationSet::Integrate,
                    SimulationSet::Contacts,
                    SimulationSet::Resolve,
                    SimulationSet::Destroy,
                    SimulationSet::Spawn,
                )
                    .chain()
                    .distributive_run_if(simulation_running),
            )
            .add_systems(FixedUpdate, advance_clock.in_set(SimulationSet::Clock));
    }
}

fn advance_clock(mut clock: ResMut<SimulationClock>) {
    clock.advance();
}
