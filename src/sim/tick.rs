//! Per-tick simulation step
//!
//! One call per host animation frame: apply queued commands, derive a capped
//! `dt` from the host clock, advance every vehicle, then validate laps. Vehicles
//! are processed in grid order so runs are reproducible.

use super::lap::{StartZone, check_progress};
use super::state::{LapEvent, RacePhase, Simulation};
use super::vehicle::{InputState, Vehicle, advance};
use crate::settings::SecondVehicleMode;

/// Result of one tick
#[derive(Debug, Clone)]
pub struct TickOutcome<'a> {
    /// Step actually simulated (seconds)
    pub dt: f32,
    /// Vehicles after the step, for drawing
    pub vehicles: &'a [Vehicle],
    /// At most one entry per vehicle
    pub lap_events: Vec<LapEvent>,
}

/// Map raw per-slot inputs onto vehicles according to the controller mode
pub fn resolve_inputs(
    raw: &[Option<InputState>],
    vehicle_count: usize,
    second: SecondVehicleMode,
) -> Vec<Option<InputState>> {
    let slot = |i: usize| raw.get(i).copied().flatten();
    (0..vehicle_count)
        .map(|i| match (i, second) {
            (1, SecondVehicleMode::Idle) => None,
            (1, SecondVehicleMode::MirrorFirst) => slot(0),
            _ => slot(i),
        })
        .collect()
}

impl Simulation {
    /// Capped step since the previous tick; updates the stored clock reading
    fn step_dt(&mut self, now: f64) -> f32 {
        if !now.is_finite() {
            log::warn!("Ignoring non-finite clock reading {}", now);
            return 0.0;
        }
        let elapsed = match self.last_tick_time.replace(now) {
            Some(last) => now - last,
            None => 0.0,
        };
        if elapsed < 0.0 {
            log::warn!("Clock went backwards by {:.4}s; treating as zero", -elapsed);
            return 0.0;
        }
        let max_dt = self.settings.race.max_dt;
        if elapsed > max_dt as f64 {
            log::warn!("Frame gap {:.3}s capped to {}s", elapsed, max_dt);
            return max_dt;
        }
        elapsed as f32
    }
}

/// Advance the simulation to host time `elapsed_real_time` (seconds)
///
/// `inputs` holds one entry per controllable vehicle slot; missing entries and
/// `None` both mean "no input this tick".
pub fn tick<'a>(
    sim: &'a mut Simulation,
    elapsed_real_time: f64,
    inputs: &[Option<InputState>],
) -> TickOutcome<'a> {
    sim.drain_commands();
    let dt = sim.step_dt(elapsed_real_time);
    let mut lap_events = Vec::new();

    if let (RacePhase::Racing, Some(track)) = (sim.phase, sim.track.as_ref()) {
        sim.tick_count += 1;
        let inputs = resolve_inputs(inputs, sim.vehicles.len(), sim.settings.race.second_vehicle);

        for (vehicle, input) in sim.vehicles.iter_mut().zip(inputs) {
            advance(vehicle, dt, input, |p| track.is_on_track(p));
        }

        let zone = StartZone {
            radius: sim.settings.start_zone_radius(),
            exit_distance: sim.settings.start_exit_distance(),
        };
        for (vehicle_index, vehicle) in sim.vehicles.iter_mut().enumerate() {
            if check_progress(vehicle, track, zone) {
                log::info!("Vehicle {} completed lap {}", vehicle_index, vehicle.laps);
                lap_events.push(LapEvent {
                    vehicle_index,
                    new_lap_count: vehicle.laps,
                });
            }
        }
    }

    TickOutcome {
        dt,
        vehicles: &sim.vehicles,
        lap_events,
    }
}
