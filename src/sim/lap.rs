//! Lap validation
//!
//! A lap counts once every gate has been crossed and the vehicle then returns
//! to the start zone. Gates may be crossed in any order. After a lap the start
//! zone stays latched until the vehicle drives clear of it, so lingering on the
//! line scores once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::segment_intersection;
use super::track::Track;
use super::vehicle::Vehicle;

/// Per-vehicle progress through the current lap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapProgress {
    /// Crossed flags by gate ordinal
    pub gates_passed: Vec<bool>,
    pub gates_passed_count: usize,
    /// Set when a lap completes; cleared once the vehicle leaves the start area
    pub awaiting_start_exit: bool,
}

impl LapProgress {
    pub fn new(gate_count: usize) -> Self {
        Self {
            gates_passed: vec![false; gate_count],
            gates_passed_count: 0,
            awaiting_start_exit: false,
        }
    }

    /// Clear all gates for the next lap
    pub fn reset_gates(&mut self) {
        self.gates_passed.iter_mut().for_each(|g| *g = false);
        self.gates_passed_count = 0;
    }

    /// Re-key progress after a track swap; only a different gate count resets it
    pub fn rekey(&mut self, gate_count: usize) {
        if self.gates_passed.len() != gate_count {
            *self = Self::new(gate_count);
        }
    }

    pub fn all_gates_cleared(&self) -> bool {
        self.gates_passed_count >= self.gates_passed.len()
    }
}

/// Start-zone distances for lap completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartZone {
    /// Completing a lap requires being within this distance of the start sample
    pub radius: f32,
    /// Distance that re-arms completion after a lap
    pub exit_distance: f32,
}

/// Update gate and lap state after a kinematics step
///
/// Returns true when this call completed a lap (the vehicle's lap counter has
/// already been incremented).
pub fn check_progress(vehicle: &mut Vehicle, track: &Track, zone: StartZone) -> bool {
    vehicle.progress.rekey(track.gates.len());
    let (from, to) = vehicle.last_motion();

    for (ordinal, gate) in track.gates.iter().enumerate() {
        if vehicle.progress.gates_passed[ordinal] {
            continue;
        }
        let (a, b) = gate.segment();
        if segment_intersection(from, to, a, b).is_some() {
            vehicle.progress.gates_passed[ordinal] = true;
            vehicle.progress.gates_passed_count += 1;
            log::debug!(
                "Gate {} crossed ({}/{})",
                ordinal,
                vehicle.progress.gates_passed_count,
                track.gates.len()
            );
        }
    }

    let start_distance = start_distance(vehicle.position, track);

    if vehicle.progress.awaiting_start_exit && start_distance > zone.exit_distance {
        vehicle.progress.awaiting_start_exit = false;
    }

    if vehicle.progress.all_gates_cleared()
        && !vehicle.progress.awaiting_start_exit
        && start_distance <= zone.radius
    {
        vehicle.laps += 1;
        vehicle.progress.reset_gates();
        vehicle.progress.awaiting_start_exit = true;
        return true;
    }

    false
}

#[inline]
fn start_distance(position: Vec2, track: &Track) -> f32 {
    position.distance(track.start_sample().position)
}

#[cfg(test)]
mod tests {
    use super::super::track::generate_track;
    use super::*;
    use crate::settings::{TrackSettings, VehicleTuning};

    const ZONE: StartZone = StartZone {
        radius: 120.0,
        exit_distance: 240.0,
    };

    fn setup() -> (Track, Vehicle) {
        let track = generate_track(800.0, 600.0, 360, &TrackSettings::default());
        let start = *track.start_sample();
        let vehicle = Vehicle::new(
            start.position,
            start.tangent_angle,
            VehicleTuning::default(),
            0xffffff,
            track.gates.len(),
        );
        (track, vehicle)
    }

    fn teleport(vehicle: &mut Vehicle, from: Vec2, to: Vec2) {
        vehicle.prev_position = from;
        vehicle.position = to;
    }

    #[test]
    fn test_gate_crossed_once() {
        let (track, mut vehicle) = setup();
        let gate = track.gates[1];
        let sample = track.sample(gate.sample_index);
        let ahead = gate.center + crate::direction(sample.tangent_angle) * 5.0;

        // Starts exactly on the gate, moves across it
        teleport(&mut vehicle, gate.center, ahead);
        assert!(!check_progress(&mut vehicle, &track, ZONE));
        assert_eq!(vehicle.progress.gates_passed_count, 1);
        assert!(vehicle.progress.gates_passed[1]);

        // Same position again: already passed
        teleport(&mut vehicle, ahead, ahead);
        check_progress(&mut vehicle, &track, ZONE);
        assert_eq!(vehicle.progress.gates_passed_count, 1);

        // Driving back over it does not re-count either
        teleport(&mut vehicle, ahead, gate.center - crate::direction(sample.tangent_angle) * 5.0);
        check_progress(&mut vehicle, &track, ZONE);
        assert_eq!(vehicle.progress.gates_passed_count, 1);
    }

    #[test]
    fn test_movement_beside_gate_misses() {
        let (track, mut vehicle) = setup();
        let gate = track.gates[2];
        let sample = track.sample(gate.sample_index);
        let fwd = crate::direction(sample.tangent_angle);
        // Outside the corridor, past the gate's end
        let outside = gate.center + gate.normal * (gate.half_length + 10.0);
        teleport(&mut vehicle, outside - fwd * 5.0, outside + fwd * 5.0);
        check_progress(&mut vehicle, &track, ZONE);
        assert_eq!(vehicle.progress.gates_passed_count, 0);
    }

    #[test]
    fn test_gates_count_in_any_order() {
        let (track, mut vehicle) = setup();
        for ordinal in [3, 1, 2] {
            let gate = track.gates[ordinal];
            let fwd = crate::direction(track.sample(gate.sample_index).tangent_angle);
            teleport(&mut vehicle, gate.center - fwd * 3.0, gate.center + fwd * 3.0);
            check_progress(&mut vehicle, &track, ZONE);
        }
        assert_eq!(vehicle.progress.gates_passed_count, 3);
        assert!(!vehicle.progress.gates_passed[0]);
    }

    #[test]
    fn test_lap_completes_once_in_start_zone() {
        let (track, mut vehicle) = setup();
        vehicle.progress.gates_passed = vec![true; track.gates.len()];
        vehicle.progress.gates_passed_count = track.gates.len();

        let start = track.start_sample().position;
        let near = start + Vec2::new(10.0, 40.0);
        teleport(&mut vehicle, near, near);
        assert!(check_progress(&mut vehicle, &track, ZONE));
        assert_eq!(vehicle.laps, 1);
        assert_eq!(vehicle.progress.gates_passed_count, 0);
        assert!(vehicle.progress.gates_passed.iter().all(|g| !g));
        assert!(vehicle.progress.awaiting_start_exit);

        // Still inside the zone, even with every gate re-cleared
        vehicle.progress.gates_passed = vec![true; track.gates.len()];
        vehicle.progress.gates_passed_count = track.gates.len();
        assert!(!check_progress(&mut vehicle, &track, ZONE));
        assert_eq!(vehicle.laps, 1);

        // Between the zone radius and the exit distance the latch holds
        let mid = start + Vec2::new(0.0, -200.0);
        teleport(&mut vehicle, mid, mid);
        check_progress(&mut vehicle, &track, ZONE);
        assert!(vehicle.progress.awaiting_start_exit);

        // Leaving the start area re-arms completion
        let far = start + Vec2::new(0.0, -300.0);
        teleport(&mut vehicle, far, far);
        assert!(!check_progress(&mut vehicle, &track, ZONE));
        assert!(!vehicle.progress.awaiting_start_exit);

        teleport(&mut vehicle, near, near);
        assert!(check_progress(&mut vehicle, &track, ZONE));
        assert_eq!(vehicle.laps, 2);
    }

    #[test]
    fn test_start_zone_without_gates_does_nothing() {
        let (track, mut vehicle) = setup();
        let start = track.start_sample().position;
        teleport(&mut vehicle, start, start);
        assert!(!check_progress(&mut vehicle, &track, ZONE));
        assert_eq!(vehicle.laps, 0);
        assert!(!vehicle.progress.awaiting_start_exit);
    }

    #[test]
    fn test_rekey_resets_only_on_gate_count_change() {
        let mut progress = LapProgress::new(4);
        progress.gates_passed[2] = true;
        progress.gates_passed_count = 1;
        progress.rekey(4);
        assert_eq!(progress.gates_passed_count, 1);
        progress.rekey(6);
        assert_eq!(progress, LapProgress::new(6));
    }
}
