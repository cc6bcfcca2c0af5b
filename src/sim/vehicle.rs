//! Vehicle state and arcade kinematics

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::lap::LapProgress;
use crate::settings::VehicleTuning;
use crate::{direction, normalize_angle};

/// Normalized control input for one vehicle, one tick
///
/// A vehicle with no controller receives `None` instead of an `InputState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub throttle: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl InputState {
    pub const NONE: Self = Self {
        throttle: false,
        turn_left: false,
        turn_right: false,
    };
}

/// A racing vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub position: Vec2,
    /// Heading (radians, (-π, π])
    pub heading: f32,
    /// Forward speed (units/s, never negative)
    pub speed: f32,
    /// Surface verdict from the last kinematics step
    pub on_track: bool,
    /// Position before the last kinematics step
    pub prev_position: Vec2,
    /// Completed laps this race
    pub laps: u32,
    /// Gate and start-zone bookkeeping for the lap in progress
    pub progress: LapProgress,
    /// Display colour (0xRRGGBB)
    pub color: u32,
    /// Handling constants
    pub tuning: VehicleTuning,
}

impl Vehicle {
    pub fn new(
        position: Vec2,
        heading: f32,
        tuning: VehicleTuning,
        color: u32,
        gate_count: usize,
    ) -> Self {
        Self {
            position,
            heading: normalize_angle(heading),
            speed: 0.0,
            on_track: true,
            prev_position: position,
            laps: 0,
            progress: LapProgress::new(gate_count),
            color,
            tuning,
        }
    }

    /// Unit vector along the heading
    #[inline]
    pub fn forward(&self) -> Vec2 {
        direction(self.heading)
    }

    /// Displacement during the last kinematics step
    #[inline]
    pub fn last_motion(&self) -> (Vec2, Vec2) {
        (self.prev_position, self.position)
    }
}

/// Advance one vehicle by `dt` seconds
///
/// `on_track` is evaluated at the pre-update position and decides the speed
/// ceiling. Absent input behaves like all controls released.
pub fn advance<F>(vehicle: &mut Vehicle, dt: f32, input: Option<InputState>, on_track: F)
where
    F: Fn(Vec2) -> bool,
{
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let input = input.unwrap_or(InputState::NONE);
    let tuning = vehicle.tuning;

    vehicle.on_track = on_track(vehicle.position);
    let max_speed = tuning.effective_max_speed(vehicle.on_track);

    if input.throttle {
        vehicle.speed = (vehicle.speed + tuning.acceleration * dt).clamp(0.0, max_speed);
    } else {
        // Coasting, not braking
        vehicle.speed = (vehicle.speed - tuning.deceleration * dt).max(0.0);
    }

    // Steering scrubs speed once per active direction
    if input.turn_left {
        vehicle.heading -= tuning.turn_rate * dt;
        vehicle.speed *= tuning.turn_scrub;
    }
    if input.turn_right {
        vehicle.heading += tuning.turn_rate * dt;
        vehicle.speed *= tuning.turn_scrub;
    }
    if input.turn_left || input.turn_right {
        vehicle.heading = normalize_angle(vehicle.heading);
    }

    vehicle.prev_position = vehicle.position;
    vehicle.position += vehicle.forward() * vehicle.speed * dt;
}
