//! Loop Racer - simulation core for a top-down arcade racing mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track generation, kinematics, lap validation)
//! - `settings`: Data-driven tuning and race configuration
//! - `error`: Error types for race setup and configuration loading
//!
//! Rendering, input capture and UI live outside this crate; they consume
//! snapshots and feed normalized [`sim::InputState`] values back in.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SimError};
pub use settings::{RaceSettings, SecondVehicleMode, Settings, TrackSettings, VehicleTuning};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    use std::f32::consts::FRAC_PI_2;

    /// Largest simulation step (seconds) a single tick may take
    pub const MAX_DT: f32 = 0.05;
    /// Maximum vehicles in one race
    pub const MAX_PLAYERS: usize = 2;

    /// Track defaults
    pub const DEFAULT_TRACK_WIDTH: f32 = 240.0;
    pub const DEFAULT_SAMPLE_COUNT: usize = 360;
    /// Fewer samples than this cannot describe a loop with gates
    pub const MIN_SAMPLE_COUNT: usize = 8;
    /// Corner radius as a fraction of the smaller usable half-extent
    pub const CORNER_RADIUS_RATIO: f32 = 0.5;
    pub const MIN_CORNER_RADIUS: f32 = 20.0;
    /// Wobble amplitude ceiling as a fraction of the corner radius
    pub const MAX_WOBBLE_RADIUS_RATIO: f32 = 0.25;
    /// Tangent direction the start line is matched against (heading "up" the screen)
    pub const START_ANGLE: f32 = -FRAC_PI_2;
    pub const DEFAULT_GATE_COUNT: usize = 4;
    /// Tolerance added to the half-width for the on-track test
    pub const ON_TRACK_MARGIN: f32 = 5.0;

    /// Vehicle defaults (units are pixels and seconds)
    pub const VEHICLE_MAX_SPEED: f32 = 240.0;
    pub const VEHICLE_ACCELERATION: f32 = 600.0;
    pub const VEHICLE_DECELERATION: f32 = 260.0;
    pub const VEHICLE_TURN_RATE: f32 = 3.5;
    /// Speed multiplier applied per tick per active turn input
    pub const TURN_SCRUB: f32 = 0.92;
    /// Max speed multiplier while off the drivable surface
    pub const OFF_TRACK_PENALTY: f32 = 0.5;

    /// Start-zone radius as a fraction of track width
    pub const START_ZONE_RADIUS_FACTOR: f32 = 0.5;
    /// Distance (fraction of track width) a vehicle must reach before another lap can score
    pub const START_EXIT_FACTOR: f32 = 1.0;
    /// Lateral spacing between grid slots as a fraction of track width
    pub const LANE_SPACING_FACTOR: f32 = 0.25;

    /// Display colours (0xRRGGBB) by grid slot
    pub const VEHICLE_COLORS: [u32; 2] = [0xef4444, 0x3b82f6];
}

/// Normalize angle to (-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    if angle.abs() > 8.0 * TAU {
        angle %= TAU;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Unit vector pointing along `angle`
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Left-hand perpendicular of a direction (rotated +90°)
#[inline]
pub fn perpendicular(dir: Vec2) -> Vec2 {
    Vec2::new(-dir.y, dir.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-6);
        assert!((normalize_angle(3.0 * FRAC_PI_2) + FRAC_PI_2).abs() < 1e-5);
        assert!((normalize_angle(-FRAC_PI_2 - TAU * 3.0) + FRAC_PI_2).abs() < 1e-4);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_perpendicular() {
        let n = perpendicular(direction(0.0));
        assert!((n - Vec2::Y).length() < 1e-6);
    }
}
