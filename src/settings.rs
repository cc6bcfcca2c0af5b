//! Race settings and tuning
//!
//! Loaded from JSON by the host; every field falls back to the defaults in
//! [`crate::consts`] when omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// What drives the second vehicle in a two-vehicle race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SecondVehicleMode {
    /// Driven by its own input stream
    #[default]
    Player,
    /// Never receives input (coasts to a stop)
    Idle,
    /// Copies player 1's input every tick
    MirrorFirst,
}

impl SecondVehicleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecondVehicleMode::Player => "Player",
            SecondVehicleMode::Idle => "Idle",
            SecondVehicleMode::MirrorFirst => "Mirror",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "player" | "human" => Some(SecondVehicleMode::Player),
            "idle" | "none" => Some(SecondVehicleMode::Idle),
            "mirror" | "mirror_first" => Some(SecondVehicleMode::MirrorFirst),
            _ => None,
        }
    }
}

/// Track generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackSettings {
    /// Full corridor width (half-width either side of the centerline)
    pub track_width: f32,
    /// Centerline samples per track
    pub sample_count: usize,
    /// Corner radius as a fraction of the smaller usable half-extent
    pub corner_radius_ratio: f32,
    /// Floor for the corner radius on cramped surfaces
    pub min_corner_radius: f32,
    /// Tangent angle the start line is matched against
    pub start_angle: f32,
    /// Number of lap gates around the loop
    pub gate_count: usize,
    /// Tolerance added to the half-width by the on-track test
    pub on_track_margin: f32,
    /// Cosmetic centerline displacement (0 disables)
    pub wobble_amplitude: f32,
    /// Seed for the wobble noise
    pub wobble_seed: u64,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            track_width: DEFAULT_TRACK_WIDTH,
            sample_count: DEFAULT_SAMPLE_COUNT,
            corner_radius_ratio: CORNER_RADIUS_RATIO,
            min_corner_radius: MIN_CORNER_RADIUS,
            start_angle: START_ANGLE,
            gate_count: DEFAULT_GATE_COUNT,
            on_track_margin: ON_TRACK_MARGIN,
            wobble_amplitude: 0.0,
            wobble_seed: 0x5eed,
        }
    }
}

impl TrackSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("track.track_width", self.track_width as f64, 1.0, 10_000.0)?;
        ConfigError::check_range(
            "track.sample_count",
            self.sample_count as f64,
            MIN_SAMPLE_COUNT as f64,
            100_000.0,
        )?;
        ConfigError::check_range(
            "track.corner_radius_ratio",
            self.corner_radius_ratio as f64,
            0.0,
            1.0,
        )?;
        ConfigError::check_range(
            "track.min_corner_radius",
            self.min_corner_radius as f64,
            1.0,
            10_000.0,
        )?;
        ConfigError::check_range(
            "track.start_angle",
            self.start_angle as f64,
            -std::f64::consts::TAU,
            std::f64::consts::TAU,
        )?;
        ConfigError::check_range(
            "track.gate_count",
            self.gate_count as f64,
            1.0,
            (self.sample_count / 2).max(1) as f64,
        )?;
        ConfigError::check_range(
            "track.on_track_margin",
            self.on_track_margin as f64,
            0.0,
            self.track_width as f64,
        )?;
        ConfigError::check_range(
            "track.wobble_amplitude",
            self.wobble_amplitude as f64,
            0.0,
            self.track_width as f64 / 4.0,
        )
    }
}

/// Per-vehicle handling constants (immutable for the life of a vehicle)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleTuning {
    /// Top speed on the drivable surface (units/s)
    pub max_speed: f32,
    /// Throttle acceleration (units/s²)
    pub acceleration: f32,
    /// Coasting deceleration (units/s²)
    pub deceleration: f32,
    /// Steering rate (rad/s)
    pub turn_rate: f32,
    /// Speed multiplier per tick per active turn input
    pub turn_scrub: f32,
    /// Max speed multiplier while off track
    pub off_track_penalty: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: VEHICLE_MAX_SPEED,
            acceleration: VEHICLE_ACCELERATION,
            deceleration: VEHICLE_DECELERATION,
            turn_rate: VEHICLE_TURN_RATE,
            turn_scrub: TURN_SCRUB,
            off_track_penalty: OFF_TRACK_PENALTY,
        }
    }
}

impl VehicleTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("vehicle.max_speed", self.max_speed as f64, 0.0, 100_000.0)?;
        ConfigError::check_range(
            "vehicle.acceleration",
            self.acceleration as f64,
            0.0,
            100_000.0,
        )?;
        ConfigError::check_range(
            "vehicle.deceleration",
            self.deceleration as f64,
            0.0,
            100_000.0,
        )?;
        ConfigError::check_range("vehicle.turn_rate", self.turn_rate as f64, 0.0, 100.0)?;
        ConfigError::check_range("vehicle.turn_scrub", self.turn_scrub as f64, 0.0, 1.0)?;
        ConfigError::check_range(
            "vehicle.off_track_penalty",
            self.off_track_penalty as f64,
            0.0,
            1.0,
        )
    }

    /// Speed ceiling for the current surface
    #[inline]
    pub fn effective_max_speed(&self, on_track: bool) -> f32 {
        if on_track {
            self.max_speed
        } else {
            self.max_speed * self.off_track_penalty
        }
    }
}

/// Race orchestration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceSettings {
    /// Largest step a tick may take (seconds)
    pub max_dt: f32,
    /// Lap-completion radius around the start sample, as a fraction of track width
    pub start_zone_radius_factor: f32,
    /// Distance (fraction of track width) that re-arms lap completion
    pub start_exit_factor: f32,
    /// Lateral distance between grid slots, as a fraction of track width
    pub lane_spacing_factor: f32,
    /// Controller for the second vehicle
    pub second_vehicle: SecondVehicleMode,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            max_dt: MAX_DT,
            start_zone_radius_factor: START_ZONE_RADIUS_FACTOR,
            start_exit_factor: START_EXIT_FACTOR,
            lane_spacing_factor: LANE_SPACING_FACTOR,
            second_vehicle: SecondVehicleMode::Player,
        }
    }
}

impl RaceSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_range("race.max_dt", self.max_dt as f64, 0.001, 1.0)?;
        ConfigError::check_range(
            "race.start_zone_radius_factor",
            self.start_zone_radius_factor as f64,
            0.01,
            2.0,
        )?;
        // Re-arming must happen strictly outside the start zone
        ConfigError::check_range(
            "race.start_exit_factor",
            self.start_exit_factor as f64,
            self.start_zone_radius_factor as f64 + 0.01,
            10.0,
        )?;
        ConfigError::check_range(
            "race.lane_spacing_factor",
            self.lane_spacing_factor as f64,
            0.0,
            0.5,
        )
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub track: TrackSettings,
    pub vehicle: VehicleTuning,
    pub race: RaceSettings,
}

impl Settings {
    /// Check every field against its documented bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.track.validate()?;
        self.vehicle.validate()?;
        self.race.validate()
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Start-zone radius in track units
    pub fn start_zone_radius(&self) -> f32 {
        self.track.track_width * self.race.start_zone_radius_factor
    }

    /// Distance from the start sample that re-arms lap completion
    pub fn start_exit_distance(&self) -> f32 {
        self.track.track_width * self.race.start_exit_factor
    }
}
