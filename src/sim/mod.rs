//! Deterministic simulation module
//!
//! All race logic lives here. This module must be pure and deterministic:
//! - Track geometry is a pure function of surface size and settings
//! - Stable iteration order (vehicles in grid order)
//! - Time enters only through the per-tick `dt`
//! - No rendering or platform dependencies

pub mod geometry;
pub mod lap;
pub mod query;
pub mod state;
pub mod tick;
pub mod track;
pub mod vehicle;

pub use geometry::{closest_point_on_segment, distance_to_segment, segment_intersection};
pub use lap::{LapProgress, StartZone, check_progress};
pub use state::{Command, LapEvent, RacePhase, RaceSnapshot, Simulation};
pub use tick::{TickOutcome, resolve_inputs, tick};
pub use track::{EdgeSide, Gate, Track, TrackSample, generate_track};
pub use vehicle::{InputState, Vehicle, advance};
