//! Simulation state owned by the orchestrator
//!
//! Everything the per-tick call chain mutates lives in [`Simulation`]. Hosts
//! either call the synchronous methods directly or enqueue [`Command`]s from
//! their event handlers; queued commands are applied at the next tick boundary.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::track::{Track, generate_track};
use super::vehicle::Vehicle;
use crate::consts::{MAX_PLAYERS, VEHICLE_COLORS};
use crate::error::{ConfigError, SimError};
use crate::settings::Settings;

/// Whether a race is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    /// No vehicles; ticks only drain commands
    Idle,
    Racing,
}

/// Intents queued by the host, applied at the start of the next tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Drawing surface changed size; regenerate the track
    Resize { width: f32, height: f32 },
    StartRace { player_count: usize },
    StopRace,
}

/// A vehicle finished a lap this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapEvent {
    pub vehicle_index: usize,
    pub new_lap_count: u32,
}

/// Serializable view of the race for presentation layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceSnapshot {
    pub tick_count: u64,
    pub phase: RacePhase,
    pub vehicles: Vec<Vehicle>,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    pub settings: Settings,
    /// Current geometry; replaced wholesale on resize
    pub(crate) track: Option<Track>,
    /// Active vehicles in grid order
    pub(crate) vehicles: Vec<Vehicle>,
    pub(crate) phase: RacePhase,
    /// Host clock reading at the previous tick (seconds)
    pub(crate) last_tick_time: Option<f64>,
    pub(crate) tick_count: u64,
    commands: VecDeque<Command>,
}

impl Simulation {
    /// Build an idle simulation from settings assumed valid
    ///
    /// Use [`Simulation::try_new`] for settings that did not come from
    /// [`Settings::load`] or [`Settings::from_json`].
    pub fn new(settings: Settings) -> Self {
        debug_assert!(
            settings.validate().is_ok(),
            "invalid settings: {:?}",
            settings.validate()
        );
        Self {
            settings,
            track: None,
            vehicles: Vec::new(),
            phase: RacePhase::Idle,
            last_tick_time: None,
            tick_count: 0,
            commands: VecDeque::new(),
        }
    }

    /// Range-check `settings` before building the simulation
    pub fn try_new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::new(settings))
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Queue a host intent for the next tick boundary
    pub fn enqueue(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Build a fresh track for a `width` × `height` surface and swap it in
    ///
    /// Vehicles keep their poses; lap progress is keyed by gate ordinal so it
    /// survives the swap unless the gate count changes.
    pub fn generate_track(&mut self, width: f32, height: f32) -> &Track {
        let settings = &self.settings.track;
        let track = generate_track(width, height, settings.sample_count, settings);
        for vehicle in &mut self.vehicles {
            vehicle.progress.rekey(track.gates.len());
        }
        self.track.insert(track)
    }

    /// Place `player_count` vehicles on the start line and reset all lap state
    pub fn start_race(&mut self, player_count: usize) -> Result<&[Vehicle], SimError> {
        if !(1..=MAX_PLAYERS).contains(&player_count) {
            return Err(SimError::InvalidPlayerCount {
                requested: player_count,
                max: MAX_PLAYERS,
            });
        }
        let track = self.track.as_ref().ok_or(SimError::NoTrack)?;

        let lane_spacing = track.width * self.settings.race.lane_spacing_factor;
        let heading = track.start_sample().tangent_angle;
        self.vehicles = (0..player_count)
            .map(|slot| {
                Vehicle::new(
                    track.grid_slot(slot, player_count, lane_spacing),
                    heading,
                    self.settings.vehicle,
                    VEHICLE_COLORS[slot % VEHICLE_COLORS.len()],
                    track.gates.len(),
                )
            })
            .collect();
        self.phase = RacePhase::Racing;

        log::info!("Race started with {} vehicle(s)", player_count);
        Ok(&self.vehicles)
    }

    /// End the race and discard vehicles
    pub fn stop_race(&mut self) {
        if self.phase == RacePhase::Racing {
            log::info!("Race stopped after {} ticks", self.tick_count);
        }
        self.vehicles.clear();
        self.phase = RacePhase::Idle;
    }

    /// Apply queued commands in arrival order
    pub(crate) fn drain_commands(&mut self) {
        while let Some(command) = self.commands.pop_front() {
            log::debug!("Applying {:?}", command);
            match command {
                Command::Resize { width, height } => {
                    self.generate_track(width, height);
                }
                Command::StartRace { player_count } => {
                    if let Err(e) = self.start_race(player_count) {
                        log::warn!("Dropped start-race command: {}", e);
                    }
                }
                Command::StopRace => self.stop_race(),
            }
        }
    }

    pub fn snapshot(&self) -> RaceSnapshot {
        RaceSnapshot {
            tick_count: self.tick_count,
            phase: self.phase,
            vehicles: self.vehicles.clone(),
        }
    }
}
