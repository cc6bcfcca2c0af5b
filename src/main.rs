//! Loop Racer headless runner
//!
//! Generates a track, starts a race and drives player 1 around it with a
//! look-ahead steering script, logging lap events. Useful for tuning without a
//! renderer attached.
//!
//! Usage: `loop-racer [settings.json] [seconds]`

use std::process::ExitCode;

use loop_racer::Settings;
use loop_racer::normalize_angle;
use loop_racer::sim::{InputState, Simulation, Track, Vehicle, tick};

/// Host frame rate for the scripted run
const FRAME_HZ: f64 = 60.0;
/// Samples between the vehicle and its steering target
const LOOKAHEAD_SAMPLES: usize = 10;
/// Heading error tolerated before steering (radians)
const STEER_DEADBAND: f32 = 0.05;

fn scripted_input(track: &Track, vehicle: &Vehicle) -> InputState {
    let target = track.point_ahead(vehicle.position, LOOKAHEAD_SAMPLES);
    let to_target = target - vehicle.position;
    let error = normalize_angle(to_target.y.atan2(to_target.x) - vehicle.heading);
    InputState {
        throttle: true,
        turn_left: error < -STEER_DEADBAND,
        turn_right: error > STEER_DEADBAND,
    }
}

/// Finite, non-negative run length in seconds
fn parse_duration(arg: &str) -> Option<f64> {
    arg.parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)
}

fn run(settings: Settings, seconds: f64) -> Result<(), Box<dyn std::error::Error>> {
    let mut sim = Simulation::try_new(settings)?;
    sim.generate_track(800.0, 600.0);
    sim.start_race(2)?;

    let frames = (seconds * FRAME_HZ).ceil() as usize;
    for frame in 0..frames {
        let input = match (sim.track(), sim.vehicles().first()) {
            (Some(track), Some(vehicle)) => Some(scripted_input(track, vehicle)),
            _ => None,
        };
        let outcome = tick(&mut sim, frame as f64 / FRAME_HZ, &[input]);
        for event in &outcome.lap_events {
            println!(
                "t={:6.2}s  vehicle {} lap {}",
                frame as f64 / FRAME_HZ,
                event.vehicle_index,
                event.new_lap_count
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Loop Racer (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    let seconds = match args.next() {
        Some(arg) => match parse_duration(&arg) {
            Some(seconds) => seconds,
            None => {
                log::error!("Invalid duration {:?}: expected a finite number of seconds", arg);
                return ExitCode::FAILURE;
            }
        },
        None => 30.0,
    };

    match run(settings, seconds) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives the simulation through the library API
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_rejects_unbounded() {
        assert_eq!(parse_duration("12.5"), Some(12.5));
        assert_eq!(parse_duration("0"), Some(0.0));
        assert_eq!(parse_duration("inf"), None);
        assert_eq!(parse_duration("NaN"), None);
        assert_eq!(parse_duration("-3"), None);
        assert_eq!(parse_duration("soon"), None);
    }
}
