//! Procedural track generation
//!
//! A track is a rounded rectangle (four straights joined by quarter-circle
//! corners) sampled at equal arc-length steps. Generation is a pure function of
//! the surface size, sample count and [`TrackSettings`]: the same inputs always
//! reproduce the same samples bit for bit.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_WOBBLE_RADIUS_RATIO, MIN_SAMPLE_COUNT};
use crate::settings::TrackSettings;
use crate::{direction, normalize_angle, perpendicular};

/// One centerline sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub position: Vec2,
    /// Direction of travel at this sample (radians, (-π, π])
    pub tangent_angle: f32,
}

impl TrackSample {
    /// Unit normal pointing toward the inside of the loop
    #[inline]
    pub fn normal(&self) -> Vec2 {
        perpendicular(direction(self.tangent_angle))
    }
}

/// An invisible checkpoint spanning the corridor at one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub sample_index: usize,
    pub center: Vec2,
    /// Unit vector along the gate (perpendicular to the local tangent)
    pub normal: Vec2,
    /// Distance from the center to either end of the gate
    pub half_length: f32,
}

impl Gate {
    /// Gate endpoints
    pub fn segment(&self) -> (Vec2, Vec2) {
        (
            self.center - self.normal * self.half_length,
            self.center + self.normal * self.half_length,
        )
    }
}

/// Which corridor boundary to sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeSide {
    Inner,
    Outer,
}

/// Generated track geometry (immutable once built)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Full corridor width
    pub width: f32,
    /// Tolerance added to the half-width by the on-track test
    pub on_track_margin: f32,
    /// Drawing-surface size the track was fitted to
    pub surface: Vec2,
    /// Centerline samples; the successor of the last is the first
    pub samples: Vec<TrackSample>,
    /// Sample the race starts from
    pub start_index: usize,
    /// Checkpoint ring, gate 0 on the start line
    pub gates: Vec<Gate>,
    /// Centerline length
    length: f32,
}

impl Track {
    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Centerline perimeter
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Arc length between consecutive samples
    #[inline]
    pub fn sample_spacing(&self) -> f32 {
        self.length / self.samples.len() as f32
    }

    /// Sample at `index`, wrapping around the loop
    #[inline]
    pub fn sample(&self, index: usize) -> &TrackSample {
        &self.samples[index % self.samples.len()]
    }

    #[inline]
    pub fn start_sample(&self) -> &TrackSample {
        &self.samples[self.start_index]
    }

    /// Inward unit normal at `index`
    #[inline]
    pub fn normal_at(&self, index: usize) -> Vec2 {
        self.sample(index).normal()
    }

    /// Corridor boundary points, one per sample (for drawing)
    pub fn edge(&self, side: EdgeSide) -> Vec<Vec2> {
        let offset = match side {
            EdgeSide::Inner => self.half_width(),
            EdgeSide::Outer => -self.half_width(),
        };
        self.samples
            .iter()
            .map(|s| s.position + s.normal() * offset)
            .collect()
    }

    /// Grid position for `slot` of `count` vehicles, spread symmetrically
    /// across the start line
    pub fn grid_slot(&self, slot: usize, count: usize, lane_spacing: f32) -> Vec2 {
        let start = self.start_sample();
        let lateral = (slot as f32 - (count.saturating_sub(1)) as f32 / 2.0) * lane_spacing;
        start.position + start.normal() * lateral
    }
}

/// One piece of the rounded-rectangle outline
#[derive(Debug, Clone, Copy)]
enum Piece {
    Straight { from: Vec2, to: Vec2 },
    /// Clockwise (in screen space) arc from `start_angle` over `sweep` radians
    Corner {
        center: Vec2,
        radius: f32,
        start_angle: f32,
        sweep: f32,
    },
}

impl Piece {
    fn length(&self) -> f32 {
        match *self {
            Piece::Straight { from, to } => (to - from).length(),
            Piece::Corner { radius, sweep, .. } => radius * sweep,
        }
    }

    /// Position and tangent angle at distance `d` along the piece
    fn point_at(&self, d: f32) -> (Vec2, f32) {
        match *self {
            Piece::Straight { from, to } => {
                let delta = to - from;
                let len = delta.length();
                let t = if len > 0.0 { (d / len).clamp(0.0, 1.0) } else { 0.0 };
                (from + delta * t, delta.y.atan2(delta.x))
            }
            Piece::Corner {
                center,
                radius,
                start_angle,
                sweep,
            } => {
                let theta = start_angle + (d / radius).clamp(0.0, sweep);
                (
                    center + direction(theta) * radius,
                    normalize_angle(theta + FRAC_PI_2),
                )
            }
        }
    }
}

/// Rounded-rectangle outline starting halfway up the left straight, heading up
fn outline(center: Vec2, ax: f32, ay: f32, r: f32) -> [Piece; 9] {
    let left = -ax - r;
    let right = ax + r;
    let top = -ay - r;
    let bottom = ay + r;
    let corner = |cx: f32, cy: f32, start_angle: f32| Piece::Corner {
        center: center + Vec2::new(cx, cy),
        radius: r,
        start_angle,
        sweep: FRAC_PI_2,
    };
    let straight = |x0: f32, y0: f32, x1: f32, y1: f32| Piece::Straight {
        from: center + Vec2::new(x0, y0),
        to: center + Vec2::new(x1, y1),
    };

    [
        straight(left, 0.0, left, -ay),
        corner(-ax, -ay, PI),
        straight(-ax, top, ax, top),
        corner(ax, -ay, -FRAC_PI_2),
        straight(right, -ay, right, ay),
        corner(ax, ay, 0.0),
        straight(ax, bottom, -ax, bottom),
        corner(-ax, ay, FRAC_PI_2),
        straight(left, ay, left, 0.0),
    ]
}

/// Control points in the periodic wobble noise
const WOBBLE_KNOTS: usize = 8;

/// Smooth periodic noise in [-1, 1] at loop fraction `f` in [0, 1)
///
/// Each knot value comes from its own seeded generator, so the result depends
/// only on `f` and `seed`.
fn wobble_noise(f: f32, seed: u64) -> f32 {
    let knot_value = |k: usize| -> f32 {
        let mut rng = Pcg32::seed_from_u64(seed ^ (k as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15));
        rng.random_range(-1.0f32..=1.0)
    };
    let x = f * WOBBLE_KNOTS as f32;
    let k0 = (x.floor() as usize) % WOBBLE_KNOTS;
    let k1 = (k0 + 1) % WOBBLE_KNOTS;
    let frac = x - x.floor();
    // Cosine interpolation keeps the curve smooth at knots
    let w = (1.0 - (frac * PI).cos()) * 0.5;
    knot_value(k0) * (1.0 - w) + knot_value(k1) * w
}

/// Generate a closed track fitted to a `width` × `height` surface
///
/// Degenerate surfaces never fail: the corner radius is clamped to
/// `settings.min_corner_radius` and the straights shrink toward zero.
pub fn generate_track(width: f32, height: f32, sample_count: usize, settings: &TrackSettings) -> Track {
    let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
    let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
    let gate_count = settings.gate_count.max(1);

    let n = sample_count.max(MIN_SAMPLE_COUNT).max(gate_count * 2);
    if n != sample_count {
        log::warn!("Sample count {} raised to {}", sample_count, n);
    }

    let half_width = settings.track_width / 2.0;
    let hx = width / 2.0 - half_width;
    let hy = height / 2.0 - half_width;

    let mut r = hx.min(hy) * settings.corner_radius_ratio;
    if !(r >= settings.min_corner_radius) {
        log::warn!(
            "Surface {}x{} too small for track width {}: corner radius clamped to {}",
            width,
            height,
            settings.track_width,
            settings.min_corner_radius
        );
        r = settings.min_corner_radius;
    }
    let ax = (hx - r).max(0.0);
    let ay = (hy - r).max(0.0);

    let center = Vec2::new(width / 2.0, height / 2.0);
    let pieces = outline(center, ax, ay, r);
    let length: f32 = pieces.iter().map(Piece::length).sum();

    // Offsets below the corner radius keep the centerline simple
    let max_wobble = r * MAX_WOBBLE_RADIUS_RATIO;
    let wobble = if settings.wobble_amplitude > max_wobble {
        log::warn!(
            "Wobble amplitude {} capped to {:.1} for corner radius {:.1}",
            settings.wobble_amplitude,
            max_wobble,
            r
        );
        max_wobble
    } else {
        settings.wobble_amplitude
    };

    let mut samples = Vec::with_capacity(n);
    let mut piece_idx = 0;
    let mut piece_start = 0.0f32;
    for i in 0..n {
        let s = length * i as f32 / n as f32;
        // Advance past pieces that end before `s` (zero-length pieces are skipped)
        while piece_idx + 1 < pieces.len() && s >= piece_start + pieces[piece_idx].length() {
            piece_start += pieces[piece_idx].length();
            piece_idx += 1;
        }
        let (mut position, tangent_angle) = pieces[piece_idx].point_at(s - piece_start);

        if wobble > 0.0 {
            let f = i as f32 / n as f32;
            let normal = perpendicular(direction(tangent_angle));
            position += normal * wobble * wobble_noise(f, settings.wobble_seed);
        }

        samples.push(TrackSample {
            position,
            tangent_angle,
        });
    }
    if wobble > 0.0 {
        retangent(&mut samples);
    }

    let mut track = Track {
        width: settings.track_width,
        on_track_margin: settings.on_track_margin,
        surface: Vec2::new(width, height),
        samples,
        start_index: 0,
        gates: Vec::new(),
        length,
    };

    track.start_index = track.nearest_sample_to_angle(settings.start_angle).0;
    track.gates = place_gates(&track, gate_count.min(n / 2));

    log::info!(
        "Generated track for {}x{}: {} samples, length {:.1}, corner radius {:.1}, start {}",
        width,
        height,
        n,
        length,
        r,
        track.start_index
    );

    track
}

/// Re-derive tangents from displaced neighbours (central difference)
fn retangent(samples: &mut [TrackSample]) {
    let n = samples.len();
    let positions: Vec<Vec2> = samples.iter().map(|s| s.position).collect();
    for (i, sample) in samples.iter_mut().enumerate() {
        let delta = positions[(i + 1) % n] - positions[(i + n - 1) % n];
        sample.tangent_angle = delta.y.atan2(delta.x);
    }
}

/// Evenly spaced gates around the loop, gate 0 on the start sample
fn place_gates(track: &Track, gate_count: usize) -> Vec<Gate> {
    let n = track.samples.len();
    let half_length = track.half_width() + track.on_track_margin;
    (0..gate_count)
        .map(|k| {
            let sample_index = (track.start_index + k * n / gate_count) % n;
            let sample = &track.samples[sample_index];
            Gate {
                sample_index,
                center: sample.position,
                normal: sample.normal(),
                half_length,
            }
        })
        .collect()
}
