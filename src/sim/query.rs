//! Track queries
//!
//! Linear scans over the centerline samples. Tracks hold a few hundred samples,
//! so no spatial index is needed.

use glam::Vec2;

use super::geometry::distance_to_segment;
use super::track::{Track, TrackSample};
use crate::normalize_angle;

impl Track {
    /// Sample whose tangent is closest to `target_angle`
    ///
    /// Ties go to the lowest index.
    pub fn nearest_sample_to_angle(&self, target_angle: f32) -> (usize, &TrackSample) {
        let mut best = 0;
        let mut best_diff = f32::MAX;
        for (i, sample) in self.samples.iter().enumerate() {
            let diff = normalize_angle(sample.tangent_angle - target_angle).abs();
            if diff < best_diff {
                best = i;
                best_diff = diff;
            }
        }
        (best, &self.samples[best])
    }

    /// Closest sample to `point` and its distance
    pub fn nearest_sample_to_point(&self, point: Vec2) -> (usize, f32) {
        let mut best = 0;
        let mut best_dist_sq = f32::MAX;
        for (i, sample) in self.samples.iter().enumerate() {
            let d = sample.position.distance_squared(point);
            if d < best_dist_sq {
                best = i;
                best_dist_sq = d;
            }
        }
        (best, best_dist_sq.sqrt())
    }

    /// Centerline position `samples_ahead` samples past the one nearest `point`
    pub fn point_ahead(&self, point: Vec2, samples_ahead: usize) -> Vec2 {
        let (index, _) = self.nearest_sample_to_point(point);
        self.sample(index + samples_ahead).position
    }

    /// Whether `point` lies on the drivable surface
    ///
    /// Approximate: measures distance to the nearest centerline *sample*, not
    /// the continuous curve, padded by `on_track_margin` to absorb the
    /// discretization error, so points slightly outside the corridor (notably
    /// around tight corners) can read as on-track.
    pub fn is_on_track(&self, point: Vec2) -> bool {
        let limit = self.half_width() + self.on_track_margin;
        let limit_sq = limit * limit;
        self.samples
            .iter()
            .any(|s| s.position.distance_squared(point) <= limit_sq)
    }

    /// Distance from `point` to the centerline polyline (for debug overlays)
    pub fn distance_to_centerline(&self, point: Vec2) -> f32 {
        let n = self.samples.len();
        (0..n)
            .map(|i| {
                distance_to_segment(
                    point,
                    self.samples[i].position,
                    self.samples[(i + 1) % n].position,
                )
            })
            .fold(f32::MAX, f32::min)
    }
}

#[cfg(test)]
mod tests {
    use super::super::track::generate_track;
    use super::*;
    use crate::settings::TrackSettings;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn track_800x600() -> Track {
        let settings = TrackSettings {
            track_width: 240.0,
            ..Default::default()
        };
        generate_track(800.0, 600.0, 360, &settings)
    }

    #[test]
    fn test_start_index_matches_angle_query() {
        let track = track_800x600();
        let (index, sample) = track.nearest_sample_to_angle(-FRAC_PI_2);
        assert_eq!(index, track.start_index);

        // Brute-force check: nothing is strictly closer
        let best = normalize_angle(sample.tangent_angle + FRAC_PI_2).abs();
        for s in &track.samples {
            assert!(normalize_angle(s.tangent_angle + FRAC_PI_2).abs() >= best);
        }
    }

    #[test]
    fn test_angle_query_tie_breaks_to_first() {
        let track = track_800x600();
        // Every sample on the top straight has tangent 0; the first one wins
        let (index, sample) = track.nearest_sample_to_angle(0.0);
        assert_eq!(sample.tangent_angle, 0.0);
        assert!(track.samples[..index].iter().all(|s| s.tangent_angle != 0.0));
    }

    #[test]
    fn test_angle_query_wraps() {
        let track = track_800x600();
        // π and -π name the same direction (bottom straight, heading left)
        for target in [PI, -PI] {
            let (_, sample) = track.nearest_sample_to_angle(target);
            assert!(normalize_angle(sample.tangent_angle - PI).abs() < 1e-5);
            assert!(sample.position.y > 300.0);
        }
    }

    #[test]
    fn test_on_track_corridor() {
        let track = track_800x600();
        let start = track.start_sample();
        let normal = start.normal();
        assert!(track.is_on_track(start.position));
        assert!(track.is_on_track(start.position + normal * 119.0));
        assert!(track.is_on_track(start.position - normal * 124.0));
        assert!(!track.is_on_track(start.position - normal * 130.0));
        // Above the top straight
        assert!(!track.is_on_track(Vec2::new(400.0, -10.0)));
    }

    #[test]
    fn test_on_track_is_approximate() {
        // The margin accepts points a little outside the true corridor
        let track = track_800x600();
        let p = track.samples[10].position - track.normal_at(10) * 123.0;
        assert!(track.distance_to_centerline(p) > track.half_width());
        assert!(track.is_on_track(p));
    }

    #[test]
    fn test_nearest_sample_to_point() {
        let track = track_800x600();
        let target = track.samples[42].position + track.normal_at(42) * 10.0;
        let (index, dist) = track.nearest_sample_to_point(target);
        assert_eq!(index, 42);
        assert!((dist - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_point_ahead_wraps() {
        let track = track_800x600();
        let last = track.samples.len() - 1;
        let p = track.samples[last].position;
        assert_eq!(track.point_ahead(p, 3), track.samples[2].position);
    }

    #[test]
    fn test_distance_to_centerline() {
        let track = track_800x600();
        // Midway between two straight samples on the left straight
        let p = (track.samples[0].position + track.samples[1].position) / 2.0 + Vec2::X * 30.0;
        assert!((track.distance_to_centerline(p) - 30.0).abs() < 1e-3);
    }
}
