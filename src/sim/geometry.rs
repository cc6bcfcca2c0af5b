//! Planar segment helpers used by gate crossing and debug queries

use glam::Vec2;

/// Parametric slack so a point lying exactly on a segment still counts
const INTERSECT_EPS: f32 = 1e-5;

/// 2D cross product (z component of the 3D cross)
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Intersection of segments `a0→a1` and `b0→b1`
///
/// Returns the fraction along `a` at which the segments meet. Endpoints are
/// inclusive. Degenerate (zero-length) or parallel segments never intersect.
pub fn segment_intersection(a0: Vec2, a1: Vec2, b0: Vec2, b1: Vec2) -> Option<f32> {
    let r = a1 - a0;
    let s = b1 - b0;
    if r.length_squared() < 1e-12 || s.length_squared() < 1e-12 {
        return None;
    }

    let denom = cross(r, s);
    if denom.abs() < 1e-9 * r.length() * s.length() {
        return None; // Parallel or collinear
    }

    let qp = b0 - a0;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;

    let range = -INTERSECT_EPS..=1.0 + INTERSECT_EPS;
    if range.contains(&t) && range.contains(&u) {
        Some(t.clamp(0.0, 1.0))
    } else {
        None
    }
}

/// Closest point to `p` on segment `a→b`
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Distance from `p` to segment `a→b`
#[inline]
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p - closest_point_on_segment(p, a, b)).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossing_segments() {
        let t = segment_intersection(
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
        );
        assert!((t.unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_endpoint_on_segment_counts() {
        // Movement starts exactly on the gate
        let t = segment_intersection(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 5.0),
            Vec2::new(-10.0, 0.0),
            Vec2::new(10.0, 0.0),
        );
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn test_miss_and_degenerate() {
        // Stops short of the gate
        assert!(
            segment_intersection(
                Vec2::new(0.0, -5.0),
                Vec2::new(0.0, -1.0),
                Vec2::new(-10.0, 0.0),
                Vec2::new(10.0, 0.0),
            )
            .is_none()
        );
        // Passes beyond the gate's end
        assert!(
            segment_intersection(
                Vec2::new(20.0, -5.0),
                Vec2::new(20.0, 5.0),
                Vec2::new(-10.0, 0.0),
                Vec2::new(10.0, 0.0),
            )
            .is_none()
        );
        // Zero-length movement
        assert!(
            segment_intersection(
                Vec2::ZERO,
                Vec2::ZERO,
                Vec2::new(-10.0, 0.0),
                Vec2::new(10.0, 0.0),
            )
            .is_none()
        );
        // Parallel
        assert!(
            segment_intersection(
                Vec2::new(-5.0, 0.0),
                Vec2::new(5.0, 0.0),
                Vec2::new(-10.0, 0.0),
                Vec2::new(10.0, 0.0),
            )
            .is_none()
        );
    }

    #[test]
    fn test_distance_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert!((distance_to_segment(Vec2::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-6);
        assert!((distance_to_segment(Vec2::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-6);
        assert_eq!(closest_point_on_segment(Vec2::new(3.0, 3.0), a, a), a);
    }
}
