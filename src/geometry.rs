//! Distance and angle primitives over landmark points.

use crate::types::Point;

/// Vectors shorter than this are treated as degenerate (coincident landmarks).
const MIN_VECTOR_LENGTH: f32 = 1e-6;

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f32 {
    p.distance(&q)
}

/// Angle between two vectors in degrees, in [0, 180].
///
/// Uses cos(θ) = (a · b) / (|a| |b|) on the unit vectors, clamping the cosine
/// into [-1, 1] before `acos`. Returns `None` if either vector has zero or
/// non-finite length.
pub fn angle_between(a: Point, b: Point) -> Option<f32> {
    let mag_a = a.norm();
    let mag_b = b.norm();
    if !(mag_a.is_finite() && mag_b.is_finite()) {
        return None;
    }
    if mag_a < MIN_VECTOR_LENGTH || mag_b < MIN_VECTOR_LENGTH {
        return None;
    }

    let cos_angle = (a * (1.0 / mag_a)).dot(&(b * (1.0 / mag_b))).clamp(-1.0, 1.0);
    let degrees = cos_angle.acos().to_degrees();
    degrees.is_finite().then_some(degrees)
}

/// Angle at `apex` formed by the rays towards `a` and `b`, in degrees.
pub fn angle_at(apex: Point, a: Point, b: Point) -> Option<f32> {
    angle_between(a - apex, b - apex)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: [Point; 5] = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(-3.5, 2.25),
        Point::new(120.0, 48.0),
        Point::new(0.001, -0.4),
    ];

    #[test]
    fn distance_to_self_is_zero() {
        for p in SAMPLES {
            assert_eq!(distance(p, p), 0.0);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        for p in SAMPLES {
            for q in SAMPLES {
                assert_eq!(distance(p, q), distance(q, p));
            }
        }
        assert!((distance(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn angle_with_self_and_opposite() {
        for v in SAMPLES.iter().copied().filter(|v| v.norm() > 0.0) {
            let same = angle_between(v, v).unwrap();
            assert!(same.abs() < 0.1, "angle({v:?}, {v:?}) = {same}");

            let opposite = angle_between(v, -v).unwrap();
            assert!((opposite - 180.0).abs() < 0.1, "angle({v:?}, -v) = {opposite}");
        }
    }

    #[test]
    fn right_angle() {
        let angle = angle_between(Point::new(2.0, 0.0), Point::new(0.0, 5.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-4);
    }

    #[test]
    fn zero_length_vector_has_no_angle() {
        assert_eq!(angle_between(Point::zero(), Point::new(1.0, 1.0)), None);
        assert_eq!(angle_between(Point::new(1.0, 1.0), Point::zero()), None);
    }

    #[test]
    fn large_vectors_keep_their_angle() {
        // a · b overflows f32 here; the unit vectors do not
        let angle = angle_between(Point::new(1e30, 1e30), Point::new(1e30, 0.0)).unwrap();
        assert!((angle - 45.0).abs() < 1e-3);
    }

    #[test]
    fn non_finite_vector_has_no_angle() {
        assert_eq!(angle_between(Point::new(f32::INFINITY, 0.0), Point::new(1.0, 0.0)), None);
        assert_eq!(angle_between(Point::new(1.0, 0.0), Point::new(f32::NAN, 1.0)), None);
        // Difference of two finite points that overflows
        let far = angle_at(Point::new(-3e38, 0.0), Point::new(3e38, 0.0), Point::new(-3e38, 1.0));
        assert_eq!(far, None);
    }

    #[test]
    fn angle_at_apex() {
        // Straight line through the apex
        let straight = angle_at(
            Point::new(0.5, 0.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        )
        .unwrap();
        assert!((straight - 180.0).abs() < 0.1);

        let coincident = angle_at(Point::new(1.0, 1.0), Point::new(1.0, 1.0), Point::zero());
        assert_eq!(coincident, None);
    }
}
