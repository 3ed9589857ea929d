//! Landmark index convention of the 48-point cat face annotation schema.
//!
//! Every classifier and the evaluator resolve points through these tables
//! instead of hard-coding indices.

use crate::geometry::{angle_at, distance};
use crate::types::{LandmarkSet, Point, Space};

/// A pair of landmark indices measured as one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
}

impl Segment {
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// The vector `landmarks[to] - landmarks[from]`.
    pub fn vector<S: Space>(&self, landmarks: &LandmarkSet<S>) -> Point {
        landmarks[self.to] - landmarks[self.from]
    }

    pub fn length<S: Space>(&self, landmarks: &LandmarkSet<S>) -> f32 {
        distance(landmarks[self.from], landmarks[self.to])
    }
}

/// Angle at `apex` between the rays towards `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub apex: usize,
    pub a: usize,
    pub b: usize,
}

impl Corner {
    pub const fn new(apex: usize, a: usize, b: usize) -> Self {
        Self { apex, a, b }
    }

    /// Angle in degrees, `None` if either ray has zero length.
    pub fn angle<S: Space>(&self, landmarks: &LandmarkSet<S>) -> Option<f32> {
        angle_at(landmarks[self.apex], landmarks[self.a], landmarks[self.b])
    }
}

/// Eye corners used for the inter-ocular normalization distance.
pub const INTER_OCULAR: Segment = Segment::new(8, 11);

pub mod eyes {
    use super::Segment;

    pub const LEFT_HORIZONTAL: Segment = Segment::new(8, 9);
    pub const LEFT_VERTICAL: Segment = Segment::new(11, 10);
    pub const RIGHT_HORIZONTAL: Segment = Segment::new(4, 5);
    pub const RIGHT_VERTICAL: Segment = Segment::new(6, 7);
}

pub mod ears {
    use super::{Corner, Segment};

    /// Right ear tip angle at 26, between 25 and 27.
    pub const RIGHT_TIP: Corner = Corner::new(26, 25, 27);
    /// Left ear tip angle at 27, between 28 and 26.
    pub const LEFT_TIP: Corner = Corner::new(27, 28, 26);

    /// Ear base line, as the vector 22 -> 31.
    pub const BASE_LINE: Segment = Segment::new(22, 31);
    /// Left ear vertical, as the vector 30 -> 31.
    pub const LEFT_VERTICAL: Segment = Segment::new(30, 31);
    /// Right ear vertical, as the vector 23 -> 22.
    pub const RIGHT_VERTICAL: Segment = Segment::new(23, 22);
}

pub mod muzzle {
    use super::Segment;

    pub const LEFT_WIDTH: Segment = Segment::new(32, 44);
    pub const RIGHT_WIDTH: Segment = Segment::new(35, 45);
    pub const LEFT_HEIGHT: Segment = Segment::new(21, 42);
    pub const RIGHT_HEIGHT: Segment = Segment::new(19, 43);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NUM_LANDMARKS;

    #[test]
    fn all_indices_are_in_schema() {
        let segments = [
            INTER_OCULAR,
            eyes::LEFT_HORIZONTAL,
            eyes::LEFT_VERTICAL,
            eyes::RIGHT_HORIZONTAL,
            eyes::RIGHT_VERTICAL,
            ears::BASE_LINE,
            ears::LEFT_VERTICAL,
            ears::RIGHT_VERTICAL,
            muzzle::LEFT_WIDTH,
            muzzle::RIGHT_WIDTH,
            muzzle::LEFT_HEIGHT,
            muzzle::RIGHT_HEIGHT,
        ];
        for s in segments {
            assert!(s.from < NUM_LANDMARKS && s.to < NUM_LANDMARKS, "{s:?}");
        }
        for c in [ears::RIGHT_TIP, ears::LEFT_TIP] {
            assert!(c.apex < NUM_LANDMARKS && c.a < NUM_LANDMARKS && c.b < NUM_LANDMARKS);
        }
    }
}
