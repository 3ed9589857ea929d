//! Rule-based pain indicators from facial landmark geometry.
//!
//! Each anatomical region (eyes, ears, muzzle) is measured from a fixed set of
//! landmarks and mapped onto a [`SubScore`] through an ordered threshold
//! ladder: the first matching rule wins. Geometry that falls outside the range
//! the ladders expect yields [`SubScore::Indeterminate`] instead of a level.
//!
//! All classifiers take pixel-space landmarks. The ratios are unitless, but
//! normalizing x and y independently would distort them.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::anatomy::{ears as ear_idx, eyes as eye_idx, muzzle as muzzle_idx, Segment};
use crate::geometry::angle_between;
use crate::types::{LandmarkSet, Pixel};

/// Denominators below this length are treated as collapsed geometry.
const MIN_SEGMENT_LENGTH: f32 = 1e-6;

/// Ordinal pain indicator for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PainLevel {
    None = 0,
    Moderate = 1,
    Marked = 2,
}

impl PainLevel {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Outcome of one region classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubScore {
    /// Geometry outside the range the ladder expects.
    Indeterminate,
    Scored(PainLevel),
}

impl SubScore {
    /// Integer code: -1 for indeterminate, otherwise the level (0..=2).
    pub fn code(self) -> i8 {
        match self {
            SubScore::Indeterminate => -1,
            SubScore::Scored(level) => level as i8,
        }
    }

    pub fn level(self) -> Option<PainLevel> {
        match self {
            SubScore::Indeterminate => None,
            SubScore::Scored(level) => Some(level),
        }
    }

    pub fn is_indeterminate(self) -> bool {
        self == SubScore::Indeterminate
    }
}

impl Serialize for SubScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

/// Drops NaN and infinite measurements, which no ladder can place.
fn finite(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite())
}

fn ratio(landmarks: &LandmarkSet<Pixel>, numerator: Segment, denominator: Segment) -> Option<f32> {
    let num = finite(Some(numerator.length(landmarks)))?;
    let den = finite(Some(denominator.length(landmarks)))?;
    if den < MIN_SEGMENT_LENGTH {
        return None;
    }
    finite(Some(num / den))
}

// === Eyes ===

/// Eyelid opening: vertical over horizontal eyelid distance, per eye.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EyeMeasurements {
    pub left_ratio: Option<f32>,
    pub right_ratio: Option<f32>,
}

impl EyeMeasurements {
    pub fn measure(landmarks: &LandmarkSet<Pixel>) -> Self {
        let m = Self {
            left_ratio: ratio(landmarks, eye_idx::LEFT_VERTICAL, eye_idx::LEFT_HORIZONTAL),
            right_ratio: ratio(landmarks, eye_idx::RIGHT_VERTICAL, eye_idx::RIGHT_HORIZONTAL),
        };
        debug!(left = ?m.left_ratio, right = ?m.right_ratio, "eye opening ratios");
        m
    }

    /// The more closed eye dominates.
    pub fn min_ratio(&self) -> Option<f32> {
        Some(finite(self.left_ratio)?.min(finite(self.right_ratio)?))
    }

    pub fn classify(&self) -> SubScore {
        let Some(r) = self.min_ratio() else {
            return SubScore::Indeterminate;
        };
        if r > 1.0 {
            SubScore::Indeterminate
        } else if r > 0.7 {
            SubScore::Scored(PainLevel::None)
        } else if r >= 0.5 {
            SubScore::Scored(PainLevel::Moderate)
        } else {
            SubScore::Scored(PainLevel::Marked)
        }
    }
}

/// Eye narrowing score.
pub fn eyes(landmarks: &LandmarkSet<Pixel>) -> SubScore {
    EyeMeasurements::measure(landmarks).classify()
}

// === Ears ===

/// Ear tip angles and ear-to-baseline angles, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EarMeasurements {
    pub left_angle: Option<f32>,
    pub right_angle: Option<f32>,
    pub left_vertical_angle: Option<f32>,
    pub right_vertical_angle: Option<f32>,
}

impl EarMeasurements {
    pub fn measure(landmarks: &LandmarkSet<Pixel>) -> Self {
        let base = ear_idx::BASE_LINE.vector(landmarks);
        let vertical = |s: Segment| angle_between(base, s.vector(landmarks));

        let m = Self {
            left_angle: ear_idx::LEFT_TIP.angle(landmarks),
            right_angle: ear_idx::RIGHT_TIP.angle(landmarks),
            left_vertical_angle: vertical(ear_idx::LEFT_VERTICAL),
            right_vertical_angle: vertical(ear_idx::RIGHT_VERTICAL),
        };
        debug!(
            left = ?m.left_angle,
            right = ?m.right_angle,
            left_vertical = ?m.left_vertical_angle,
            right_vertical = ?m.right_vertical_angle,
            "ear angles"
        );
        m
    }

    /// Rules are checked in order; the bands overlap and the first match wins.
    pub fn classify(&self) -> SubScore {
        let (Some(left), Some(right), Some(left_vert), Some(right_vert)) = (
            finite(self.left_angle),
            finite(self.right_angle),
            finite(self.left_vertical_angle),
            finite(self.right_vertical_angle),
        ) else {
            return SubScore::Indeterminate;
        };

        let min_ear = left.min(right);
        let max_vert = left_vert.max(right_vert);

        if left.max(right) < 115.0 {
            SubScore::Indeterminate
        } else if min_ear > 145.0 || max_vert < 70.0 {
            SubScore::Scored(PainLevel::Marked)
        } else if (115.0..=125.0).contains(&min_ear) || max_vert > 75.0 {
            SubScore::Scored(PainLevel::None)
        } else {
            SubScore::Scored(PainLevel::Moderate)
        }
    }
}

/// Ear position score.
pub fn ears(landmarks: &LandmarkSet<Pixel>) -> SubScore {
    EarMeasurements::measure(landmarks).classify()
}

// === Muzzle ===

/// Muzzle width over height, per side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MuzzleMeasurements {
    pub left_ratio: Option<f32>,
    pub right_ratio: Option<f32>,
}

impl MuzzleMeasurements {
    pub fn measure(landmarks: &LandmarkSet<Pixel>) -> Self {
        let m = Self {
            left_ratio: ratio(landmarks, muzzle_idx::LEFT_WIDTH, muzzle_idx::LEFT_HEIGHT),
            right_ratio: ratio(landmarks, muzzle_idx::RIGHT_WIDTH, muzzle_idx::RIGHT_HEIGHT),
        };
        debug!(left = ?m.left_ratio, right = ?m.right_ratio, "muzzle ratios");
        m
    }

    /// The more tense side dominates.
    pub fn max_ratio(&self) -> Option<f32> {
        Some(finite(self.left_ratio)?.max(finite(self.right_ratio)?))
    }

    pub fn classify(&self) -> SubScore {
        let Some(r) = self.max_ratio() else {
            return SubScore::Indeterminate;
        };
        if r > 2.0 {
            SubScore::Scored(PainLevel::Marked)
        } else if r > 1.5 {
            SubScore::Scored(PainLevel::Moderate)
        } else if r < 0.8 {
            SubScore::Indeterminate
        } else {
            SubScore::Scored(PainLevel::None)
        }
    }
}

/// Muzzle tension score.
pub fn muzzle(landmarks: &LandmarkSet<Pixel>) -> SubScore {
    MuzzleMeasurements::measure(landmarks).classify()
}
