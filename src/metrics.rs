//! Landmark prediction error metrics.
//!
//! Errors are measured in normalized image space (x / width, y / height) and
//! then divided by the ground-truth inter-ocular distance, which makes the
//! normalized mean error (NME) independent of image resolution.

use serde::Serialize;

use crate::anatomy::INTER_OCULAR;
use crate::types::{ImageSize, LandmarkSet, Normalized, Pixel, NUM_LANDMARKS};

/// Floor for the inter-ocular distance, for faces whose eye corners coincide.
pub const MIN_INTER_OCULAR_DISTANCE: f32 = 1e-5;

/// Inter-ocular distance of a normalized ground-truth set, floored at
/// [`MIN_INTER_OCULAR_DISTANCE`].
pub fn inter_ocular_distance(ground_truth: &LandmarkSet<Normalized>) -> f32 {
    INTER_OCULAR
        .length(ground_truth)
        .max(MIN_INTER_OCULAR_DISTANCE)
}

/// NME of a prediction against its ground truth, both in pixel space.
pub fn nme(predicted: &LandmarkSet<Pixel>, ground_truth: &LandmarkSet<Pixel>, size: ImageSize) -> f32 {
    ErrorReport::evaluate("", predicted, ground_truth, size).nme()
}

/// Quality band of a single NME value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NmeBand {
    /// NME < 0.5
    Excellent,
    /// 0.5 <= NME < 1.0
    Good,
    /// 1.0 <= NME < 2.0
    Fair,
    /// NME >= 2.0
    Poor,
}

impl NmeBand {
    pub const ALL: [NmeBand; 4] = [NmeBand::Excellent, NmeBand::Good, NmeBand::Fair, NmeBand::Poor];

    pub fn classify(nme: f32) -> Self {
        if nme < 0.5 {
            NmeBand::Excellent
        } else if nme < 1.0 {
            NmeBand::Good
        } else if nme < 2.0 {
            NmeBand::Fair
        } else {
            NmeBand::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NmeBand::Excellent => "Excellent (NME < 0.5)",
            NmeBand::Good => "Good (0.5 <= NME < 1.0)",
            NmeBand::Fair => "Fair (1.0 <= NME < 2.0)",
            NmeBand::Poor => "Poor (NME >= 2.0)",
        }
    }
}

/// Error breakdown for one evaluated image.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    image: String,
    image_size: ImageSize,
    /// Mean of `errors`
    nme: f32,
    /// Mean point distance in normalized space, before inter-ocular scaling
    mean_error: f32,
    max_landmark_error: f32,
    min_landmark_error: f32,
    /// Population standard deviation of `errors`
    std_error: f32,
    /// Per-landmark errors divided by the inter-ocular distance
    errors: Vec<f32>,
}

impl ErrorReport {
    /// Evaluate a pixel-space prediction against its pixel-space ground truth.
    pub fn evaluate(
        image: impl Into<String>,
        predicted: &LandmarkSet<Pixel>,
        ground_truth: &LandmarkSet<Pixel>,
        size: ImageSize,
    ) -> Self {
        Self::from_normalized(
            image,
            &predicted.normalize(size),
            &ground_truth.normalize(size),
            size,
        )
    }

    /// Evaluate sets that are already in normalized space.
    pub fn from_normalized(
        image: impl Into<String>,
        predicted: &LandmarkSet<Normalized>,
        ground_truth: &LandmarkSet<Normalized>,
        size: ImageSize,
    ) -> Self {
        let eye_dist = inter_ocular_distance(ground_truth);

        let raw: Vec<f32> = predicted
            .iter()
            .zip(ground_truth.iter())
            .map(|(p, g)| p.distance(g))
            .collect();
        let errors: Vec<f32> = raw.iter().map(|e| e / eye_dist).collect();

        let n = NUM_LANDMARKS as f32;
        let nme = errors.iter().sum::<f32>() / n;
        let variance = errors.iter().map(|e| (e - nme).powi(2)).sum::<f32>() / n;

        Self {
            image: image.into(),
            image_size: size,
            nme,
            mean_error: raw.iter().sum::<f32>() / n,
            max_landmark_error: errors.iter().copied().fold(f32::MIN, f32::max),
            min_landmark_error: errors.iter().copied().fold(f32::MAX, f32::min),
            std_error: variance.sqrt(),
            errors,
        }
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn image_size(&self) -> ImageSize {
        self.image_size
    }

    pub fn nme(&self) -> f32 {
        self.nme
    }

    pub fn mean_error(&self) -> f32 {
        self.mean_error
    }

    pub fn max_landmark_error(&self) -> f32 {
        self.max_landmark_error
    }

    pub fn min_landmark_error(&self) -> f32 {
        self.min_landmark_error
    }

    pub fn std_error(&self) -> f32 {
        self.std_error
    }

    pub fn errors(&self) -> &[f32] {
        &self.errors
    }

    pub fn band(&self) -> NmeBand {
        NmeBand::classify(self.nme)
    }
}
