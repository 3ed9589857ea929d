//! Combines the three regional sub-scores into a per-image pain report, and
//! tallies reports across a batch.

use std::fmt;

use serde::Serialize;

use crate::pain::{EarMeasurements, EyeMeasurements, MuzzleMeasurements, PainLevel, SubScore};
use crate::types::{LandmarkSet, Pixel};

/// Anatomical region a sub-score is computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Eyes,
    Ears,
    Muzzle,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Eyes, Axis::Ears, Axis::Muzzle];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Eyes => "eyes",
            Axis::Ears => "ears",
            Axis::Muzzle => "muzzle",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurements {
    pub eyes: EyeMeasurements,
    pub ears: EarMeasurements,
    pub muzzle: MuzzleMeasurements,
}

/// Pain assessment of one face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PainReport {
    pub eyes: SubScore,
    pub ears: SubScore,
    pub muzzle: SubScore,
    /// Set when any sub-score is indeterminate.
    pub error: bool,
    pub measurements: Measurements,
}

impl PainReport {
    pub fn assess(landmarks: &LandmarkSet<Pixel>) -> Self {
        let measurements = Measurements {
            eyes: EyeMeasurements::measure(landmarks),
            ears: EarMeasurements::measure(landmarks),
            muzzle: MuzzleMeasurements::measure(landmarks),
        };
        Self::from_measurements(measurements)
    }

    pub fn from_measurements(measurements: Measurements) -> Self {
        let eyes = measurements.eyes.classify();
        let ears = measurements.ears.classify();
        let muzzle = measurements.muzzle.classify();
        Self {
            eyes,
            ears,
            muzzle,
            error: eyes.is_indeterminate() || ears.is_indeterminate() || muzzle.is_indeterminate(),
            measurements,
        }
    }

    pub fn score(&self, axis: Axis) -> SubScore {
        match axis {
            Axis::Eyes => self.eyes,
            Axis::Ears => self.ears,
            Axis::Muzzle => self.muzzle,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn indeterminate_axes(&self) -> Vec<Axis> {
        Axis::ALL
            .into_iter()
            .filter(|&axis| self.score(axis).is_indeterminate())
            .collect()
    }

    /// Sum of the three levels (0..=6), only when every region was scored.
    pub fn total(&self) -> Option<u8> {
        Axis::ALL
            .iter()
            .map(|&axis| self.score(axis).level().map(PainLevel::value))
            .sum()
    }
}

impl fmt::Display for PainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "eye score: {}, ears score: {}, muzzle score: {}",
            self.eyes.code(),
            self.ears.code(),
            self.muzzle.code()
        )?;
        if self.error {
            let axes: Vec<String> = self.indeterminate_axes().iter().map(Axis::to_string).collect();
            write!(f, " [ERROR: indeterminate {}]", axes.join(", "))?;
        }
        Ok(())
    }
}

/// Per-region tally of sub-scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AxisTally {
    pub indeterminate: usize,
    pub none: usize,
    pub moderate: usize,
    pub marked: usize,
}

impl AxisTally {
    fn add(&mut self, score: SubScore) {
        match score {
            SubScore::Indeterminate => self.indeterminate += 1,
            SubScore::Scored(PainLevel::None) => self.none += 1,
            SubScore::Scored(PainLevel::Moderate) => self.moderate += 1,
            SubScore::Scored(PainLevel::Marked) => self.marked += 1,
        }
    }
}

/// Counts over many pain reports, so indeterminate results stay visible per
/// region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PainSummary {
    pub total: usize,
    pub errors: usize,
    pub eyes: AxisTally,
    pub ears: AxisTally,
    pub muzzle: AxisTally,
}

impl PainSummary {
    pub fn add(&mut self, report: &PainReport) {
        self.total += 1;
        if report.is_error() {
            self.errors += 1;
        }
        self.eyes.add(report.eyes);
        self.ears.add(report.ears);
        self.muzzle.add(report.muzzle);
    }

    pub fn tally(&self, axis: Axis) -> &AxisTally {
        match axis {
            Axis::Eyes => &self.eyes,
            Axis::Ears => &self.ears,
            Axis::Muzzle => &self.muzzle,
        }
    }
}

impl<'a> FromIterator<&'a PainReport> for PainSummary {
    fn from_iter<I: IntoIterator<Item = &'a PainReport>>(iter: I) -> Self {
        let mut summary = Self::default();
        for report in iter {
            summary.add(report);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements(eye_ratio: f32, ear_angle: f32, muzzle_ratio: f32) -> Measurements {
        Measurements {
            eyes: EyeMeasurements {
                left_ratio: Some(eye_ratio),
                right_ratio: Some(eye_ratio),
            },
            ears: EarMeasurements {
                left_angle: Some(ear_angle),
                right_angle: Some(ear_angle),
                left_vertical_angle: Some(72.0),
                right_vertical_angle: Some(72.0),
            },
            muzzle: MuzzleMeasurements {
                left_ratio: Some(muzzle_ratio),
                right_ratio: Some(muzzle_ratio),
            },
        }
    }

    #[test]
    fn all_scored() {
        let report = PainReport::from_measurements(measurements(0.4, 130.0, 1.0));
        assert_eq!(report.eyes, SubScore::Scored(PainLevel::Marked));
        assert_eq!(report.ears, SubScore::Scored(PainLevel::Moderate));
        assert_eq!(report.muzzle, SubScore::Scored(PainLevel::None));
        assert!(!report.is_error());
        assert!(report.indeterminate_axes().is_empty());
        assert_eq!(report.total(), Some(3));
        assert_eq!(report.to_string(), "eye score: 2, ears score: 1, muzzle score: 0");
    }

    #[test]
    fn indeterminate_sets_error_flag() {
        let report = PainReport::from_measurements(measurements(1.2, 100.0, 1.0));
        assert!(report.is_error());
        assert_eq!(report.indeterminate_axes(), vec![Axis::Eyes, Axis::Ears]);
        assert_eq!(report.total(), None);
        assert!(report.to_string().ends_with("[ERROR: indeterminate eyes, ears]"));
    }

    #[test]
    fn summary_counts_per_axis() {
        let reports = [
            PainReport::from_measurements(measurements(0.8, 130.0, 1.0)),
            PainReport::from_measurements(measurements(1.2, 130.0, 0.5)),
            PainReport::from_measurements(measurements(0.6, 150.0, 2.5)),
        ];
        let summary: PainSummary = reports.iter().collect();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.eyes.indeterminate, 1);
        assert_eq!(summary.eyes.none, 1);
        assert_eq!(summary.eyes.moderate, 1);
        assert_eq!(summary.ears.moderate, 2);
        assert_eq!(summary.ears.marked, 1);
        assert_eq!(summary.tally(Axis::Muzzle).indeterminate, 1);
        assert_eq!(summary.muzzle.marked, 1);
    }

    #[test]
    fn report_serializes_codes() {
        let report = PainReport::from_measurements(measurements(1.2, 130.0, 1.0));
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["eyes"], -1);
        assert_eq!(json["ears"], 1);
        assert_eq!(json["error"], true);
    }
}
