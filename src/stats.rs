//! Aggregate statistics over a batch of per-image error reports.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::metrics::{ErrorReport, NmeBand};
use crate::types::NUM_LANDMARKS;

/// Percentile of `values` (p in [0, 100]) with linear interpolation between
/// the two closest ranks. Returns `None` for an empty slice.
pub fn percentile(values: &[f32], p: f32) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f32::total_cmp);
    Some(percentile_sorted(&sorted, p))
}

fn percentile_sorted(sorted: &[f32], p: f32) -> f32 {
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f32)
}

/// Upper outlier fence `Q3 + 1.5 * (Q3 - Q1)`.
pub fn outlier_threshold(values: &[f32]) -> Option<f32> {
    let q1 = percentile(values, 25.0)?;
    let q3 = percentile(values, 75.0)?;
    Some(q3 + 1.5 * (q3 - q1))
}

/// Indices of values strictly above the IQR outlier fence.
pub fn outlier_indices(values: &[f32]) -> Vec<usize> {
    let Some(threshold) = outlier_threshold(values) else {
        return Vec::new();
    };
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v > threshold)
        .map(|(i, _)| i)
        .collect()
}

fn mean(values: &[f32]) -> f32 {
    values.iter().sum::<f32>() / values.len() as f32
}

/// Population standard deviation.
fn std_dev(values: &[f32]) -> f32 {
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f32>() / values.len() as f32).sqrt()
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedImage {
    pub image: String,
    pub nme: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct BandCount {
    pub band: NmeBand,
    pub count: usize,
    pub percent: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct LandmarkError {
    pub index: usize,
    pub mean: f32,
    pub std: f32,
}

/// NME distribution, quality bands, outliers and per-landmark breakdown of
/// one evaluation run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub count: usize,
    pub mean: f32,
    pub median: f32,
    pub std: f32,
    pub min: f32,
    pub max: f32,
    pub q1: f32,
    pub q3: f32,
    pub outlier_threshold: f32,
    pub bands: Vec<BandCount>,
    /// Lowest NME first
    pub best: Vec<RankedImage>,
    /// Highest NME first
    pub worst: Vec<RankedImage>,
    /// Highest NME first
    pub outliers: Vec<RankedImage>,
    pub landmark_means: Vec<f32>,
    pub landmark_stds: Vec<f32>,
    /// Highest mean error first
    pub worst_landmarks: Vec<LandmarkError>,
    /// Lowest mean error first
    pub best_landmarks: Vec<LandmarkError>,
}

impl BatchSummary {
    /// Summarize a batch, keeping `top_k` entries in each ranked list.
    pub fn from_reports(reports: &[ErrorReport], top_k: usize) -> Result<Self> {
        if reports.is_empty() {
            return Err(Error::InvalidInput(
                "cannot summarize an empty batch".to_string(),
            ));
        }

        let values: Vec<f32> = reports.iter().map(ErrorReport::nme).collect();
        let mut sorted = values.clone();
        sorted.sort_by(f32::total_cmp);

        let q1 = percentile_sorted(&sorted, 25.0);
        let q3 = percentile_sorted(&sorted, 75.0);
        let threshold = q3 + 1.5 * (q3 - q1);

        let count = reports.len();
        let bands = NmeBand::ALL
            .iter()
            .map(|&band| {
                let n = reports.iter().filter(|r| r.band() == band).count();
                BandCount {
                    band,
                    count: n,
                    percent: n as f32 / count as f32 * 100.0,
                }
            })
            .collect();

        let mut ranked: Vec<RankedImage> = reports
            .iter()
            .map(|r| RankedImage {
                image: r.image().to_string(),
                nme: r.nme(),
            })
            .collect();
        ranked.sort_by(|a, b| a.nme.total_cmp(&b.nme));

        let best = ranked.iter().take(top_k).cloned().collect();
        let worst = ranked.iter().rev().take(top_k).cloned().collect();
        let outliers = ranked
            .iter()
            .rev()
            .take_while(|r| r.nme > threshold)
            .cloned()
            .collect();

        let mut landmark_means = Vec::with_capacity(NUM_LANDMARKS);
        let mut landmark_stds = Vec::with_capacity(NUM_LANDMARKS);
        for i in 0..NUM_LANDMARKS {
            let column: Vec<f32> = reports.iter().map(|r| r.errors()[i]).collect();
            landmark_means.push(mean(&column));
            landmark_stds.push(std_dev(&column));
        }

        let mut by_error: Vec<LandmarkError> = landmark_means
            .iter()
            .zip(&landmark_stds)
            .enumerate()
            .map(|(index, (&mean, &std))| LandmarkError { index, mean, std })
            .collect();
        by_error.sort_by(|a, b| a.mean.total_cmp(&b.mean));
        let best_landmarks = by_error.iter().take(top_k).cloned().collect();
        let worst_landmarks = by_error.iter().rev().take(top_k).cloned().collect();

        Ok(Self {
            count,
            mean: mean(&values),
            median: percentile_sorted(&sorted, 50.0),
            std: std_dev(&values),
            min: sorted[0],
            max: sorted[count - 1],
            q1,
            q3,
            outlier_threshold: threshold,
            bands,
            best,
            worst,
            outliers,
            landmark_means,
            landmark_stds,
            worst_landmarks,
            best_landmarks,
        })
    }
}
