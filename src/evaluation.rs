//! Batch evaluation of a landmark predictor against a labelled dataset, and
//! batch pain scoring of landmark records.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::dataset::{image_size, DatasetLayout, LabelRecord};
use crate::error::{Error, Result};
use crate::metrics::ErrorReport;
use crate::predictor::LandmarkPredictor;
use crate::report::{PainReport, PainSummary};
use crate::stats::BatchSummary;

/// An image left out of the evaluation because its data was malformed.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedImage {
    pub image: String,
    pub reason: String,
}

/// Per-image reports of one evaluation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Evaluation {
    pub reports: Vec<ErrorReport>,
    pub skipped: Vec<SkippedImage>,
}

impl Evaluation {
    /// Mean NME over all evaluated images, `None` if nothing was evaluated.
    pub fn average_nme(&self) -> Option<f32> {
        if self.reports.is_empty() {
            return None;
        }
        Some(self.reports.iter().map(ErrorReport::nme).sum::<f32>() / self.reports.len() as f32)
    }

    pub fn summary(&self, top_k: usize) -> Result<BatchSummary> {
        BatchSummary::from_reports(&self.reports, top_k)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Evaluate a single image against its label record.
pub fn evaluate_image<P: LandmarkPredictor + ?Sized>(
    predictor: &P,
    image: &Path,
    label: &Path,
) -> Result<ErrorReport> {
    let ground_truth = LabelRecord::load(label)?.to_landmarks()?;
    let predicted = predictor.predict(image)?;
    let size = image_size(image)?;
    Ok(ErrorReport::evaluate(
        display_name(image),
        &predicted,
        &ground_truth,
        size,
    ))
}

/// Evaluate the first `limit` source images of a dataset (all when `None`).
///
/// Images with malformed landmarks or dimensions are skipped and recorded;
/// missing labels, predictions or images abort the run.
pub fn evaluate_dataset<P: LandmarkPredictor + ?Sized>(
    layout: &DatasetLayout,
    predictor: &P,
    limit: Option<usize>,
) -> Result<Evaluation> {
    let images: Vec<PathBuf> = layout.list_images(limit)?;
    info!(count = images.len(), dir = %layout.images_dir.display(), "evaluating images");

    let mut evaluation = Evaluation::default();
    for image in &images {
        let label = layout.label_path(image);
        match evaluate_image(predictor, image, &label) {
            Ok(report) => {
                info!(image = report.image(), nme = report.nme(), "evaluated");
                evaluation.reports.push(report);
            }
            Err(e) if e.is_item_error() => {
                warn!(image = %image.display(), error = %e, "skipping image");
                evaluation.skipped.push(SkippedImage {
                    image: display_name(image),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    if let Some(avg) = evaluation.average_nme() {
        info!(average_nme = avg, skipped = evaluation.skipped.len(), "evaluation finished");
    }
    Ok(evaluation)
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredImage {
    pub image: String,
    pub report: PainReport,
}

/// Pain reports for a directory of pixel-space landmark records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PainBatch {
    pub scored: Vec<ScoredImage>,
    pub skipped: Vec<SkippedImage>,
    pub summary: PainSummary,
}

/// Score every `*.json` landmark record in `dir`, in file name order.
pub fn score_records(dir: &Path) -> Result<PainBatch> {
    if !dir.is_dir() {
        return Err(Error::MissingResource {
            kind: "landmark directory",
            path: dir.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "json") {
            records.push(path);
        }
    }
    records.sort();

    let mut batch = PainBatch::default();
    for path in &records {
        match LabelRecord::load(path).and_then(|r| r.to_landmarks()) {
            Ok(landmarks) => {
                let report = PainReport::assess(&landmarks);
                if report.is_error() {
                    warn!(
                        record = %path.display(),
                        axes = ?report.indeterminate_axes(),
                        "indeterminate pain score"
                    );
                }
                batch.summary.add(&report);
                batch.scored.push(ScoredImage {
                    image: display_name(path),
                    report,
                });
            }
            Err(e) if e.is_item_error() => {
                warn!(record = %path.display(), error = %e, "skipping record");
                batch.skipped.push(SkippedImage {
                    image: display_name(path),
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        scored = batch.summary.total,
        indeterminate = batch.summary.errors,
        skipped = batch.skipped.len(),
        "scoring finished"
    );
    Ok(batch)
}
