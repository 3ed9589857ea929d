//! # feline-face
//!
//! Evaluation and interpretation of cat facial landmarks.
//!
//! This crate provides:
//! - **Landmark Sets**: the 48-point cat face schema, typed by coordinate
//!   space ([`Pixel`] or [`Normalized`]) so the two cannot be mixed
//! - **NME Evaluation**: per-image normalized mean error against labelled
//!   ground truth, plus batch statistics and IQR outlier detection
//! - **Pain Scoring**: rule-based eye, ear and muzzle indicators computed from
//!   landmark geometry, combined into a [`PainReport`]
//!
//! The landmark model itself is external. Plug it in through
//! [`LandmarkPredictor`], or read its stored output with [`RecordPredictor`].
//!
//! ## Normalized Mean Error
//!
//! 1. Divide x by image width and y by image height for prediction and
//!    ground truth
//! 2. Take the ground-truth distance between eye corners 8 and 11 as the
//!    face scale, floored at 1e-5
//! 3. Each landmark error is the point distance divided by that scale
//! 4. NME is the mean landmark error
//!
//! ## Quick Start
//!
//! ```rust
//! use feline_face::{ErrorReport, ImageSize, LandmarkSet, PainReport, Pixel, Point};
//!
//! let points: Vec<Point> = (0..48)
//!     .map(|i| Point::new(10.0 + (i % 8) as f32 * 12.0, 20.0 + (i / 8) as f32 * 15.0))
//!     .collect();
//! let ground_truth = LandmarkSet::<Pixel>::from_points(points.clone()).unwrap();
//! let predicted = LandmarkSet::<Pixel>::from_points(
//!     points.iter().map(|&p| p + Point::new(1.0, 0.0)).collect(),
//! )
//! .unwrap();
//!
//! let size = ImageSize::new(128, 128).unwrap();
//! let report = ErrorReport::evaluate("cat.png", &predicted, &ground_truth, size);
//! println!("NME = {:.4} ({:?})", report.nme(), report.band());
//!
//! let pain = PainReport::assess(&predicted);
//! println!("{pain}");
//! ```

pub mod anatomy;
pub mod dataset;
mod error;
pub mod evaluation;
pub mod geometry;
mod metrics;
pub mod pain;
mod predictor;
mod report;
pub mod stats;
mod types;

pub use dataset::{DatasetLayout, LabelRecord};
pub use error::{Error, Result};
pub use evaluation::{evaluate_dataset, score_records, Evaluation, PainBatch};
pub use metrics::{inter_ocular_distance, nme, ErrorReport, NmeBand, MIN_INTER_OCULAR_DISTANCE};
pub use pain::{ears, eyes, muzzle, PainLevel, SubScore};
pub use predictor::{LandmarkPredictor, RecordPredictor};
pub use report::{Axis, AxisTally, Measurements, PainReport, PainSummary};
pub use stats::BatchSummary;
pub use types::{ImageSize, LandmarkSet, Normalized, Pixel, Point, Space, NUM_LANDMARKS};
