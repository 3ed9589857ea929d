//! Landmark prediction sources.
//!
//! The landmark model runs outside this crate. Evaluation pulls its output
//! through [`LandmarkPredictor`], either from stored records or a closure.

use std::path::{Path, PathBuf};

use crate::dataset::{record_path, LabelRecord};
use crate::error::{Error, Result};
use crate::types::{LandmarkSet, Pixel};

/// Source of predicted landmarks for an image.
///
/// Implement this for your own landmark model. Predictions are returned in
/// pixel space of the given image.
pub trait LandmarkPredictor {
    fn predict(&self, image: &Path) -> Result<LandmarkSet<Pixel>>;
}

/// Reads predictions that a landmark model already wrote to disk, one
/// `<stem>.json` record per image in the label record format.
#[derive(Debug, Clone)]
pub struct RecordPredictor {
    dir: PathBuf,
}

impl RecordPredictor {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(Error::MissingResource {
                kind: "prediction directory",
                path: dir,
            });
        }
        Ok(Self { dir })
    }

    pub fn record_path(&self, image: &Path) -> PathBuf {
        record_path(&self.dir, image)
    }
}

impl LandmarkPredictor for RecordPredictor {
    fn predict(&self, image: &Path) -> Result<LandmarkSet<Pixel>> {
        let path = self.record_path(image);
        if !path.is_file() {
            return Err(Error::MissingResource {
                kind: "prediction record",
                path,
            });
        }
        LabelRecord::load(path)?.to_landmarks()
    }
}

impl<F> LandmarkPredictor for F
where
    F: Fn(&Path) -> Result<LandmarkSet<Pixel>>,
{
    fn predict(&self, image: &Path) -> Result<LandmarkSet<Pixel>> {
        self(image)
    }
}
