//! Label records and on-disk dataset layout.
//!
//! A dataset root holds `images/` (source `.png` files) and `labels/` (one
//! JSON record per image with the same file stem):
//!
//! ```json
//! { "labels": [[x0, y0], [x1, y1], ..., [x47, y47]] }
//! ```
//!
//! Label coordinates are in pixel space of the corresponding image.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{ImageSize, LandmarkSet, Pixel};

/// Landmark record as stored next to each image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub labels: Vec<[f32; 2]>,
}

impl LabelRecord {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingResource {
                kind: "label file",
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, serde_json::to_string(self)?)?;
        Ok(())
    }

    pub fn from_landmarks(landmarks: &LandmarkSet<Pixel>) -> Self {
        Self {
            labels: landmarks.to_pairs(),
        }
    }

    pub fn to_landmarks(&self) -> Result<LandmarkSet<Pixel>> {
        LandmarkSet::from_pairs(&self.labels)
    }
}

/// Read width and height from an image header without decoding pixels.
pub fn image_size<P: AsRef<Path>>(path: P) -> Result<ImageSize> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::MissingResource {
            kind: "image",
            path: path.to_path_buf(),
        });
    }
    let (width, height) = image::image_dimensions(path)?;
    ImageSize::new(width, height)
}

/// Whether a file name is a source image rather than a rendered artifact
/// (`*_landmarks.png`, `*_comparison.png`).
pub fn is_source_image(name: &str) -> bool {
    name.ends_with(".png") && !name.contains("_landmarks") && !name.contains("_comparison")
}

/// Location of images and labels for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

impl DatasetLayout {
    /// `<root>/images` and `<root>/labels`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            images_dir: root.join("images"),
            labels_dir: root.join("labels"),
        }
    }

    /// Source images sorted by file name, at most `limit` of them.
    pub fn list_images(&self, limit: Option<usize>) -> Result<Vec<PathBuf>> {
        if !self.images_dir.is_dir() {
            return Err(Error::MissingResource {
                kind: "image directory",
                path: self.images_dir.clone(),
            });
        }

        let mut images = Vec::new();
        for entry in fs::read_dir(&self.images_dir)? {
            let path = entry?.path();
            let is_source = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_source_image);
            if is_source && path.is_file() {
                images.push(path);
            }
        }
        images.sort();
        if let Some(limit) = limit {
            images.truncate(limit);
        }
        Ok(images)
    }

    /// `labels/<stem>.json` for `images/<stem>.png`.
    pub fn label_path(&self, image: &Path) -> PathBuf {
        record_path(&self.labels_dir, image)
    }
}

/// `<dir>/<stem of image>.json`.
pub(crate) fn record_path(dir: &Path, image: &Path) -> PathBuf {
    let stem = image.file_stem().unwrap_or_default().to_string_lossy();
    dir.join(format!("{stem}.json"))
}
