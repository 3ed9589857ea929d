use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Label record error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("Missing {kind}: {}", path.display())]
    MissingResource { kind: &'static str, path: PathBuf },
}

impl Error {
    /// Per-item errors are skipped in batch runs; everything else aborts.
    pub fn is_item_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_)
                | Error::LandmarkCount { .. }
                | Error::Json(_)
                | Error::Image(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
