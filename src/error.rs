//! Error types for plate location and recognition.

use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the locator, the text extractor and the debug dump.
#[derive(Error, Debug)]
pub enum PlateError {
    /// The input path did not resolve to a loadable image.
    #[error("Could not load image from {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failure inside the OCR engine, passed through unchanged.
    #[error(transparent)]
    Recognition(Box<dyn StdError + Send + Sync>),

    #[error(
        "OCR models not found. Please run: ocrs-cli --help (or download models manually)\n\
         Expected locations:\n  - {}\n  - {}",
        .detection.display(),
        .recognition.display()
    )]
    ModelsNotFound {
        detection: PathBuf,
        recognition: PathBuf,
    },

    #[error("failed to load OCR model {}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The models loaded but the engine could not be built from them.
    #[error("failed to initialize OCR engine: {0}")]
    EngineSetup(#[source] Box<dyn StdError + Send + Sync>),

    #[error("failed to save debug image")]
    DebugOutput(#[source] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PlateError {
    /// Wrap an error raised by the OCR primitive.
    pub fn recognition(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Recognition(err.into())
    }

    /// True for failures that come from reading the input image.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
