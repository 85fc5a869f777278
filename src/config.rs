//! Calibration constants and configuration for the plate locator and the OCR
//! binding.
//!
//! The geometric bounds are empirical: they were tuned for typical plate
//! proportions at the pixel scale of ordinary street photos. They are not
//! derived from image size.

use std::path::{Path, PathBuf};

/// Side length of the square Gaussian kernel applied before edge detection.
pub const BLUR_KERNEL_SIZE: u32 = 5;
/// Sigma of the Gaussian kernel. Zero derives it from the kernel size.
pub const BLUR_SIGMA: f32 = 0.0;
/// Lower hysteresis threshold for Canny.
pub const CANNY_LOW_THRESHOLD: f32 = 100.0;
/// Upper hysteresis threshold for Canny.
pub const CANNY_HIGH_THRESHOLD: f32 = 200.0;
/// Exclusive lower bound on width / height.
pub const MIN_ASPECT_RATIO: f32 = 2.0;
/// Exclusive upper bound on width / height.
pub const MAX_ASPECT_RATIO: f32 = 6.0;
/// Exclusive lower bound on width * height, in pixels.
pub const MIN_PLATE_AREA: u64 = 1000;
/// Exclusive upper bound on width * height, in pixels.
pub const MAX_PLATE_AREA: u64 = 15000;
/// Max inset, per side, of a hole border that just retraces its parent edge line.
pub const RING_TOLERANCE: u32 = 3;

/// Aspect ratio and area bounds a bounding box must fall strictly inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateGeometry {
    pub min_aspect: f32,
    pub max_aspect: f32,
    pub min_area: u64,
    pub max_area: u64,
}

impl Default for PlateGeometry {
    fn default() -> Self {
        Self {
            min_aspect: MIN_ASPECT_RATIO,
            max_aspect: MAX_ASPECT_RATIO,
            min_area: MIN_PLATE_AREA,
            max_area: MAX_PLATE_AREA,
        }
    }
}

/// Order in which located candidates are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateOrder {
    /// Whatever order contour extraction yields. Not stable across library versions.
    #[default]
    Detection,
    /// Sorted by the top-left corner, row first.
    TopLeft,
}

/// Tunable parameters of the plate locator.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatorConfig {
    pub blur_kernel_size: u32,
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub geometry: PlateGeometry,
    pub ring_tolerance: u32,
    pub order: CandidateOrder,
}

impl LocatorConfig {
    pub fn new() -> Self {
        Self {
            blur_kernel_size: BLUR_KERNEL_SIZE,
            blur_sigma: BLUR_SIGMA,
            canny_low: CANNY_LOW_THRESHOLD,
            canny_high: CANNY_HIGH_THRESHOLD,
            geometry: PlateGeometry::default(),
            ring_tolerance: RING_TOLERANCE,
            order: CandidateOrder::Detection,
        }
    }

    pub fn with_order(mut self, order: CandidateOrder) -> Self {
        self.order = order;
        self
    }
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Paths of the two `.rten` models used by the OCR engine.
#[derive(Debug, Clone)]
pub struct OcrModelConfig {
    detection_model: PathBuf,
    recognition_model: PathBuf,
}

impl OcrModelConfig {
    pub fn new(detection_model: impl AsRef<Path>, recognition_model: impl AsRef<Path>) -> Self {
        Self {
            detection_model: detection_model.as_ref().to_path_buf(),
            recognition_model: recognition_model.as_ref().to_path_buf(),
        }
    }

    /// Models in the `ocrs-cli` download cache (`~/.cache/ocrs`).
    pub fn from_cache_dir() -> Self {
        let home_dir = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_default();
        Self::in_dir(Path::new(&home_dir).join(".cache/ocrs"))
    }

    /// `text-detection.rten` and `text-recognition.rten` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(
            dir.join("text-detection.rten"),
            dir.join("text-recognition.rten"),
        )
    }

    pub fn with_detection_model(mut self, path: impl AsRef<Path>) -> Self {
        self.detection_model = path.as_ref().to_path_buf();
        self
    }

    pub fn with_recognition_model(mut self, path: impl AsRef<Path>) -> Self {
        self.recognition_model = path.as_ref().to_path_buf();
        self
    }

    pub fn detection_model(&self) -> &Path {
        &self.detection_model
    }

    pub fn recognition_model(&self) -> &Path {
        &self.recognition_model
    }
}

impl Default for OcrModelConfig {
    fn default() -> Self {
        Self::from_cache_dir()
    }
}
