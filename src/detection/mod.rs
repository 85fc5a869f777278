pub mod contours;
pub mod ocr;
pub mod plates;
pub mod preprocessing;
pub mod steps;

use image::{DynamicImage, GrayImage, ImageReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{CandidateOrder, LocatorConfig};
use crate::error::PlateError;
use crate::models::{CandidateRegion, Contour, PlateReading};
use crate::pipeline::Pipeline;
use ocr::TextRecognizer;
use steps::*;

/// Decode an image file, failing explicitly when it cannot be loaded.
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage, PlateError> {
    let path = path.as_ref();
    let decode_error = |source: image::ImageError| PlateError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let img = ImageReader::open(path)
        .map_err(|e| decode_error(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_error(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)?;

    debug!(path = %path.display(), width = img.width(), height = img.height(), "image loaded");
    Ok(img)
}

/// Build the standard locator pipeline for `config`
pub fn build_standard_pipeline(config: &LocatorConfig) -> Pipeline {
    Pipeline::new()
        .add_step(Arc::new(GrayscaleStep))
        .add_step(Arc::new(BlurStep {
            kernel_size: config.blur_kernel_size,
            sigma: config.blur_sigma,
        }))
        .add_step(Arc::new(EdgeDetectionStep {
            low_threshold: config.canny_low,
            high_threshold: config.canny_high,
        }))
        .add_step(Arc::new(ContourDetectionStep {
            ring_tolerance: config.ring_tolerance,
        }))
        .add_step(Arc::new(PlateFilterStep {
            geometry: config.geometry,
        }))
        .add_step(Arc::new(CropStep))
}

/// Proposes plate-shaped regions of a photo
#[derive(Clone)]
pub struct PlateLocator {
    config: LocatorConfig,
    pipeline: Pipeline,
}

impl PlateLocator {
    pub fn new(config: LocatorConfig) -> Self {
        let pipeline = build_standard_pipeline(&config);
        Self { config, pipeline }
    }

    /// Dump every intermediate image under `output_dir` (must be empty or absent)
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self, PlateError> {
        self.pipeline = self.pipeline.with_debug(output_dir)?;
        Ok(self)
    }

    /// Find candidate plate regions, cropped from the original image.
    ///
    /// With [`CandidateOrder::Detection`] the order is whatever contour
    /// extraction yields; it carries no spatial meaning.
    pub fn locate(&self, img: &DynamicImage) -> Result<Vec<CandidateRegion>, PlateError> {
        let data = self.pipeline.run(img)?;

        let mut candidates: Vec<CandidateRegion> = data
            .into_iter()
            .filter_map(|item| {
                item.bbox.map(|bbox| CandidateRegion {
                    bbox,
                    image: item.image,
                })
            })
            .collect();

        if self.config.order == CandidateOrder::TopLeft {
            candidates.sort_by_key(|c| (c.bbox.y, c.bbox.x));
        }

        info!(candidates = candidates.len(), "plate location finished");
        Ok(candidates)
    }

    /// Edge map used for contour extraction (for debugging)
    pub fn edge_map(&self, img: &DynamicImage) -> GrayImage {
        let gray = preprocessing::to_grayscale(img);
        let blurred = preprocessing::apply_blur(&gray, self.config.blur_kernel_size, self.config.blur_sigma);
        preprocessing::detect_edges(&blurred, self.config.canny_low, self.config.canny_high)
    }

    /// All contours of the edge map, before edge rings are merged and filtered (for debugging)
    pub fn contours(&self, img: &DynamicImage) -> Vec<Contour> {
        contours::find_contours(&self.edge_map(img))
    }
}

impl Default for PlateLocator {
    fn default() -> Self {
        Self::new(LocatorConfig::default())
    }
}

/// Runs the locator, then the recognizer on each candidate, preserving order
pub struct PlateReader<R> {
    locator: PlateLocator,
    recognizer: R,
}

impl<R: TextRecognizer> PlateReader<R> {
    pub fn new(locator: PlateLocator, recognizer: R) -> Self {
        Self { locator, recognizer }
    }

    /// Read every candidate in `img`. The result has one entry per candidate,
    /// in locate order, including empty texts.
    pub fn read_image(&self, img: &DynamicImage) -> Result<Vec<PlateReading>, PlateError> {
        let candidates = self.locator.locate(img)?;

        let mut readings = Vec::with_capacity(candidates.len());
        for (i, candidate) in candidates.iter().enumerate() {
            let text = self.recognizer.recognize(&candidate.image)?;
            debug!(index = i + 1, total = candidates.len(), text = %text, "recognized candidate");
            readings.push(PlateReading {
                bbox: candidate.bbox,
                text,
            });
        }

        Ok(readings)
    }

    /// Load `path` and read it
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<Vec<PlateReading>, PlateError> {
        let img = load_image(path)?;
        self.read_image(&img)
    }

    /// Texts only, aligned with the candidates of `path`
    pub fn read_texts(&self, path: impl AsRef<Path>) -> Result<Vec<String>, PlateError> {
        Ok(self
            .read_path(path)?
            .into_iter()
            .map(|reading| reading.text)
            .collect())
    }
}
