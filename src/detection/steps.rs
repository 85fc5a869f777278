use crate::config::PlateGeometry;
use crate::detection::{contours, preprocessing};
use crate::models::extract_roi;
use crate::pipeline::{PipelineContext, PipelineData, PipelineStep, Result};
use image::DynamicImage;
use tracing::{debug, trace};

/// Convert image to grayscale
pub struct GrayscaleStep;

impl PipelineStep for GrayscaleStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let gray = preprocessing::to_grayscale(&item.image);
                item.with_image(DynamicImage::ImageLuma8(gray))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Grayscale Conversion"
    }
}

/// Apply a fixed-size Gaussian blur
pub struct BlurStep {
    pub kernel_size: u32,
    pub sigma: f32,
}

impl PipelineStep for BlurStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let gray = item.image.to_luma8();
                let blurred = preprocessing::apply_blur(&gray, self.kernel_size, self.sigma);
                item.with_image(DynamicImage::ImageLuma8(blurred))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Gaussian Blur"
    }
}

/// Detect edges using Canny
pub struct EdgeDetectionStep {
    pub low_threshold: f32,
    pub high_threshold: f32,
}

impl PipelineStep for EdgeDetectionStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        Ok(data
            .iter()
            .map(|item| {
                let gray = item.image.to_luma8();
                let edges = preprocessing::detect_edges(&gray, self.low_threshold, self.high_threshold);
                item.with_image(DynamicImage::ImageLuma8(edges))
            })
            .collect())
    }

    fn name(&self) -> &str {
        "Edge Detection"
    }
}

/// Find contours in the edge map - splits one image into one item per outline.
/// Each item carries the outline's bounding box. Its image is the matching
/// edge-map crop when debugging and an empty placeholder otherwise; the crop
/// step replaces it either way.
pub struct ContourDetectionStep {
    pub ring_tolerance: u32,
}

impl PipelineStep for ContourDetectionStep {
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let edges = item.image.to_luma8();
            let found = contours::find_contours(&edges);
            debug!(contours = found.len(), "extracted contours");

            for bbox in contours::outline_boxes(&found, self.ring_tolerance) {
                let image = match context.debug {
                    Some(_) => extract_roi(&item.image, &bbox).unwrap_or_else(placeholder),
                    None => placeholder(),
                };
                result.push(PipelineData::from_region(image, item.original.clone(), bbox));
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Contour Detection"
    }
}

fn placeholder() -> DynamicImage {
    DynamicImage::new_luma8(0, 0)
}

/// Keep regions whose bounding box has plate-like proportions
pub struct PlateFilterStep {
    pub geometry: PlateGeometry,
}

impl PipelineStep for PlateFilterStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let result: Vec<PipelineData> = data
            .into_iter()
            .filter(|item| {
                let Some(bbox) = &item.bbox else {
                    return false;
                };
                let keep = self.geometry.accepts(bbox);
                if keep {
                    debug!(
                        x = bbox.x,
                        y = bbox.y,
                        width = bbox.width,
                        height = bbox.height,
                        "plate candidate"
                    );
                } else {
                    trace!(
                        aspect = bbox.aspect_ratio(),
                        area = bbox.area(),
                        "rejected contour"
                    );
                }
                keep
            })
            .collect();

        Ok(result)
    }

    fn name(&self) -> &str {
        "Plate Filtering"
    }
}

/// Replace each region's image with the same rectangle cut from the original image.
/// Regions that clamp to nothing are dropped.
pub struct CropStep;

impl PipelineStep for CropStep {
    fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
        let mut result = Vec::new();

        for item in data {
            let Some(bbox) = item.bbox else {
                continue;
            };
            match extract_roi(&item.original, &bbox) {
                Some(crop) => result.push(item.with_image(crop)),
                None => debug!(?bbox, "skipping degenerate crop"),
            }
        }

        Ok(result)
    }

    fn name(&self) -> &str {
        "Crop Original"
    }
}
