use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::error::PlateError;
use crate::models::BoundingBox;

pub type Result<T> = std::result::Result<T, PlateError>;

/// Data that flows through the pipeline
/// Each PipelineData represents a single image region
#[derive(Clone)]
pub struct PipelineData {
    /// The image data (can be grayscale, an edge map, or a color crop)
    pub image: DynamicImage,

    /// Reference to the original image (shared via Arc)
    pub original: Arc<DynamicImage>,

    /// Bounding box in the original image (None means full image)
    pub bbox: Option<BoundingBox>,
}

impl PipelineData {
    /// Create PipelineData for a full image
    pub fn from_image(image: DynamicImage) -> Self {
        let original = Arc::new(image.clone());
        Self {
            image,
            original,
            bbox: None,
        }
    }

    /// Create PipelineData for a region of an image
    pub fn from_region(image: DynamicImage, original: Arc<DynamicImage>, bbox: BoundingBox) -> Self {
        Self {
            image,
            original,
            bbox: Some(bbox),
        }
    }

    /// Same region, new image
    pub fn with_image(&self, image: DynamicImage) -> Self {
        Self {
            image,
            original: self.original.clone(),
            bbox: self.bbox,
        }
    }
}

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
}

/// Context available to all pipeline steps
#[derive(Clone, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

/// Trait that all pipeline steps must implement
pub trait PipelineStep: Send + Sync {
    /// Process data and return transformed data
    /// Steps can split data (1 → many), filter (many → fewer), or transform (many → many)
    fn process(&self, data: Vec<PipelineData>, context: &PipelineContext) -> Result<Vec<PipelineData>>;

    /// Human-readable name for this step (used in logs and debug directory names)
    fn name(&self) -> &str;
}

/// Composable pipeline builder
#[derive(Clone)]
pub struct Pipeline {
    steps: Vec<Arc<dyn PipelineStep>>,
    context: PipelineContext,
}

impl Pipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            context: PipelineContext::default(),
        }
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    format!("Debug directory is not empty: {}", output_dir.display()),
                )
                .into());
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.context.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    /// Add a processing step to the pipeline
    pub fn add_step(mut self, step: Arc<dyn PipelineStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Helper method to add a step from a Box (for convenience)
    pub fn add_step_boxed(mut self, step: Box<dyn PipelineStep>) -> Self {
        self.steps.push(Arc::from(step));
        self
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run the pipeline sequentially on an input image
    pub fn run(&self, input: &DynamicImage) -> Result<Vec<PipelineData>> {
        self.run_partial(input, self.steps.len())
    }

    /// Run the pipeline but stop after `num_steps` steps
    pub fn run_partial(&self, input: &DynamicImage, num_steps: usize) -> Result<Vec<PipelineData>> {
        if let Some(debug_config) = &self.context.debug {
            let input_dir = debug_config.output_dir.join("00_input");
            std::fs::create_dir_all(&input_dir)?;
            input
                .save(input_dir.join("01.png"))
                .map_err(PlateError::DebugOutput)?;
            debug!("saved 00_input/01.png");
        }

        // Start with a single PipelineData containing the full image
        let mut data = vec![PipelineData::from_image(input.clone())];

        for (step_idx, step) in self.steps.iter().take(num_steps).enumerate() {
            debug!(step = step.name(), items = data.len(), "running step");

            data = step.process(data, &self.context)?;
            self.save_step_outputs(step_idx, step.name(), &data)?;

            debug!(step = step.name(), items = data.len(), "step finished");
        }

        Ok(data)
    }

    fn save_step_outputs(&self, step_idx: usize, step_name: &str, data: &[PipelineData]) -> Result<()> {
        let Some(debug_config) = &self.context.debug else {
            return Ok(());
        };

        let step_dir_name = format!(
            "{:02}_{}",
            step_idx + 1,
            step_name.to_lowercase().replace(' ', "_")
        );
        let step_dir = debug_config.output_dir.join(&step_dir_name);
        std::fs::create_dir_all(&step_dir)?;

        for (idx, item) in data.iter().enumerate() {
            if item.image.width() == 0 || item.image.height() == 0 {
                continue;
            }
            let filename = format!("{:02}.png", idx + 1);
            item.image
                .save(step_dir.join(&filename))
                .map_err(PlateError::DebugOutput)?;
        }

        debug!("saved {} images to {}/", data.len(), step_dir_name);
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Split(usize);

    impl PipelineStep for Split {
        fn process(&self, data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
            let mut result = Vec::new();
            for item in data {
                for i in 0..self.0 {
                    let bbox = BoundingBox::new(i as u32, 0, 1, 1);
                    result.push(PipelineData::from_region(
                        item.image.crop_imm(i as u32, 0, 1, 1),
                        item.original.clone(),
                        bbox,
                    ));
                }
            }
            Ok(result)
        }

        fn name(&self) -> &str {
            "Split Pixels"
        }
    }

    struct DropAll;

    impl PipelineStep for DropAll {
        fn process(&self, _data: Vec<PipelineData>, _context: &PipelineContext) -> Result<Vec<PipelineData>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "Drop All"
        }
    }

    #[test]
    fn steps_run_in_order() -> anyhow::Result<()> {
        let pipeline = Pipeline::new()
            .add_step_boxed(Box::new(Split(3)))
            .add_step_boxed(Box::new(DropAll));
        let img = DynamicImage::new_rgb8(4, 4);

        assert_eq!(pipeline.step_names(), vec!["Split Pixels", "Drop All"]);
        assert_eq!(pipeline.run_partial(&img, 1)?.len(), 3);
        assert!(pipeline.run(&img)?.is_empty());
        Ok(())
    }

    #[test]
    fn debug_mode_writes_each_step() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let out = dir.path().join("debug");
        let pipeline = Pipeline::new()
            .add_step_boxed(Box::new(Split(2)))
            .with_debug(out.clone())?;

        pipeline.run(&DynamicImage::new_rgb8(4, 4))?;

        assert!(out.join("00_input/01.png").exists());
        assert!(out.join("01_split_pixels/01.png").exists());
        assert!(out.join("01_split_pixels/02.png").exists());
        Ok(())
    }

    #[test]
    fn debug_mode_rejects_non_empty_directory() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        std::fs::write(dir.path().join("leftover.txt"), "x")?;
        assert!(Pipeline::new().with_debug(dir.path().to_path_buf()).is_err());
        Ok(())
    }
}
