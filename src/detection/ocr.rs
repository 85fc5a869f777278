use image::{DynamicImage, RgbImage};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

use crate::config::OcrModelConfig;
use crate::error::PlateError;

/// Anything that can turn a plate crop into text.
///
/// Implementors only supply [`recognize_raw`](TextRecognizer::recognize_raw);
/// the provided [`recognize`](TextRecognizer::recognize) converts the crop to
/// 8-bit RGB first and trims the engine output. An empty string means no text
/// was recognized and is a valid result.
pub trait TextRecognizer {
    /// Run the engine on an RGB crop and return its raw output.
    fn recognize_raw(&self, region: &RgbImage) -> Result<String, PlateError>;

    fn recognize(&self, region: &DynamicImage) -> Result<String, PlateError> {
        let rgb = region.to_rgb8();
        let text = self.recognize_raw(&rgb)?;
        Ok(text.trim().to_string())
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize_raw(&self, region: &RgbImage) -> Result<String, PlateError> {
        (**self).recognize_raw(region)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize_raw(&self, region: &RgbImage) -> Result<String, PlateError> {
        (**self).recognize_raw(region)
    }
}

fn load_model(path: &Path) -> Result<Model, PlateError> {
    Model::load_file(path).map_err(|e| PlateError::ModelLoad {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

/// Initialize OCR engine with the configured models
pub fn init_ocr_engine(config: &OcrModelConfig) -> Result<OcrEngine, PlateError> {
    let detection_model_path = config.detection_model();
    let recognition_model_path = config.recognition_model();

    if !detection_model_path.exists() || !recognition_model_path.exists() {
        return Err(PlateError::ModelsNotFound {
            detection: detection_model_path.to_path_buf(),
            recognition: recognition_model_path.to_path_buf(),
        });
    }

    debug!(
        detection = %detection_model_path.display(),
        recognition = %recognition_model_path.display(),
        "loading OCR models"
    );
    let detection_model = load_model(detection_model_path)?;
    let recognition_model = load_model(recognition_model_path)?;

    let engine = OcrEngine::new(OcrEngineParams {
        detection_model: Some(detection_model),
        recognition_model: Some(recognition_model),
        ..Default::default()
    })
    .map_err(|e| PlateError::EngineSetup(e.into()))?;

    info!("OCR engine initialized");
    Ok(engine)
}

/// Text recognizer backed by the `ocrs` engine. Models are loaded once and
/// reused for every region.
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl OcrsRecognizer {
    pub fn new(config: &OcrModelConfig) -> Result<Self, PlateError> {
        Ok(Self {
            engine: init_ocr_engine(config)?,
        })
    }
}

impl TextRecognizer for OcrsRecognizer {
    fn recognize_raw(&self, region: &RgbImage) -> Result<String, PlateError> {
        let img_source =
            ImageSource::from_bytes(region.as_raw(), region.dimensions()).map_err(PlateError::recognition)?;
        let ocr_input = self
            .engine
            .prepare_input(img_source)
            .map_err(PlateError::recognition)?;

        // The whole crop is read as one block; lines come back newline-joined
        self.engine.get_text(&ocr_input).map_err(PlateError::recognition)
    }
}

/// Builds its recognizer the first time a region needs reading and keeps the
/// outcome. A failed setup is returned as the error of every call, so callers
/// that contain per-item failures keep going.
pub struct LazyRecognizer<R, F> {
    init: F,
    inner: OnceLock<Result<R, Arc<PlateError>>>,
}

impl<R, F> LazyRecognizer<R, F>
where
    R: TextRecognizer,
    F: Fn() -> Result<R, PlateError>,
{
    pub fn new(init: F) -> Self {
        Self {
            init,
            inner: OnceLock::new(),
        }
    }
}

impl<R, F> TextRecognizer for LazyRecognizer<R, F>
where
    R: TextRecognizer,
    F: Fn() -> Result<R, PlateError>,
{
    fn recognize_raw(&self, region: &RgbImage) -> Result<String, PlateError> {
        let inner = self.inner.get_or_init(|| {
            (self.init)().map_err(|e| {
                warn!(error = %e, "text recognizer unavailable");
                Arc::new(e)
            })
        });
        match inner {
            Ok(recognizer) => recognizer.recognize_raw(region),
            Err(e) => Err(PlateError::recognition(e.clone())),
        }
    }
}
