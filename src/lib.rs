pub mod batch;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod pipeline;

pub use config::{CandidateOrder, LocatorConfig, OcrModelConfig, PlateGeometry};
pub use detection::ocr::{LazyRecognizer, OcrsRecognizer, TextRecognizer};
pub use detection::{PlateLocator, PlateReader, load_image};
pub use error::PlateError;
pub use models::{BoundingBox, CandidateRegion, Contour, PlateReading};
pub use pipeline::{Pipeline, PipelineContext, PipelineData, PipelineStep};
