mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from plate_reader for tests
pub use plate_reader::{
    BoundingBox, CandidateOrder, LocatorConfig, PlateError, PlateLocator, PlateReader,
    TextRecognizer,
};
