#![allow(dead_code)]

use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use plate_reader::{PlateError, TextRecognizer};
use std::cell::Cell;
use std::path::{Path, PathBuf};

/// Draws solid black rectangles `(x, y, width, height)` on a white canvas.
pub fn plate_photo(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    for &(x, y, w, h) in rects {
        draw_filled_rect_mut(&mut img, Rect::at(x as i32, y as i32).of_size(w, h), Rgb([0, 0, 0]));
    }
    DynamicImage::ImageRgb8(img)
}

/// Saves `img` as `name` inside `dir` and returns the full path.
pub fn save_image(dir: &Path, name: &str, img: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    img.save(&path).expect("Failed to save test image");
    path
}

/// Writes bytes that no decoder accepts under an image extension.
pub fn write_corrupt_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not a jpeg").expect("Failed to write corrupt image");
    path
}

/// Returns the crop size as `"WxH"`, so results can be matched to candidates.
pub struct SizeRecognizer;

impl TextRecognizer for SizeRecognizer {
    fn recognize_raw(&self, region: &RgbImage) -> Result<String, PlateError> {
        let (w, h) = region.dimensions();
        Ok(format!("{}x{}", w, h))
    }
}

/// Hands out the scripted texts in call order, then empty strings.
pub struct ScriptedRecognizer {
    texts: Vec<String>,
    calls: Cell<usize>,
}

impl ScriptedRecognizer {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize_raw(&self, _region: &RgbImage) -> Result<String, PlateError> {
        let i = self.calls.get();
        self.calls.set(i + 1);
        Ok(self.texts.get(i).cloned().unwrap_or_default())
    }
}

/// Fails every call the way a broken OCR engine would.
pub struct FailingRecognizer;

impl TextRecognizer for FailingRecognizer {
    fn recognize_raw(&self, _region: &RgbImage) -> Result<String, PlateError> {
        Err(PlateError::recognition("ocr engine crashed"))
    }
}
