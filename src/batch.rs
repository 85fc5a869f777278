//! Command-line presentation: directory scanning and per-image reports.
//!
//! Everything here writes to a caller-supplied [`Write`] so the exact report
//! layout can be checked in tests.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::detection::PlateReader;
use crate::detection::ocr::TextRecognizer;
use crate::error::PlateError;

/// File extensions picked up by the directory scan, compared case-insensitively
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

/// `images/` next to the running executable
pub fn default_images_dir() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(images_dir_beside(&exe))
}

fn images_dir_beside(exe: &Path) -> PathBuf {
    exe.parent().unwrap_or_else(|| Path::new(".")).join("images")
}

pub fn is_image_file(path: &Path) -> bool {
    if path.file_name().is_some_and(|name| name == ".gitkeep") {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Image files directly inside `dir`, sorted by file name
pub fn list_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            images.push(path);
        }
    }
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(images)
}

/// Scan `dir` and announce what was found. An empty result means there is
/// nothing to process; the reason has already been written to `out`.
pub fn collect_images(dir: &Path, out: &mut impl Write) -> io::Result<Vec<PathBuf>> {
    if !dir.exists() {
        writeln!(out, "Images directory not found: {}", dir.display())?;
        writeln!(out, "Please create an 'images' folder and place your images there.")?;
        return Ok(Vec::new());
    }

    let images = list_images(dir)?;
    if images.is_empty() {
        writeln!(out, "No image files found in {}", dir.display())?;
        writeln!(out, "Supported formats: JPG, JPEG, PNG, BMP, TIFF")?;
        writeln!(out, "Please place your images in the 'images' folder and run again.")?;
        return Ok(images);
    }

    writeln!(out, "Found {} image(s) in the images folder:", images.len())?;
    writeln!(out, "{}", "-".repeat(50))?;
    Ok(images)
}

/// Counts gathered while processing a batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Write the report block for one image
pub fn report_file(
    out: &mut impl Write,
    filename: &str,
    result: &Result<Vec<String>, PlateError>,
) -> io::Result<()> {
    match result {
        Ok(texts) => {
            writeln!(out, "Detected plates in {}:", filename)?;
            if texts.is_empty() {
                writeln!(out, "  No plates detected")?;
            } else {
                for (i, text) in texts.iter().enumerate() {
                    if !text.trim().is_empty() {
                        writeln!(out, "  Plate {}: {}", i + 1, text)?;
                    }
                }
                if texts.iter().all(|text| text.trim().is_empty()) {
                    writeln!(out, "  No readable text detected")?;
                }
            }
        }
        Err(e) => writeln!(out, "  Error processing {}: {}", filename, e)?,
    }
    Ok(())
}

/// Read every image in turn. A failure on one file is reported and the loop
/// moves on to the next.
pub fn process_images<R: TextRecognizer>(
    images: &[PathBuf],
    reader: &PlateReader<R>,
    out: &mut impl Write,
) -> io::Result<BatchSummary> {
    let mut summary = BatchSummary::default();

    for path in images {
        let filename = display_name(path);
        writeln!(out)?;
        writeln!(out, "Processing: {}", filename)?;

        let result = reader.read_texts(path);
        if let Err(e) = &result {
            debug!(file = %filename, error = %e, "image failed");
            summary.failed += 1;
        }
        summary.processed += 1;

        report_file(out, &filename, &result)?;
        writeln!(out, "{}", "-".repeat(30))?;
    }

    info!(processed = summary.processed, failed = summary.failed, "batch finished");
    Ok(summary)
}

/// Report for the single-image mode: every result, empty ones included
pub fn report_single(out: &mut impl Write, texts: &[String]) -> io::Result<()> {
    writeln!(out, "Detected Plates:")?;
    for text in texts {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(result: Result<Vec<String>, PlateError>) -> String {
        let mut out = Vec::new();
        report_file(&mut out, "car.jpg", &result).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn extensions_match_case_insensitively() {
        assert!(is_image_file(Path::new("a/car.JPG")));
        assert!(is_image_file(Path::new("a/car.Tif")));
        assert!(is_image_file(Path::new("car.jpeg")));
        assert!(!is_image_file(Path::new("car.gif")));
        assert!(!is_image_file(Path::new("images/.gitkeep")));
        assert!(!is_image_file(Path::new("README")));
    }

    #[test]
    fn plate_numbers_follow_result_positions() {
        let report = render(Ok(vec!["".into(), "AB123".into(), "  ".into(), "XY9".into()]));
        assert_eq!(report, "Detected plates in car.jpg:\n  Plate 2: AB123\n  Plate 4: XY9\n");
    }

    #[test]
    fn all_empty_results_are_unreadable() {
        let report = render(Ok(vec!["".into(), " ".into()]));
        assert_eq!(report, "Detected plates in car.jpg:\n  No readable text detected\n");
    }

    #[test]
    fn no_candidates_means_no_plates() {
        let report = render(Ok(Vec::new()));
        assert_eq!(report, "Detected plates in car.jpg:\n  No plates detected\n");
    }

    #[test]
    fn errors_are_reported_inline() {
        let report = render(Err(PlateError::recognition("engine down")));
        assert_eq!(report, "  Error processing car.jpg: engine down\n");
    }

    #[test]
    fn single_mode_keeps_empty_lines() {
        let mut out = Vec::new();
        report_single(&mut out, &["AB123".into(), "".into()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Detected Plates:\nAB123\n\n");
    }

    #[test]
    fn missing_directory_is_explained() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let missing = dir.path().join("images");
        let mut out = Vec::new();

        let images = collect_images(&missing, &mut out)?;

        assert!(images.is_empty());
        let text = String::from_utf8(out)?;
        assert!(text.starts_with("Images directory not found:"));
        Ok(())
    }

    #[test]
    fn empty_directory_lists_supported_formats() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        std::fs::write(dir.path().join(".gitkeep"), "")?;
        std::fs::write(dir.path().join("notes.txt"), "hi")?;
        let mut out = Vec::new();

        let images = collect_images(dir.path(), &mut out)?;

        assert!(images.is_empty());
        let text = String::from_utf8(out)?;
        assert!(text.contains("No image files found in"));
        assert!(text.contains("Supported formats: JPG, JPEG, PNG, BMP, TIFF"));
        Ok(())
    }

    #[test]
    fn images_folder_sits_beside_the_executable() -> anyhow::Result<()> {
        assert_eq!(
            images_dir_beside(Path::new("/opt/plate-reader/bin/plate-reader")),
            Path::new("/opt/plate-reader/bin/images")
        );

        let exe = std::env::current_exe()?;
        assert_eq!(default_images_dir()?.parent(), exe.parent());
        Ok(())
    }

    #[test]
    fn listing_is_sorted_and_filtered() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        for name in ["b.PNG", "a.jpg", ".gitkeep", "c.txt", "d.tiff"] {
            std::fs::write(dir.path().join(name), "")?;
        }
        std::fs::create_dir(dir.path().join("nested.png"))?;

        let names: Vec<String> = list_images(dir.path())?
            .iter()
            .map(|p| display_name(p))
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.PNG", "d.tiff"]);
        Ok(())
    }
}
