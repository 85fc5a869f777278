use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use plate_reader::batch;
use plate_reader::{
    CandidateOrder, LazyRecognizer, LocatorConfig, OcrModelConfig, OcrsRecognizer, PlateLocator,
    PlateReader,
};

#[derive(Parser)]
#[command(name = "plate-reader")]
#[command(about = "Locate license plates in photos and read them with OCR")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Text detection model (defaults to ~/.cache/ocrs/text-detection.rten)
    #[arg(long, value_name = "FILE", global = true)]
    detection_model: Option<PathBuf>,

    /// Text recognition model (defaults to ~/.cache/ocrs/text-recognition.rten)
    #[arg(long, value_name = "FILE", global = true)]
    recognition_model: Option<PathBuf>,

    /// Return plates sorted top-to-bottom, left-to-right instead of detection order
    #[arg(long, global = true)]
    sort: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read plates from every image in a folder
    Batch {
        /// Folder to scan (defaults to the project's images/ folder)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Read plates from a single image
    Single {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Save intermediate images to directory (must be empty)
        #[arg(long, value_name = "DIR")]
        debug_out: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

impl Cli {
    fn locator_config(&self) -> LocatorConfig {
        let order = if self.sort {
            CandidateOrder::TopLeft
        } else {
            CandidateOrder::Detection
        };
        LocatorConfig::default().with_order(order)
    }

    fn model_config(&self) -> OcrModelConfig {
        let mut config = OcrModelConfig::from_cache_dir();
        if let Some(path) = &self.detection_model {
            config = config.with_detection_model(path);
        }
        if let Some(path) = &self.recognition_model {
            config = config.with_recognition_model(path);
        }
        config
    }

    fn recognizer(&self) -> anyhow::Result<OcrsRecognizer> {
        OcrsRecognizer::new(&self.model_config()).context("Failed to initialize OCR engine")
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &args.command {
        Command::Batch { dir } => {
            let dir = match dir {
                Some(dir) => dir.clone(),
                None => batch::default_images_dir().context("Failed to locate the images folder")?,
            };
            let images = batch::collect_images(&dir, &mut out)?;
            if images.is_empty() {
                return Ok(());
            }

            // Models load on the first plate; a failure is reported per file
            let model_config = args.model_config();
            let recognizer = LazyRecognizer::new(|| OcrsRecognizer::new(&model_config));
            let reader = PlateReader::new(PlateLocator::new(args.locator_config()), recognizer);
            batch::process_images(&images, &reader, &mut out)?;
        }
        Command::Single { image_path, debug_out } => {
            let mut locator = PlateLocator::new(args.locator_config());
            if let Some(debug_dir) = debug_out {
                locator = locator.with_debug(debug_dir.clone())?;
            }

            let reader = PlateReader::new(locator, args.recognizer()?);
            let texts = reader
                .read_texts(image_path)
                .with_context(|| format!("Failed to read plates from {}", image_path.display()))?;
            batch::report_single(&mut out, &texts)?;
        }
    }

    Ok(())
}
