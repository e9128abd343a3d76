use platform_detector::{BuiltinModel, ClassifierError, DetectorConfig, ModelSource, PlatformDetector};
use anyhow::Context;
use log::info;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON model bundle (defaults to the built-in model or PLATFORM_DETECTOR_MODEL)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Expected SHA-256 of the model file
    #[arg(long, requires = "model")]
    sha256: Option<String>,

    /// Print the built-in models and exit
    #[arg(long)]
    list_models: bool,

    /// Texts to classify; reads lines from stdin when none are given
    texts: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    classified: u32,
    skipped: u32,
}

/// Classifies one input and writes `label\ttext`. Blank input is skipped.
fn classify_text<W: Write>(
    detector: &PlatformDetector,
    text: &str,
    out: &mut W,
    summary: &mut Summary,
) -> anyhow::Result<()> {
    match detector.predict(text) {
        Ok(label) => {
            writeln!(out, "{}\t{}", label, text)?;
            summary.classified += 1;
        }
        Err(ClassifierError::ValidationError(_)) => {
            eprintln!("Skipping empty input");
            summary.skipped += 1;
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Classifies `input` line by line as it is read.
///
/// A line that is not valid UTF-8 is reported and skipped; the rest of the
/// input is still classified. Read errors end the run.
fn classify_lines<R: BufRead, W: Write>(
    detector: &PlatformDetector,
    input: R,
    out: &mut W,
) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();
    for (number, line) in input.split(b'\n').enumerate() {
        let mut bytes = line.context("Failed to read stdin")?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        match String::from_utf8(bytes) {
            Ok(text) => classify_text(detector, &text, out, &mut summary)?,
            Err(e) => {
                eprintln!("Skipping line {}: {}", number + 1, e.utf8_error());
                summary.skipped += 1;
            }
        }
    }
    Ok(summary)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    platform_detector::init_logger();
    let args = Args::parse();

    if args.list_models {
        for model in BuiltinModel::all() {
            let info = model.get_model_info();
            println!("{}\t{}", info.name, info.description);
        }
        return Ok(());
    }

    let config = match args.model {
        Some(path) => DetectorConfig::new(ModelSource::File { path, sha256: args.sha256 }),
        None => DetectorConfig::from_env(),
    };

    info!("=== Starting Platform Detector ===");
    let start_time = Instant::now();
    let detector = PlatformDetector::new(config);
    detector.load_async()
        .await
        .with_context(|| format!("Failed to load model from {}", detector.config().model_source))?;
    info!("Model loaded in {:.2?}", start_time.elapsed());

    let classify_start = Instant::now();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = if args.texts.is_empty() {
        classify_lines(&detector, io::stdin().lock(), &mut out)?
    } else {
        let mut summary = Summary::default();
        for text in &args.texts {
            classify_text(&detector, text, &mut out, &mut summary)?;
        }
        summary
    };

    if summary.classified > 0 {
        info!(
            "Classified {} inputs in {:.2?} (average {:.2?}), skipped {}",
            summary.classified,
            classify_start.elapsed(),
            classify_start.elapsed() / summary.classified,
            summary.skipped
        );
    }

    Ok(())
}
