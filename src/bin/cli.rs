//! CLI for cat facial landmark evaluation and pain scoring.
//!
//! Usage:
//!   feline-face evaluate <dataset> --predictions <dir>   # NME report
//!   feline-face score <landmarks.json>                   # Pain score for one face
//!   feline-face score-batch <dir>                        # Pain scores for many faces
//!
//! Every command accepts `--json` and `-o <file>`.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use feline_face::dataset::image_size;
use feline_face::{
    evaluate_dataset, score_records, Axis, BatchSummary, DatasetLayout, Error, Evaluation,
    ImageSize, LabelRecord, LandmarkSet, Normalized, PainBatch, PainReport, RecordPredictor,
    Result,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "feline-face")]
#[command(author, version, about = "Cat facial landmark evaluation and pain scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output as JSON
    #[arg(short, long, global = true)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare stored predictions against dataset labels
    Evaluate {
        /// Dataset root containing images/ and labels/
        dataset: PathBuf,

        /// Directory of prediction records (<stem>.json, pixel coordinates)
        #[arg(long)]
        predictions: PathBuf,

        /// Evaluate only the first N images
        #[arg(long, default_value = "50")]
        num_samples: usize,

        /// Entries per ranked list (best/worst images and landmarks)
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Pain score for one landmark record
    Score {
        /// Landmark record ({"labels": [[x, y], ...]})
        landmarks: PathBuf,

        /// Record holds normalized [0, 1] coordinates
        #[arg(long)]
        normalized: bool,

        /// Image to read width/height from (with --normalized)
        #[arg(long, conflicts_with_all = ["width", "height"])]
        image: Option<PathBuf>,

        /// Image width in pixels (with --normalized)
        #[arg(long, requires = "height")]
        width: Option<u32>,

        /// Image height in pixels (with --normalized)
        #[arg(long, requires = "width")]
        height: Option<u32>,
    },

    /// Pain scores for every landmark record in a directory
    ScoreBatch {
        /// Directory of pixel-space landmark records
        dir: PathBuf,
    },
}

/// Output structure for `score`
#[derive(Serialize)]
struct ScoreOutput {
    landmarks: String,
    #[serde(flatten)]
    report: PainReport,
    total: Option<u8>,
}

/// Output structure for `evaluate`
#[derive(Serialize)]
struct EvaluateOutput {
    dataset: String,
    average_nme: Option<f32>,
    #[serde(flatten)]
    evaluation: Evaluation,
    summary: Option<BatchSummary>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.output.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let output_str = match &cli.command {
        Command::Evaluate {
            dataset,
            predictions,
            num_samples,
            top,
        } => {
            let layout = DatasetLayout::new(dataset);
            let predictor = RecordPredictor::new(predictions)?;
            let evaluation = evaluate_dataset(&layout, &predictor, Some(*num_samples))?;
            let summary = if evaluation.reports.is_empty() {
                None
            } else {
                Some(evaluation.summary(*top)?)
            };
            let output = EvaluateOutput {
                dataset: dataset.display().to_string(),
                average_nme: evaluation.average_nme(),
                evaluation,
                summary,
            };
            if cli.output.json {
                serde_json::to_string_pretty(&output)?
            } else {
                format_evaluation(&output)
            }
        }
        Command::Score {
            landmarks,
            normalized,
            image,
            width,
            height,
        } => {
            let record = LabelRecord::load(landmarks)?;
            let pixel = if *normalized {
                let size = resolve_size(image.as_deref(), *width, *height)?;
                LandmarkSet::<Normalized>::from_pairs(&record.labels)?.to_pixel(size)?
            } else {
                record.to_landmarks()?
            };
            let report = PainReport::assess(&pixel);
            let output = ScoreOutput {
                landmarks: landmarks.display().to_string(),
                total: report.total(),
                report,
            };
            if cli.output.json {
                serde_json::to_string_pretty(&output)?
            } else {
                format_score(&output)
            }
        }
        Command::ScoreBatch { dir } => {
            let batch = score_records(dir)?;
            if cli.output.json {
                serde_json::to_string_pretty(&batch)?
            } else {
                format_batch(&batch)
            }
        }
    };

    // Write output
    if let Some(ref path) = cli.output.output {
        std::fs::write(path, &output_str)?;
        tracing::info!(path = %path.display(), "output written");
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn resolve_size(image: Option<&Path>, width: Option<u32>, height: Option<u32>) -> Result<ImageSize> {
    match (image, width, height) {
        (Some(path), _, _) => image_size(path),
        (None, Some(w), Some(h)) => ImageSize::new(w, h),
        _ => Err(Error::InvalidInput(
            "normalized landmarks need --image or --width/--height".to_string(),
        )),
    }
}

fn format_score(output: &ScoreOutput) -> String {
    let mut s = String::new();
    let r = &output.report;
    let m = &r.measurements;

    s.push_str(&format!("Landmarks: {}\n", output.landmarks));
    s.push_str("\nMeasurements:\n");
    s.push_str(&format!("  Eye opening:   L {}  R {}\n",
        fmt_opt(m.eyes.left_ratio, 3), fmt_opt(m.eyes.right_ratio, 3)));
    s.push_str(&format!("  Ear angle:     L {}  R {}\n",
        fmt_opt(m.ears.left_angle, 1), fmt_opt(m.ears.right_angle, 1)));
    s.push_str(&format!("  Ear vertical:  L {}  R {}\n",
        fmt_opt(m.ears.left_vertical_angle, 1), fmt_opt(m.ears.right_vertical_angle, 1)));
    s.push_str(&format!("  Muzzle ratio:  L {}  R {}\n",
        fmt_opt(m.muzzle.left_ratio, 3), fmt_opt(m.muzzle.right_ratio, 3)));

    s.push_str(&format!("\n{}\n", r));
    match output.total {
        Some(total) => s.push_str(&format!("Total: {}/6\n", total)),
        None => s.push_str("ERROR: no confident score (scores of -1 are indeterminate)\n"),
    }
    s
}

fn format_evaluation(output: &EvaluateOutput) -> String {
    let mut s = String::new();
    let eval = &output.evaluation;
    let rule = "=".repeat(80);

    s.push_str(&format!("Dataset: {}\n", output.dataset));
    for report in &eval.reports {
        s.push_str(&format!("{}: NME = {:.6}\n", report.image(), report.nme()));
    }
    for skipped in &eval.skipped {
        s.push_str(&format!("{}: skipped ({})\n", skipped.image, skipped.reason));
    }

    let Some(summary) = &output.summary else {
        s.push_str("\nNo images evaluated.\n");
        return s;
    };

    s.push_str(&format!("\n{}\nVALIDATION STATISTICS\n{}\n", rule, rule));
    s.push_str(&format!("Total images analyzed: {}\n", summary.count));
    s.push_str("\nNME Statistics:\n");
    s.push_str(&format!("  Mean NME: {:.6}\n", summary.mean));
    s.push_str(&format!("  Median NME: {:.6}\n", summary.median));
    s.push_str(&format!("  Std NME: {:.6}\n", summary.std));
    s.push_str(&format!("  Min NME: {:.6}\n", summary.min));
    s.push_str(&format!("  Max NME: {:.6}\n", summary.max));
    s.push_str(&format!("  25th percentile: {:.6}\n", summary.q1));
    s.push_str(&format!("  75th percentile: {:.6}\n", summary.q3));

    s.push_str("\nPerformance Categories:\n");
    for band in &summary.bands {
        s.push_str(&format!("  {}: {} images ({:.1}%)\n",
            band.band.label(), band.count, band.percent));
    }

    s.push_str("\nBest Performing Images:\n");
    for (i, r) in summary.best.iter().enumerate() {
        s.push_str(&format!("  {}. {}: NME = {:.6}\n", i + 1, r.image, r.nme));
    }
    s.push_str("\nWorst Performing Images:\n");
    for (i, r) in summary.worst.iter().enumerate() {
        s.push_str(&format!("  {}. {}: NME = {:.6}\n", i + 1, r.image, r.nme));
    }

    s.push_str(&format!("\nOutliers (NME > {:.3}): {} images\n",
        summary.outlier_threshold, summary.outliers.len()));
    for r in &summary.outliers {
        s.push_str(&format!("  {}: NME = {:.6}\n", r.image, r.nme));
    }

    s.push_str("\nLandmark Error Analysis:\n");
    s.push_str("  Worst performing landmarks (highest mean error):\n");
    for l in &summary.worst_landmarks {
        s.push_str(&format!("    Landmark {}: mean error = {:.6} ± {:.6}\n", l.index, l.mean, l.std));
    }
    s.push_str("  Best performing landmarks (lowest mean error):\n");
    for l in &summary.best_landmarks {
        s.push_str(&format!("    Landmark {}: mean error = {:.6} ± {:.6}\n", l.index, l.mean, l.std));
    }

    if let Some(avg) = output.average_nme {
        s.push_str(&format!("\nAverage NME: {:.6}\n", avg));
    }
    s
}

fn format_batch(batch: &PainBatch) -> String {
    let mut s = String::new();

    for scored in &batch.scored {
        s.push_str(&format!("{}: {}\n", scored.image, scored.report));
    }
    for skipped in &batch.skipped {
        s.push_str(&format!("{}: skipped ({})\n", skipped.image, skipped.reason));
    }

    let summary = &batch.summary;
    s.push_str(&format!("\nScored {} faces, {} with an indeterminate sub-score\n",
        summary.total, summary.errors));
    for axis in Axis::ALL {
        let t = summary.tally(axis);
        s.push_str(&format!("  {:<7} 0: {:>4}  1: {:>4}  2: {:>4}  indeterminate: {:>4}\n",
            axis.to_string(), t.none, t.moderate, t.marked, t.indeterminate));
    }
    s
}

fn fmt_opt(value: Option<f32>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}
