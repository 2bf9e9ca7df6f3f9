//! Waste Sorter - Terminal front-end
//!
//! Same predict / advise / log flow as the web front-end, driven from the
//! command line: classify a photo, answer "was this correct?", done.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use waste_sorter_core::constants;
use waste_sorter_core::logic::model::UnloadedEngine;
use waste_sorter_core::logic::samples;
use waste_sorter_core::{Classifier, ClassifierConfig, Correctness, FeedbackLog, OnnxEngine};

#[derive(Parser, Debug)]
#[command(name = "waste-sorter", version = constants::APP_VERSION, about = "Classify a photo of waste and get disposal guidance")]
struct Cli {
    /// ONNX model file
    #[arg(long, value_name = "FILE", global = true)]
    model: Option<PathBuf>,

    /// Feedback CSV log
    #[arg(long, value_name = "FILE", global = true)]
    feedback: Option<PathBuf>,

    /// Sample image directory
    #[arg(long, value_name = "DIR", global = true)]
    samples: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify an image file
    Classify {
        image: PathBuf,

        /// Do not ask whether the prediction was correct
        #[arg(long)]
        no_feedback: bool,
    },
    /// List the sample gallery
    Samples,
    /// Summarize recorded feedback
    Stats,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    log::debug!("{} v{}", constants::APP_NAME, constants::APP_VERSION);
    let feedback_path = cli.feedback.clone().unwrap_or_else(constants::get_feedback_file);

    match cli.command {
        Command::Classify { image, no_feedback } => {
            let model_path = cli.model.clone().unwrap_or_else(constants::get_model_path);
            let classifier = load_classifier(&model_path);
            let feedback = FeedbackLog::new(feedback_path);
            classify(&classifier, &feedback, &image, !no_feedback)
        }
        Command::Samples => {
            let dir = cli.samples.clone().unwrap_or_else(constants::get_sample_dir);
            let found = samples::list(&dir);
            if found.is_empty() {
                println!("No sample images found in {}", dir.display());
            }
            for sample in found {
                println!("{}", sample.path.display());
            }
            Ok(())
        }
        Command::Stats => {
            let feedback = FeedbackLog::new(feedback_path);
            let summary = feedback
                .summary()
                .with_context(|| format!("reading {}", feedback.path().display()))?;

            println!(
                "{} answers, {} correct, {} wrong ({:.1}% accuracy)",
                summary.total,
                summary.correct,
                summary.incorrect,
                summary.accuracy * 100.0
            );
            for (label, tally) in &summary.per_label {
                println!("  {:<14} yes {:>4}  no {:>4}", label, tally.correct, tally.incorrect);
            }
            Ok(())
        }
    }
}

fn load_classifier(model_path: &Path) -> Classifier {
    let config = ClassifierConfig::from_env();
    match OnnxEngine::load(model_path) {
        Ok(engine) => Classifier::new(engine, config),
        Err(e) => {
            log::warn!("{} - every image will be reported as not detected", e);
            Classifier::new(UnloadedEngine::new(e.to_string()), config)
        }
    }
}

fn classify(classifier: &Classifier, feedback: &FeedbackLog, image: &Path, ask: bool) -> Result<()> {
    let bytes = match std::fs::read(image) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            log::warn!("Cannot read {}: {}", image.display(), e);
            None
        }
    };

    let prediction = classifier.predict_bytes(bytes.as_deref());
    println!("{}\n", prediction.message);

    if !ask {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Some(correct) = ask_correctness(&mut stdin.lock(), &mut stdout)? {
        let message = feedback
            .save(prediction.label_name(), prediction.confidence, &prediction.advice, correct)
            .with_context(|| format!("writing feedback to {}", feedback.path().display()))?;
        println!("{}", message);
    }
    Ok(())
}

/// Prompt once; `None` when the answer is neither yes nor no
fn ask_correctness(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<Option<Correctness>> {
    write!(output, "📝 Was this prediction correct? [y/n] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(parse_answer(&answer))
}

fn parse_answer(answer: &str) -> Option<Correctness> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(Correctness::Yes),
        "n" | "no" => Some(Correctness::No),
        _ => None,
    }
}
