use std::path::{Path, PathBuf};
#[cfg(feature = "web")]
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use rxdiff::condition::tfidf::PrototypeClassifier;
use rxdiff::condition::traits::ConditionClassifier;
use rxdiff::config::Config;
use rxdiff::ingest::ocr::OcrEngine;

/// rxdiff: compare medical transcripts for medication discrepancies.
///
/// Reports drug names and sentences that a transcription dropped or
/// introduced relative to the original report, with a similarity score.
#[derive(Parser)]
#[command(name = "rxdiff", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare an original report with its transcription
    Compare {
        /// Original report: a .txt, .pdf, or image file (or text with --text)
        original: String,

        /// Transcribed report: a .txt, .pdf, or image file (or text with --text)
        transcribed: String,

        /// Treat both arguments as literal text instead of file paths
        #[arg(long)]
        text: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Train the condition classifier from a medicine/condition CSV
    Train {
        /// CSV with `Condition` and `Medicine Names` columns
        /// (default: RXDIFF_DATASET_PATH)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Where to save the model (default: RXDIFF_MODEL_PATH)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Predict the condition a set of medicines is prescribed for
    Predict {
        /// Medicine names (comma-separated lists are split)
        #[arg(required = true)]
        medicines: Vec<String>,

        /// Model file to use (default: RXDIFF_MODEL_PATH)
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Show model, dataset, and OCR status
    Status,

    /// Serve the JSON comparison API
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (default: 5000)
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("rxdiff=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            original,
            transcribed,
            text,
            json,
        } => {
            let config = Config::load()?;

            let (original_text, wrong_text) = if text {
                (original, transcribed)
            } else {
                let ocr = rxdiff::ingest::ocr::create_engine(&config);
                (
                    read_report(Path::new(&original), ocr.as_ref())?,
                    read_report(Path::new(&transcribed), ocr.as_ref())?,
                )
            };

            let result = rxdiff::compare(&original_text, &wrong_text)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                rxdiff::output::terminal::display_comparison(&result);
            }
        }

        Commands::Train { csv, output } => {
            let config = Config::load()?;
            let csv_path = config.require_dataset(csv)?;
            let model_path = output.unwrap_or_else(|| config.model_path.clone());

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message(format!("Training on {}...", csv_path.display()));

            let trained = rxdiff::condition::train_from_csv(&csv_path);
            spinner.finish_and_clear();
            let (model, summary) = trained?;

            model.save(&model_path)?;

            println!("{}", "Model trained successfully.".bold());
            println!("  Rows read:       {}", summary.rows);
            println!("  Conditions:      {}", summary.conditions);
            println!("  Vocabulary:      {}", summary.vocabulary);
            println!("  Model saved to:  {}", model_path.display());
        }

        Commands::Predict { medicines, model } => {
            let mut config = Config::load()?;
            if let Some(path) = model {
                config.model_path = path;
            }
            config.require_model()?;

            let classifier = PrototypeClassifier::load(&config.model_path)?;

            let medicines: Vec<String> = medicines
                .iter()
                .flat_map(|m| rxdiff::condition::dataset::split_medicines(m))
                .collect();
            if medicines.is_empty() {
                anyhow::bail!("No medicine names given");
            }

            let condition = classifier.predict_condition(&medicines)?;
            let probabilities = classifier.condition_probabilities(&medicines)?;

            rxdiff::output::terminal::display_prediction(&medicines, &condition, &probabilities);
        }

        Commands::Status => {
            let config = Config::load()?;
            let ocr = rxdiff::ingest::ocr::create_engine(&config);
            rxdiff::status::show(&config, ocr.as_ref())?;
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let ocr: Arc<dyn OcrEngine> = Arc::from(rxdiff::ingest::ocr::create_engine(&config));
            let classifier = load_classifier(&config);

            let state = rxdiff::web::AppState {
                config: Arc::new(config),
                ocr,
                classifier,
            };
            rxdiff::web::run_server(state, port, &bind).await?;
        }
    }

    Ok(())
}

/// Read one report file, naming the file in any error.
fn read_report(path: &Path, ocr: &dyn OcrEngine) -> Result<String> {
    rxdiff::ingest::load_file(path, ocr)
        .with_context(|| format!("Error reading {}", path.display()))
}

/// Load the condition model for the web API if one has been trained.
///
/// A missing or unreadable model only disables /api/condition; comparison
/// still works.
#[cfg(feature = "web")]
fn load_classifier(config: &Config) -> Option<Arc<dyn ConditionClassifier>> {
    if !config.model_path.exists() {
        tracing::info!(
            path = %config.model_path.display(),
            "No condition model found, /api/condition disabled"
        );
        return None;
    }

    match PrototypeClassifier::load(&config.model_path) {
        Ok(model) => {
            tracing::info!(conditions = model.condition_count(), "Loaded condition model");
            Some(Arc::new(model))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load condition model, /api/condition disabled");
            None
        }
    }
}
