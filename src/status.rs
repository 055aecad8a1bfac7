// System status display: shows classifier model state and OCR availability.

use anyhow::Result;

use crate::condition::tfidf::PrototypeClassifier;
use crate::config::Config;
use crate::ingest::ocr::OcrEngine;

/// Display system status to the terminal.
pub fn show(config: &Config, ocr: &dyn OcrEngine) -> Result<()> {
    let model_path = &config.model_path;

    if !model_path.exists() {
        println!("Condition model: not trained ({})", model_path.display());
        println!("  Run `rxdiff train --csv <path>` to build it");
    } else {
        let file_size = std::fs::metadata(model_path)
            .map(|m| format_bytes(m.len()))
            .unwrap_or_else(|_| "unknown".to_string());
        println!("Condition model: {} ({})", model_path.display(), file_size);

        match PrototypeClassifier::load(model_path) {
            Ok(model) => {
                println!(
                    "  {} conditions, {} vocabulary terms (trained {})",
                    model.condition_count(),
                    model.vectorizer.vocabulary_size(),
                    model.trained_at
                );
            }
            Err(e) => {
                println!("  Model file is unreadable: {e:#}");
                println!("  Re-run `rxdiff train` to replace it");
            }
        }
    }

    match &config.dataset_path {
        Some(path) => println!("Training dataset: {}", path.display()),
        None => println!("Training dataset: not configured (RXDIFF_DATASET_PATH)"),
    }

    println!("OCR: {}", ocr.describe());
    println!("Upload limit: {}", format_bytes(config.max_upload_bytes as u64));

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
