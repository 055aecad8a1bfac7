// Condition prediction: an offline companion to transcript comparison.
//
// Trains a classifier that maps a set of medicine names to the medical
// condition they are most likely prescribed for, from a CSV of
// condition/medicine-list rows.

pub mod dataset;
pub mod tfidf;
pub mod traits;

use std::path::Path;

use anyhow::Result;

use self::tfidf::PrototypeClassifier;

/// Counts reported after training.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainingSummary {
    pub rows: usize,
    pub conditions: usize,
    pub vocabulary: usize,
}

/// Full pipeline: load the CSV, aggregate per condition, and train.
pub fn train_from_csv(csv_path: &Path) -> Result<(PrototypeClassifier, TrainingSummary)> {
    let records = dataset::load_dataset(csv_path)?;
    let documents = dataset::aggregate(&records);
    let model = PrototypeClassifier::train(&documents)?;

    let summary = TrainingSummary {
        rows: records.len(),
        conditions: model.condition_count(),
        vocabulary: model.vectorizer.vocabulary_size(),
    };
    Ok((model, summary))
}
