// Unit tests for the condition classifier pipeline.
//
// Tests dataset parsing and aggregation, the TF-IDF vectorizer's invariants,
// and prediction through the ConditionClassifier trait.

use std::collections::HashMap;

use rxdiff::condition::dataset::{aggregate, parse_dataset, ConditionDocument};
use rxdiff::condition::tfidf::{cosine_from_weights, PrototypeClassifier, TfIdfVectorizer};
use rxdiff::condition::traits::{medicines_text, ConditionClassifier};
use rxdiff::condition::train_from_csv;

const DATASET: &str = "\
Condition,Medicine Names
Fever,\"Paracetamol, Ibuprofen\"
Fever,\"Paracetamol, Ibuprofen, Aspirin\"
Hypertension,\"Amlodipine, Lisinopril, Losartan\"
Diabetes,\"Metformin, Insulin Glargine, Glipizide\"
Asthma,\"Salbutamol, Budesonide\"
Hypertension,\"Amlodipine\"
";

fn meds(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn trained() -> PrototypeClassifier {
    let docs = aggregate(&parse_dataset(DATASET).unwrap());
    PrototypeClassifier::train(&docs).unwrap()
}

// ============================================================
// Dataset aggregation
// ============================================================

#[test]
fn aggregation_yields_one_document_per_condition() {
    let docs = aggregate(&parse_dataset(DATASET).unwrap());
    let conditions: Vec<&str> = docs.iter().map(|d| d.condition.as_str()).collect();
    assert_eq!(conditions, vec!["Asthma", "Diabetes", "Fever", "Hypertension"]);

    let fever = docs.iter().find(|d| d.condition == "Fever").unwrap();
    assert_eq!(fever.medicines, "Paracetamol, Ibuprofen, Aspirin");
}

#[test]
fn aggregation_of_nothing_is_empty() {
    assert!(aggregate(&[]).is_empty());
}

#[test]
fn header_only_dataset_has_no_rows() {
    assert!(parse_dataset("Condition,Medicine Names\n").unwrap().is_empty());
}

// ============================================================
// Vectorizer invariants
// ============================================================

#[test]
fn vectorizer_vocabulary_is_lowercase() {
    let v = TfIdfVectorizer::fit(&["Insulin Glargine".to_string()]);
    assert!(v.idf.contains_key("insulin"));
    assert!(v.idf.contains_key("glargine"));
    assert!(!v.idf.contains_key("Insulin"));
}

#[test]
fn rarer_terms_get_higher_idf() {
    let v = TfIdfVectorizer::fit(&[
        "paracetamol ibuprofen".to_string(),
        "ibuprofen codeine".to_string(),
        "ibuprofen".to_string(),
    ]);
    assert!(v.idf["paracetamol"] > v.idf["ibuprofen"]);
}

#[test]
fn empty_query_vector_is_empty() {
    let v = TfIdfVectorizer::fit(&["aspirin".to_string()]);
    assert!(v.transform("").is_empty());
}

#[test]
fn cosine_one_empty_one_nonempty() {
    let empty: HashMap<String, f64> = HashMap::new();
    let nonempty: HashMap<String, f64> = [("aspirin".to_string(), 0.5)].into();
    assert_eq!(cosine_from_weights(&empty, &nonempty), 0.0);
    assert_eq!(cosine_from_weights(&nonempty, &empty), 0.0);
}

#[test]
fn cosine_identical_is_one() {
    let a: HashMap<String, f64> =
        [("aspirin".to_string(), 0.3), ("heparin".to_string(), 0.7)].into();
    assert!((cosine_from_weights(&a, &a) - 1.0).abs() < 1e-9);
}

// ============================================================
// Prediction
// ============================================================

#[test]
fn predicts_fever_for_analgesics() {
    let model = trained();
    assert_eq!(
        model.predict_condition(&meds(&["Paracetamol", "Ibuprofen"])).unwrap(),
        "Fever"
    );
}

#[test]
fn predicts_from_partial_multiword_name() {
    let model = trained();
    assert_eq!(model.predict_condition(&meds(&["Insulin"])).unwrap(), "Diabetes");
}

#[test]
fn prediction_is_case_insensitive() {
    let model = trained();
    assert_eq!(
        model.predict_condition(&meds(&["AMLODIPINE"])).unwrap(),
        "Hypertension"
    );
}

#[test]
fn probabilities_cover_every_condition() {
    let model = trained();
    let probs = model
        .condition_probabilities(&meds(&["Salbutamol"]))
        .unwrap();
    assert_eq!(probs.len(), 4);
    assert!((probs.values().sum::<f64>() - 1.0).abs() < 1e-9);
    assert!((probs["Asthma"] - 1.0).abs() < 1e-9);
}

#[test]
fn predicted_condition_has_highest_probability() {
    let model = trained();
    let query = meds(&["Aspirin", "Losartan", "Lisinopril"]);
    let predicted = model.predict_condition(&query).unwrap();
    let probs = model.condition_probabilities(&query).unwrap();
    let max = probs.values().cloned().fold(f64::MIN, f64::max);
    assert_eq!(probs[&predicted], max);
    assert_eq!(predicted, "Hypertension");
}

#[test]
fn classifier_is_usable_as_trait_object() {
    let model: Box<dyn ConditionClassifier> = Box::new(trained());
    assert_eq!(model.predict_condition(&meds(&["Budesonide"])).unwrap(), "Asthma");
}

#[test]
fn medicines_are_joined_like_training_documents() {
    assert_eq!(
        medicines_text(&meds(&["Paracetamol", "Ibuprofen"])),
        "Paracetamol, Ibuprofen"
    );
}

#[test]
fn train_from_csv_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("medicine_name.csv");
    std::fs::write(&csv_path, DATASET).unwrap();

    let (model, summary) = train_from_csv(&csv_path).unwrap();
    assert_eq!(summary.rows, 6);
    assert_eq!(summary.conditions, 4);
    assert_eq!(summary.vocabulary, model.vectorizer.vocabulary_size());

    let model_path = dir.path().join("model.json");
    model.save(&model_path).unwrap();
    let reloaded = PrototypeClassifier::load(&model_path).unwrap();
    assert_eq!(
        reloaded.predict_condition(&meds(&["Metformin"])).unwrap(),
        "Diabetes"
    );
}

#[test]
fn train_from_missing_csv_fails() {
    assert!(train_from_csv(std::path::Path::new("/nonexistent/medicine_name.csv")).is_err());
}

#[test]
fn training_on_header_only_csv_fails() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("empty.csv");
    std::fs::write(&csv_path, "Condition,Medicine Names\n").unwrap();
    assert!(train_from_csv(&csv_path).is_err());
}

#[test]
fn documents_train_directly() {
    let docs = vec![ConditionDocument {
        condition: "Migraine".to_string(),
        medicines: "Sumatriptan".to_string(),
    }];
    let model = PrototypeClassifier::train(&docs).unwrap();
    assert_eq!(model.predict_condition(&meds(&["Sumatriptan"])).unwrap(), "Migraine");
}
