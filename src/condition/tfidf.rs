// TF-IDF vectorizer and prototype classifier for condition prediction.
//
// Each condition's training document (its medicine list) becomes an
// L2-normalized TF-IDF vector. Prediction vectorizes the query medicines the
// same way and picks the condition whose prototype vector is most similar
// by cosine. Similarities are normalized into a probability distribution.
//
// IDF is smoothed: idf(t) = ln((1 + n) / (1 + df(t))) + 1, so a term present
// in every document still carries weight 1.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::dataset::ConditionDocument;
use super::traits::{medicines_text, ConditionClassifier};

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"));

/// Lowercase and split into word tokens of two or more characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// A fitted TF-IDF vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Term -> inverse document frequency
    pub idf: BTreeMap<String, f64>,
}

impl TfIdfVectorizer {
    /// Learn the vocabulary and IDF weights from a set of documents.
    pub fn fit(documents: &[String]) -> Self {
        let n = documents.len() as f64;
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();

        for doc in documents {
            let mut seen: Vec<String> = tokenize(doc);
            seen.sort();
            seen.dedup();
            for term in seen {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        let idf = document_frequency
            .into_iter()
            .map(|(term, df)| (term, ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0))
            .collect();

        Self { idf }
    }

    /// Vectorize one document. Out-of-vocabulary terms are ignored.
    pub fn transform(&self, document: &str) -> HashMap<String, f64> {
        let mut counts: HashMap<String, f64> = HashMap::new();
        for term in tokenize(document) {
            if self.idf.contains_key(&term) {
                *counts.entry(term).or_insert(0.0) += 1.0;
            }
        }

        let mut weights: HashMap<String, f64> = counts
            .into_iter()
            .map(|(term, tf)| {
                let idf = self.idf[&term];
                (term, tf * idf)
            })
            .collect();

        normalize(&mut weights);
        weights
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }
}

/// Scale a weight map to unit L2 norm in place. Zero vectors stay zero.
fn normalize(weights: &mut HashMap<String, f64>) {
    let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in weights.values_mut() {
            *w /= norm;
        }
    }
}

/// Cosine similarity between two sparse weight maps.
///
/// Returns 0.0 when either side is empty or all-zero.
pub fn cosine_from_weights(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(k, v)| large.get(k).map(|w| v * w))
        .sum();

    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Nearest-prototype condition classifier over TF-IDF vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrototypeClassifier {
    pub vectorizer: TfIdfVectorizer,
    /// Condition -> normalized prototype vector
    pub prototypes: BTreeMap<String, HashMap<String, f64>>,
    /// When the model was trained (RFC 3339)
    pub trained_at: String,
}

impl PrototypeClassifier {
    /// Fit the vectorizer and build one prototype per condition.
    ///
    /// Several documents for the same condition are averaged; the aggregated
    /// dataset normally has exactly one.
    pub fn train(documents: &[ConditionDocument]) -> Result<Self> {
        if documents.is_empty() {
            anyhow::bail!("No training documents: the dataset has no usable rows");
        }

        let texts: Vec<String> = documents.iter().map(|d| d.medicines.clone()).collect();
        let vectorizer = TfIdfVectorizer::fit(&texts);

        let mut sums: BTreeMap<String, HashMap<String, f64>> = BTreeMap::new();
        for doc in documents {
            let vector = vectorizer.transform(&doc.medicines);
            let sum = sums.entry(doc.condition.clone()).or_default();
            for (term, weight) in vector {
                *sum.entry(term).or_insert(0.0) += weight;
            }
        }

        let prototypes: BTreeMap<String, HashMap<String, f64>> = sums
            .into_iter()
            .map(|(condition, mut vector)| {
                normalize(&mut vector);
                (condition, vector)
            })
            .collect();

        info!(
            conditions = prototypes.len(),
            vocabulary = vectorizer.vocabulary_size(),
            "Trained condition classifier"
        );

        Ok(Self {
            vectorizer,
            prototypes,
            trained_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Cosine similarity of the query against every prototype.
    pub fn similarities(&self, medicines: &[String]) -> BTreeMap<String, f64> {
        let query = self.vectorizer.transform(&medicines_text(medicines));
        self.prototypes
            .iter()
            .map(|(condition, prototype)| (condition.clone(), cosine_from_weights(&query, prototype)))
            .collect()
    }

    pub fn condition_count(&self) -> usize {
        self.prototypes.len()
    }

    /// Write the model as JSON, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to save model to {}", path.display()))?;
        info!(path = %path.display(), "Saved condition model");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model from {}", path.display()))?;
        let model: Self = serde_json::from_str(&json)
            .with_context(|| format!("Model file {} is not a valid rxdiff model", path.display()))?;
        Ok(model)
    }
}

impl ConditionClassifier for PrototypeClassifier {
    fn predict_condition(&self, medicines: &[String]) -> Result<String> {
        let sims = self.similarities(medicines);
        let mut best: Option<(&String, f64)> = None;
        // BTreeMap iteration is alphabetical, so strict > keeps the first on ties
        for (condition, score) in &sims {
            if best.map_or(true, |(_, s)| *score > s) {
                best = Some((condition, *score));
            }
        }
        match best {
            Some((condition, _)) => Ok(condition.clone()),
            None => anyhow::bail!("Model has no conditions"),
        }
    }

    fn condition_probabilities(&self, medicines: &[String]) -> Result<BTreeMap<String, f64>> {
        let sims = self.similarities(medicines);
        if sims.is_empty() {
            anyhow::bail!("Model has no conditions");
        }

        let total: f64 = sims.values().sum();
        let count = sims.len() as f64;

        Ok(sims
            .into_iter()
            .map(|(condition, s)| {
                let p = if total > 0.0 { s / total } else { 1.0 / count };
                (condition, p)
            })
            .collect())
    }
}
