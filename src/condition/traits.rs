// Condition classifier trait: swap-ready abstraction.
//
// The bundled implementation is a TF-IDF prototype matcher. A proper
// statistical model can slot in behind the same interface.

use std::collections::BTreeMap;

use anyhow::Result;

/// Trait for mapping a set of medicine names to a medical condition.
pub trait ConditionClassifier: Send + Sync {
    /// The single most likely condition for these medicines.
    fn predict_condition(&self, medicines: &[String]) -> Result<String>;

    /// Probability for every known condition. Values sum to 1.0.
    fn condition_probabilities(&self, medicines: &[String]) -> Result<BTreeMap<String, f64>>;
}

/// Join medicines the same way training documents are joined.
pub fn medicines_text(medicines: &[String]) -> String {
    medicines.join(", ")
}
