// Term extractor trait: swap-ready abstraction.
//
// Candidate drug names currently come from a capitalization heuristic. A
// curated dictionary or an NER model can replace it later by implementing
// this trait; diffing and scoring only ever see the resulting set.

use std::collections::BTreeSet;

/// Unique candidate drug-name tokens pulled from one text.
pub type TokenSet = BTreeSet<String>;

/// Trait for pulling candidate medication names out of free text.
pub trait TermExtractor: Send + Sync {
    /// Extract the set of candidate drug-name tokens from `text`.
    fn extract_terms(&self, text: &str) -> TokenSet;
}
