// Capitalization-based drug-name extraction: the default TermExtractor.
//
// A token is one capitalized word (an uppercase ASCII letter followed by one
// or more lowercase letters), optionally followed by a single space and a
// second capitalized word. Matching is greedy, so "Vitamin Dee" is one token.
// Word boundaries are Unicode-aware: accented letters count as word
// characters, so "Café" is not cut down to "Caf".
//
// Known limitations: every sentence-initial word and proper noun is picked
// up, and hyphenated, lowercase, or three-word drug names are missed.

use std::sync::LazyLock;

use regex::Regex;

use super::traits::{TermExtractor, TokenSet};

static CAPITALIZED_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?: [A-Z][a-z]+)?\b").expect("drug-name pattern is valid")
});

/// Extracts capitalized words and capitalized word pairs as candidate drug names.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapitalizedTermExtractor;

impl TermExtractor for CapitalizedTermExtractor {
    fn extract_terms(&self, text: &str) -> TokenSet {
        CAPITALIZED_TERM
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<String> {
        CapitalizedTermExtractor
            .extract_terms(text)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_single_capitalized_words() {
        assert_eq!(
            terms("Patient given Paracetamol and Ibuprofen daily"),
            vec!["Ibuprofen", "Paracetamol", "Patient"]
        );
    }

    #[test]
    fn test_adjacent_words_form_one_token() {
        assert_eq!(terms("start Folic Acid today"), vec!["Folic Acid"]);
    }

    #[test]
    fn test_three_words_split_into_pair_and_single() {
        assert_eq!(
            terms("Sodium Valproate Chrono"),
            vec!["Chrono", "Sodium Valproate"]
        );
    }

    #[test]
    fn test_requires_lowercase_tail() {
        // All-caps, single letters, and mixed case never match on their own
        assert!(terms("NSAID X given with aspirin").is_empty());
        assert!(terms("McDonald").is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(terms("Aspirin, then Aspirin again"), vec!["Aspirin"]);
    }

    #[test]
    fn test_double_space_breaks_pair() {
        assert_eq!(terms("Metformin  Glipizide"), vec!["Glipizide", "Metformin"]);
    }

    #[test]
    fn test_hyphenated_names_are_fragmented() {
        // "Co-Amoxiclav": "Co" matches, "Amoxiclav" is preceded by a hyphen
        // which is a word boundary, so both halves come out separately.
        assert_eq!(terms("Co-Amoxiclav"), vec!["Amoxiclav", "Co"]);
    }

    #[test]
    fn test_accented_words_are_not_truncated() {
        assert!(terms("Café Naïve").is_empty());
        assert_eq!(terms("Paracetamol après Ibuprofène"), vec!["Paracetamol"]);
    }

    #[test]
    fn test_empty_text() {
        assert!(terms("").is_empty());
    }
}
