// Missing/extra computation for drug tokens and sentences.
//
// "Missing" means present in the original but not in the transcription;
// "extra" means present in the transcription but not in the original.
// Equality is exact, case-sensitive string equality.

use std::collections::HashSet;

use serde::Serialize;

use super::traits::TokenSet;

/// Drug tokens that differ between the two texts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermDiff {
    pub missing: TokenSet,
    pub extra: TokenSet,
}

/// Sentences that differ between the two texts, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentenceDiff {
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

/// Exact set difference in both directions.
pub fn diff_terms(original: &TokenSet, transcribed: &TokenSet) -> TermDiff {
    TermDiff {
        missing: original.difference(transcribed).cloned().collect(),
        extra: transcribed.difference(original).cloned().collect(),
    }
}

/// Membership filtering in both directions.
///
/// Each side keeps its own order and any repeated occurrences of a sentence
/// the other side lacks.
pub fn diff_sentences(original: &[String], transcribed: &[String]) -> SentenceDiff {
    SentenceDiff {
        missing: not_in(original, transcribed),
        extra: not_in(transcribed, original),
    }
}

fn not_in(items: &[String], other: &[String]) -> Vec<String> {
    let lookup: HashSet<&str> = other.iter().map(String::as_str).collect();
    items
        .iter()
        .filter(|s| !lookup.contains(s.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> TokenSet {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_term_diff() {
        let diff = diff_terms(
            &set(&["Administer", "Paracetamol"]),
            &set(&["Administer", "Ibuprofen"]),
        );
        assert_eq!(diff.missing, set(&["Paracetamol"]));
        assert_eq!(diff.extra, set(&["Ibuprofen"]));
    }

    #[test]
    fn test_term_diff_is_case_sensitive() {
        let diff = diff_terms(&set(&["Aspirin"]), &set(&["ASPIRIN", "Aspirin Plus"]));
        assert_eq!(diff.missing, set(&["Aspirin"]));
        assert_eq!(diff.extra, set(&["ASPIRIN", "Aspirin Plus"]));
    }

    #[test]
    fn test_sentence_diff_preserves_order_and_duplicates() {
        let original = list(&["b", "a", "b", "c"]);
        let transcribed = list(&["c", "d"]);
        let diff = diff_sentences(&original, &transcribed);
        assert_eq!(diff.missing, list(&["b", "a", "b"]));
        assert_eq!(diff.extra, list(&["d"]));
    }

    #[test]
    fn test_sentence_diff_no_normalization() {
        let diff = diff_sentences(&list(&["Take two  tablets"]), &list(&["Take two tablets"]));
        assert_eq!(diff.missing, list(&["Take two  tablets"]));
        assert_eq!(diff.extra, list(&["Take two tablets"]));
    }

    #[test]
    fn test_empty_sides() {
        let diff = diff_sentences(&[], &list(&["x"]));
        assert!(diff.missing.is_empty());
        assert_eq!(diff.extra, list(&["x"]));
    }
}
