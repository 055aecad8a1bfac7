// Sentence splitting for sentence-level comparison.
//
// Splits on any run of '.', '!' or '?', trims each fragment, and drops the
// ones left empty. No further normalization: two sentences that differ only
// in inner whitespace or punctuation stay distinct.

/// Split raw text into trimmed, non-empty sentences in source order.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
