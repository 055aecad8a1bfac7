// Jaccard similarity over drug-token sets, as a percentage.
//
//   |A ∩ B| / |A ∪ B| * 100, rounded to 2 decimal places, ties to even
//
// Only drug tokens count; the rest of the text does not affect the score.
// An empty union scores 0.0 rather than dividing by zero.

use super::traits::TokenSet;

/// Percentage overlap between two token sets, from 0.0 to 100.0.
pub fn similarity_percentage(original: &TokenSet, transcribed: &TokenSet) -> f64 {
    let matching = original.intersection(transcribed).count();
    let all = original.union(transcribed).count();

    if all == 0 {
        return 0.0;
    }

    round2(matching as f64 / all as f64 * 100.0)
}

/// 3.125 rounds to 3.12, 15.625 to 15.62.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
