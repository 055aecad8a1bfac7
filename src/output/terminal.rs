// Colored terminal output for comparison reports and condition predictions.

use std::collections::BTreeMap;

use colored::{ColoredString, Colorize};

use crate::compare::ComparisonResult;

use super::truncate_chars;

/// Longest sentence shown in full before truncation.
const SENTENCE_PREVIEW_CHARS: usize = 120;

/// Display a full comparison report.
pub fn display_comparison(result: &ComparisonResult) {
    println!("\n{}", "=== Transcript Comparison ===".bold());
    println!();

    println!(
        "  Drug name similarity: {}",
        colorize_similarity(result.similarity_percentage)
    );
    println!();

    display_drug_list("Missing drugs", "-", &result.missing_drugs);
    display_drug_list("Extra drugs", "+", &result.extra_drugs);

    display_sentence_list("Missing sentences", "-", &result.missing_sentences);
    display_sentence_list("Extra sentences", "+", &result.extra_sentences);

    if result.is_exact_match() {
        println!("  {}", "Transcription matches the original.".green().bold());
    }
}

fn display_drug_list<'a>(
    title: &str,
    marker: &str,
    drugs: impl IntoIterator<Item = &'a String>,
) {
    let drugs: Vec<&String> = drugs.into_iter().collect();
    println!("  {} ({})", title.bold(), drugs.len());
    if drugs.is_empty() {
        println!("    {}", "none".dimmed());
    }
    for drug in drugs {
        println!("    {} {}", colorize_marker(marker), drug);
    }
    println!();
}

fn display_sentence_list(title: &str, marker: &str, sentences: &[String]) {
    println!("  {} ({})", title.bold(), sentences.len());
    if sentences.is_empty() {
        println!("    {}", "none".dimmed());
    }
    for sentence in sentences {
        println!(
            "    {} {}",
            colorize_marker(marker),
            truncate_chars(sentence, SENTENCE_PREVIEW_CHARS)
        );
    }
    println!();
}

fn colorize_marker(marker: &str) -> ColoredString {
    match marker {
        "-" => marker.red().bold(),
        "+" => marker.yellow().bold(),
        _ => marker.normal(),
    }
}

/// Green from 90%, yellow from 50%, red below.
fn colorize_similarity(percentage: f64) -> ColoredString {
    let text = format!("{percentage:.2}%");
    if percentage >= 90.0 {
        text.green().bold()
    } else if percentage >= 50.0 {
        text.yellow().bold()
    } else {
        text.red().bold()
    }
}

/// Display a condition prediction with per-condition probabilities,
/// highest first.
pub fn display_prediction(
    medicines: &[String],
    condition: &str,
    probabilities: &BTreeMap<String, f64>,
) {
    println!("\n{}", "=== Condition Prediction ===".bold());
    println!("  Medicines: {}", medicines.join(", "));
    println!("  Predicted condition: {}", condition.bold().green());
    println!();
    println!("  {}", "Probabilities for each condition:".dimmed());

    let mut ranked: Vec<(&String, &f64)> = probabilities.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));

    for (cond, prob) in ranked {
        println!("    {:<32} {:>7.2}%", cond, prob * 100.0);
    }
}
