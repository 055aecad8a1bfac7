// Transcript comparison: the core engine.
//
// Takes two plain texts (the reference report and a transcription of it)
// and reports which drug tokens and sentences went missing or appeared,
// plus a Jaccard similarity score over the drug tokens. Pure and
// synchronous: nothing here does I/O or keeps state between calls.

pub mod capitalized;
pub mod diff;
pub mod sentences;
pub mod similarity;
pub mod traits;

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use self::capitalized::CapitalizedTermExtractor;
use self::diff::{diff_sentences, diff_terms};
use self::sentences::split_sentences;
use self::similarity::similarity_percentage;
use self::traits::{TermExtractor, TokenSet};

/// Which of the two inputs a validation failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Original,
    Transcribed,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Original => write!(f, "original report"),
            Side::Transcribed => write!(f, "transcription"),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CompareError {
    #[error("No text provided for the {side}")]
    InputMissing { side: Side },
}

/// Everything that differs between an original report and its transcription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Drug tokens in the original but not in the transcription
    pub missing_drugs: TokenSet,
    /// Drug tokens in the transcription but not in the original
    pub extra_drugs: TokenSet,
    /// Original sentences absent from the transcription, in original order
    pub missing_sentences: Vec<String>,
    /// Transcribed sentences absent from the original, in transcribed order
    pub extra_sentences: Vec<String>,
    /// Jaccard overlap of the two drug-token sets, 0.0 to 100.0
    pub similarity_percentage: f64,
}

impl ComparisonResult {
    /// True when neither drugs nor sentences differ.
    pub fn is_exact_match(&self) -> bool {
        self.missing_drugs.is_empty()
            && self.extra_drugs.is_empty()
            && self.missing_sentences.is_empty()
            && self.extra_sentences.is_empty()
    }
}

/// Compare two texts using the default capitalization heuristic.
pub fn compare(original_text: &str, wrong_text: &str) -> Result<ComparisonResult, CompareError> {
    compare_with(&CapitalizedTermExtractor, original_text, wrong_text)
}

/// Compare two texts with a caller-supplied term extractor.
///
/// Both texts must be non-empty. Validation happens before any work, so a
/// failure never leaves a partially computed result behind.
pub fn compare_with(
    extractor: &dyn TermExtractor,
    original_text: &str,
    wrong_text: &str,
) -> Result<ComparisonResult, CompareError> {
    if original_text.is_empty() {
        return Err(CompareError::InputMissing {
            side: Side::Original,
        });
    }
    if wrong_text.is_empty() {
        return Err(CompareError::InputMissing {
            side: Side::Transcribed,
        });
    }

    let original_drugs = extractor.extract_terms(original_text);
    let transcribed_drugs = extractor.extract_terms(wrong_text);
    let drugs = diff_terms(&original_drugs, &transcribed_drugs);

    let sentences = diff_sentences(&split_sentences(original_text), &split_sentences(wrong_text));

    let similarity_percentage = similarity_percentage(&original_drugs, &transcribed_drugs);

    debug!(
        original_drugs = original_drugs.len(),
        transcribed_drugs = transcribed_drugs.len(),
        missing_sentences = sentences.missing.len(),
        extra_sentences = sentences.extra.len(),
        similarity_percentage,
        "Compared transcripts"
    );

    Ok(ComparisonResult {
        missing_drugs: drugs.missing,
        extra_drugs: drugs.extra,
        missing_sentences: sentences.missing,
        extra_sentences: sentences.extra,
        similarity_percentage,
    })
}
