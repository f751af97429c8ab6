//! Bigram/trigram plausibility scoring, used by the hybrid validator to compare a
//! candidate word against the same word converted to the other layout.

use std::{collections::HashMap, sync::LazyLock};

use serde::Deserialize;

#[derive(Deserialize)]
struct NgramBundle {
    bigrams: HashMap<String, f64>,
    trigrams: HashMap<String, f64>,
}

static BUNDLE: LazyLock<NgramBundle> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../../assets/ngrams.json")).unwrap_or(NgramBundle {
        bigrams: HashMap::new(),
        trigrams: HashMap::new(),
    })
});

/// Per spec.md §6: unknown n-grams do not score zero, they score a small fixed floor,
/// so a single unseen n-gram in an otherwise plausible word does not veto it outright.
/// These mirror `TuningConfig`'s defaults and back the parameterless convenience
/// functions below; callers that hold a `TuningConfig` should prefer the `_with`
/// variants so a user's tuning actually affects scoring.
pub const UNKNOWN_PROBABILITY: f64 = 1e-5;
pub const TRIGRAM_WEIGHT: f64 = 1.5;

fn windows(word: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = word.to_lowercase().chars().collect();
    if chars.len() < n {
        return Vec::new();
    }
    (0..=chars.len() - n)
        .map(|i| chars[i..i + n].iter().collect())
        .collect()
}

/// Returns a plausibility score for `word`. Higher is more plausible. Not a probability
/// (the trigram weighting deliberately breaks normalization) — only meaningful as a
/// relative comparison between two candidate spellings of the same token.
#[must_use]
pub fn score_with(word: &str, unknown_probability: f64, trigram_weight: f64) -> f64 {
    let bigram_score: f64 = windows(word, 2)
        .iter()
        .map(|bg| *BUNDLE.bigrams.get(bg).unwrap_or(&unknown_probability))
        .sum();

    let trigram_score: f64 = windows(word, 3)
        .iter()
        .map(|tg| *BUNDLE.trigrams.get(tg).unwrap_or(&unknown_probability))
        .sum();

    bigram_score + trigram_weight * trigram_score
}

#[must_use]
pub fn score(word: &str) -> f64 {
    score_with(word, UNKNOWN_PROBABILITY, TRIGRAM_WEIGHT)
}

/// Compares two spellings of the same underlying word and returns `true` if `candidate`
/// scores strictly higher than `original`, using caller-supplied tuning.
#[must_use]
pub fn prefers_with(
    candidate: &str,
    original: &str,
    unknown_probability: f64,
    trigram_weight: f64,
) -> bool {
    score_with(candidate, unknown_probability, trigram_weight)
        > score_with(original, unknown_probability, trigram_weight)
}

/// Same as [`prefers_with`], using the default tuning constants.
#[must_use]
pub fn prefers(candidate: &str, original: &str) -> bool {
    prefers_with(candidate, original, UNKNOWN_PROBABILITY, TRIGRAM_WEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_word_scores_higher_than_garbled_one() {
        assert!(prefers("привет", "ghbdtn"));
    }

    #[test]
    fn empty_word_scores_zero() {
        assert_eq!(score(""), 0.0);
    }

    #[test]
    fn unknown_ngrams_still_produce_a_nonzero_floor() {
        assert!(score("qzxjk") > 0.0);
    }
}
