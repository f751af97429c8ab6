//! Wraps the existing lingua-based detector as a `DictionaryOracle` ([H]). The core
//! crate only knows the trait; this is the one real backend, kept in the application
//! because it carries lingua's dependency weight and model data.

use lingua::Language;
use rust_switcher_core::text::dictionary::{DictionaryAnswer, DictionaryOracle};

use crate::domain::text::last_word::{
    confidence, is_plausible_english_like_token, is_plausible_russian_like_token, language_detector,
};

const MIN_CONFIDENCE: f64 = 0.5;

#[derive(Debug, Default, Clone, Copy)]
pub struct LinguaDictionaryOracle;

impl DictionaryOracle for LinguaDictionaryOracle {
    fn lookup(&self, word: &str) -> DictionaryAnswer {
        if is_plausible_english_like_token(word) {
            return DictionaryAnswer::KnownEnglish;
        }
        if is_plausible_russian_like_token(word) {
            return DictionaryAnswer::KnownRussian;
        }

        let detector = language_detector();
        let en = confidence(detector, word, Language::English);
        let ru = confidence(detector, word, Language::Russian);
        if en.max(ru) < MIN_CONFIDENCE {
            DictionaryAnswer::Unknown
        } else if en >= ru {
            DictionaryAnswer::KnownEnglish
        } else {
            DictionaryAnswer::KnownRussian
        }
    }
}
