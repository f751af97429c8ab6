//! The hybrid validator ([H]): the layered decision pipeline that decides, for a single
//! candidate word, whether to leave it alone or switch it to its converted spelling.

use crate::{
    config::TuningConfig,
    history::Lang,
    store::{
        exceptions::UserExceptionStore,
        forced::{ForcedConversionStore, ForcedLookup},
    },
    text::{dictionary::DictionaryAnswer, dictionary::DictionaryOracle, ngram, sensitive, techterms},
};

#[derive(Debug, Clone, PartialEq)]
pub enum SwitchReason {
    /// Matched the forced-conversion store — skips scoring entirely. Carries the
    /// remembered spelling so the caller doesn't have to re-derive it from `converted`,
    /// and whether the match has crossed the hard-knowledge confirmation threshold.
    Forced {
        converted_word: String,
        is_hard_knowledge: bool,
    },
    /// Came out of n-gram scoring plus bias.
    Scored { confidence: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Keep,
    Switch(SwitchReason),
}

const SCORED_SWITCH_THRESHOLD: f64 = 0.5;

fn dominant_lang(s: &str) -> Option<Lang> {
    let mut cyr = 0usize;
    let mut lat = 0usize;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if ('\u{0400}'..='\u{04FF}').contains(&ch) {
                cyr += 1;
            } else if ch.is_ascii_alphabetic() {
                lat += 1;
            }
        }
    }
    match cyr.cmp(&lat) {
        std::cmp::Ordering::Greater => Some(Lang::Ru),
        std::cmp::Ordering::Less => Some(Lang::En),
        std::cmp::Ordering::Equal => None,
    }
}

pub struct HybridValidator<'a> {
    forced: &'a ForcedConversionStore,
    exceptions: &'a UserExceptionStore,
    dictionary: &'a dyn DictionaryOracle,
    tuning: TuningConfig,
}

impl<'a> HybridValidator<'a> {
    #[must_use]
    pub fn new(
        forced: &'a ForcedConversionStore,
        exceptions: &'a UserExceptionStore,
        dictionary: &'a dyn DictionaryOracle,
        tuning: TuningConfig,
    ) -> Self {
        Self {
            forced,
            exceptions,
            dictionary,
            tuning,
        }
    }

    /// `original` is the word as typed; `converted` is the same word run through the
    /// layout map in the direction that would "fix" it. `bias` is an optional hint from
    /// context/layout-switch history.
    #[must_use]
    pub fn validate(&self, original: &str, converted: &str, bias: Option<Lang>) -> Verdict {
        if sensitive::classify_token(original).is_some() {
            return Verdict::Keep;
        }

        if self.exceptions.contains(original) {
            return Verdict::Keep;
        }

        if let ForcedLookup::Found {
            converted_word,
            is_hard_knowledge,
            ..
        } = self.forced.lookup(original)
        {
            return Verdict::Switch(SwitchReason::Forced {
                converted_word: converted_word.unwrap_or_else(|| converted.to_string()),
                is_hard_knowledge,
            });
        }

        if original.chars().count() < self.tuning.min_word_length {
            return Verdict::Keep;
        }

        if techterms::contains(original) || techterms::might_be_compound(original) {
            return Verdict::Keep;
        }

        if original == converted {
            return Verdict::Keep;
        }

        let confidence = self.score_confidence(original, converted, bias);
        if confidence > SCORED_SWITCH_THRESHOLD {
            Verdict::Switch(SwitchReason::Scored { confidence })
        } else {
            Verdict::Keep
        }
    }

    fn score_confidence(&self, original: &str, converted: &str, bias: Option<Lang>) -> f64 {
        let mut confidence = if ngram::prefers_with(
            converted,
            original,
            self.tuning.unknown_probability,
            self.tuning.trigram_weight,
        ) {
            0.6
        } else {
            0.3
        };

        let converted_lang = dominant_lang(converted);
        let original_lang = dominant_lang(original);

        match (original_lang, self.dictionary.lookup(original)) {
            (Some(Lang::En), DictionaryAnswer::KnownEnglish)
            | (Some(Lang::Ru), DictionaryAnswer::KnownRussian) => confidence -= 0.3,
            _ => {}
        }

        match (converted_lang, self.dictionary.lookup(converted)) {
            (Some(Lang::En), DictionaryAnswer::KnownEnglish)
            | (Some(Lang::Ru), DictionaryAnswer::KnownRussian) => confidence += 0.2,
            _ => {}
        }

        if let (Some(bias), Some(converted_lang)) = (bias, converted_lang)
            && bias == converted_lang
        {
            confidence += 0.15;
        }

        confidence.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::dictionary::NullDictionaryOracle;

    fn stores() -> (ForcedConversionStore, UserExceptionStore) {
        let pid = std::process::id();
        let forced_path =
            std::env::temp_dir().join(format!("rsw-validator-forced-{pid}-{}", line!()));
        let exc_path =
            std::env::temp_dir().join(format!("rsw-validator-exc-{pid}-{}", line!()));
        std::fs::remove_file(&forced_path).ok();
        std::fs::remove_file(&exc_path).ok();
        (
            ForcedConversionStore::load(forced_path),
            UserExceptionStore::load(exc_path),
        )
    }

    #[test]
    fn sensitive_token_is_always_kept() {
        let (forced, exceptions) = stores();
        let dict = NullDictionaryOracle;
        let validator = HybridValidator::new(&forced, &exceptions, &dict, TuningConfig::default());
        let verdict = validator.validate(
            "550e8400-e29b-41d4-a716-446655440000",
            "converted-nonsense",
            None,
        );
        assert_eq!(verdict, Verdict::Keep);
    }

    #[test]
    fn user_exception_overrides_scoring() {
        let (forced, exceptions) = stores();
        exceptions.learn("ghbdtn").unwrap();
        let dict = NullDictionaryOracle;
        let validator = HybridValidator::new(&forced, &exceptions, &dict, TuningConfig::default());
        assert_eq!(validator.validate("ghbdtn", "привет", None), Verdict::Keep);
    }

    #[test]
    fn forced_conversion_switches_without_scoring() {
        let (forced, exceptions) = stores();
        forced
            .learn("ntcn", crate::store::forced::Layout::Ru)
            .unwrap();
        let dict = NullDictionaryOracle;
        let validator = HybridValidator::new(&forced, &exceptions, &dict, TuningConfig::default());
        assert_eq!(
            validator.validate("ntcn", "тест", None),
            Verdict::Switch(SwitchReason::Forced {
                converted_word: "тест".to_string(),
                is_hard_knowledge: false,
            })
        );
    }

    #[test]
    fn forced_conversion_becomes_hard_knowledge_after_repeated_learning() {
        let (forced, exceptions) = stores();
        forced
            .learn("ntcn", crate::store::forced::Layout::Ru)
            .unwrap();
        forced
            .learn("ntcn", crate::store::forced::Layout::Ru)
            .unwrap();
        forced
            .learn("ntcn", crate::store::forced::Layout::Ru)
            .unwrap();
        let dict = NullDictionaryOracle;
        let validator = HybridValidator::new(&forced, &exceptions, &dict, TuningConfig::default());
        assert_eq!(
            validator.validate("ntcn", "тест", None),
            Verdict::Switch(SwitchReason::Forced {
                converted_word: "тест".to_string(),
                is_hard_knowledge: true,
            })
        );
    }

    #[test]
    fn tech_term_is_kept_even_if_scoring_would_favor_conversion() {
        let (forced, exceptions) = stores();
        let dict = NullDictionaryOracle;
        let validator = HybridValidator::new(&forced, &exceptions, &dict, TuningConfig::default());
        assert_eq!(validator.validate("rust", "егысе", None), Verdict::Keep);
    }

    #[test]
    fn garbled_russian_typed_as_latin_is_switched() {
        let (forced, exceptions) = stores();
        let dict = NullDictionaryOracle;
        let validator = HybridValidator::new(&forced, &exceptions, &dict, TuningConfig::default());
        let verdict = validator.validate("ghbdtn", "привет", None);
        assert!(matches!(verdict, Verdict::Switch(SwitchReason::Scored { .. })));
    }
}
