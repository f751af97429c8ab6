//! Testing/CLI driver ([M]): a pure, Win32-free function that rewrites a string the same
//! way the application would rewrite live keystrokes, used both for golden tests and as
//! the shared core for the application's last-word/selection conversion paths.

use crate::{
    config::TuningConfig,
    history::Lang,
    store::{exceptions::UserExceptionStore, forced::ForcedConversionStore},
    text::{dictionary::DictionaryOracle, mapping, sensitive},
    validator::{HybridValidator, Verdict},
};

fn rewrite_word(validator: &HybridValidator<'_>, word: &str, bias: Option<Lang>) -> String {
    if let Some((stem, ext)) = sensitive::split_file_path_stem(word) {
        let converted_stem = mapping::convert_ru_en_bidirectional(stem);
        return format!("{converted_stem}.{ext}");
    }

    let converted = mapping::convert_ru_en_bidirectional(word);
    match validator.validate(word, &converted, bias) {
        Verdict::Keep => word.to_string(),
        Verdict::Switch(_) => converted,
    }
}

fn rewrite_line(validator: &HybridValidator<'_>, line: &str, bias: Option<Lang>) -> String {
    if sensitive::starts_cli_invocation(line) {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len());
    let mut word_start: Option<usize> = None;

    for (idx, ch) in line.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                out.push_str(&rewrite_word(validator, &line[start..idx], bias));
            }
            out.push(ch);
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }
    if let Some(start) = word_start {
        out.push_str(&rewrite_word(validator, &line[start..], bias));
    }

    out
}

/// Rewrites `text`, converting each eligible word candidate per the hybrid validator.
/// `bias` is an optional context/layout-switch hint (see [H.1]); pass `None` when no
/// history is available (e.g. one-off CLI invocations of this driver).
#[must_use]
pub fn rewrite(
    text: &str,
    forced: &ForcedConversionStore,
    exceptions: &UserExceptionStore,
    dictionary: &dyn DictionaryOracle,
    tuning: TuningConfig,
    bias: Option<Lang>,
) -> String {
    let validator = HybridValidator::new(forced, exceptions, dictionary, tuning);

    let mut out = String::with_capacity(text.len());
    let mut lines = text.split('\n').peekable();
    while let Some(line) = lines.next() {
        out.push_str(&rewrite_line(&validator, line, bias));
        if lines.peek().is_some() {
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::dictionary::NullDictionaryOracle;

    fn fresh_stores(tag: &str) -> (ForcedConversionStore, UserExceptionStore) {
        let pid = std::process::id();
        let forced_path = std::env::temp_dir().join(format!("rsw-pipeline-forced-{pid}-{tag}"));
        let exc_path = std::env::temp_dir().join(format!("rsw-pipeline-exc-{pid}-{tag}"));
        std::fs::remove_file(&forced_path).ok();
        std::fs::remove_file(&exc_path).ok();
        (
            ForcedConversionStore::load(forced_path),
            UserExceptionStore::load(exc_path),
        )
    }

    fn rewrite_default(text: &str, tag: &str) -> String {
        let (forced, exceptions) = fresh_stores(tag);
        let dict = NullDictionaryOracle;
        rewrite(text, &forced, &exceptions, &dict, TuningConfig::default(), None)
    }

    #[test]
    fn plain_mistyped_word_converts() {
        assert_eq!(rewrite_default("ghbdtn", "t1"), "привет");
    }

    #[test]
    fn trailing_punctuation_is_preserved_unconverted() {
        assert_eq!(rewrite_default("ghbdtn!", "t2"), "привет!");
    }

    #[test]
    fn multi_word_sentence_converts_each_word_independently() {
        assert_eq!(
            rewrite_default("Ctqxfc Dkflf tot gjghjie", "t3"),
            "Сейчас Влада еще попрошу"
        );
    }

    #[test]
    fn uuid_is_left_unchanged() {
        let input = "550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(rewrite_default(input, "t4"), input);
    }

    #[test]
    fn known_extension_file_name_converts_holistically() {
        assert_eq!(rewrite_default("зфслфпу.json", "t5"), "package.json");
    }

    #[test]
    fn already_correct_file_name_stays_unchanged() {
        assert_eq!(rewrite_default("package.json", "t5b"), "package.json");
        assert_eq!(rewrite_default("README.md", "t5c"), "README.md");
    }

    #[test]
    fn cli_invocation_line_is_left_untouched() {
        assert_eq!(rewrite_default("yarn dlx ghbdtn", "t6"), "yarn dlx ghbdtn");
    }
}
