//! Fixed vocabulary of technical terms that must never be auto-converted, even though
//! they often look like mistyped Russian (e.g. `json` typed on a Cyrillic layout reads
//! as gibberish either way, but it is itself already correct and should be left alone).

use std::{collections::HashSet, sync::LazyLock};

static TECH_TERMS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    let raw: Vec<String> =
        serde_json::from_str(include_str!("../../assets/tech_terms.json")).unwrap_or_default();
    raw.into_iter().map(|w| w.to_lowercase()).collect()
});

#[must_use]
pub fn contains(word: &str) -> bool {
    TECH_TERMS.contains(&word.to_lowercase())
}

/// Splits an identifier-looking token on case changes, `-`, and `_`, and checks whether
/// every resulting part is a known term (covers `camelCase`, `kebab-case`, `snake_case`
/// compounds of otherwise-short recognized words).
#[must_use]
pub fn might_be_compound(word: &str) -> bool {
    let parts = split_identifier_parts(word);
    if parts.len() < 2 {
        return false;
    }
    parts.iter().all(|p| contains(p))
}

fn split_identifier_parts(word: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in word.chars() {
        if ch == '-' || ch == '_' {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase();
        current.push(ch);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_term_matches_case_insensitively() {
        assert!(contains("Rust"));
        assert!(contains("JSON"));
        assert!(!contains("sdkjfhskjdfh"));
    }

    #[test]
    fn compound_identifier_splits_on_case_and_separators() {
        assert!(might_be_compound("gitCommit"));
        assert!(might_be_compound("git-commit"));
        assert!(might_be_compound("git_commit"));
        assert!(!might_be_compound("privet"));
    }
}
