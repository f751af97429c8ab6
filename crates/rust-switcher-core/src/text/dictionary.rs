//! Dictionary oracle: an optional, implementation-defined signal about whether a word is
//! a real word in a given language. The core crate only defines the trait and a
//! degrade-gracefully default; a real backend (e.g. a statistical language detector)
//! lives in the application that has a dependency budget for it.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryAnswer {
    KnownEnglish,
    KnownRussian,
    Unknown,
}

pub trait DictionaryOracle: Send + Sync {
    fn lookup(&self, word: &str) -> DictionaryAnswer;
}

/// Default oracle: always unknown. Callers must be able to reach a verdict without this
/// signal, since it's the only oracle guaranteed to be present.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDictionaryOracle;

impl DictionaryOracle for NullDictionaryOracle {
    fn lookup(&self, _word: &str) -> DictionaryAnswer {
        DictionaryAnswer::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_oracle_is_always_unknown() {
        let oracle = NullDictionaryOracle;
        assert_eq!(oracle.lookup("privet"), DictionaryAnswer::Unknown);
    }
}
