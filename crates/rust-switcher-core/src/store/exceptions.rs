//! Words the user has explicitly undone a conversion of often enough that the
//! validator now leaves them alone unconditionally ([E]).

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use serde::{Deserialize, Serialize};

use super::{StoreError, atomic::write_atomic};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Envelope {
    entries: Vec<String>,
}

pub struct UserExceptionStore {
    path: PathBuf,
    snapshot: Mutex<Arc<HashSet<String>>>,
}

impl UserExceptionStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let set = Self::read_from_disk(&path).unwrap_or_default();
        Self {
            path,
            snapshot: Mutex::new(Arc::new(set)),
        }
    }

    fn read_from_disk(path: &Path) -> Option<HashSet<String>> {
        let raw = std::fs::read_to_string(path).ok()?;
        let envelope: Envelope = serde_json::from_str(&raw).ok()?;
        Some(envelope.entries.into_iter().map(|w| w.to_lowercase()).collect())
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.snapshot.lock().unwrap().contains(&word.to_lowercase())
    }

    pub fn learn(&self, word: &str) -> Result<(), StoreError> {
        let mut guard = self.snapshot.lock().unwrap();
        let mut set = (**guard).clone();
        set.insert(word.to_lowercase());
        self.persist(&set)?;
        *guard = Arc::new(set);
        Ok(())
    }

    fn persist(&self, set: &HashSet<String>) -> Result<(), StoreError> {
        let mut entries: Vec<String> = set.iter().cloned().collect();
        entries.sort();
        write_atomic(&self.path, &Envelope { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rsw-exceptions-test-{}-{name}", std::process::id()))
    }

    #[test]
    fn unknown_word_is_not_an_exception() {
        let store = UserExceptionStore::load(temp_path("unknown"));
        assert!(!store.contains("privet"));
    }

    #[test]
    fn learn_then_contains_round_trips_through_disk() {
        let path = temp_path("roundtrip");
        std::fs::remove_file(&path).ok();
        let store = UserExceptionStore::load(&path);
        store.learn("privet").unwrap();
        assert!(store.contains("PRIVET"));

        let reloaded = UserExceptionStore::load(&path);
        assert!(reloaded.contains("privet"));
        std::fs::remove_file(&path).ok();
    }
}
