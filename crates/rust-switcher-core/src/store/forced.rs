//! Words the user has manually corrected often enough that the validator now switches
//! them unconditionally, skipping n-gram scoring ([D]).

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use super::{StoreError, atomic::write_atomic};
use crate::text::mapping;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Ru,
    En,
}

/// A single remembered word: the layout it was last confirmed in, the spelling it
/// converts to, and how many times the user has re-taught it. `confirmation_count`
/// reaching [`HARD_KNOWLEDGE_THRESHOLD`] is what the validator treats as "hard knowledge".
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    word: String,
    #[serde(default)]
    layout: Option<Layout>,
    #[serde(rename = "convertedWord", default)]
    converted_word: Option<String>,
    #[serde(rename = "confirmationCount", default = "default_confirmation_count")]
    confirmation_count: u32,
    #[serde(rename = "addedAt", default)]
    added_at: Option<String>,
}

fn default_confirmation_count() -> u32 {
    1
}

#[derive(Debug, Clone)]
struct Record {
    layout: Option<Layout>,
    converted_word: Option<String>,
    confirmation_count: u32,
    added_at: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Envelope {
    entries: Vec<Entry>,
}

/// Legacy shape: a bare array of words with no layout tag.
fn try_parse_legacy(raw: &str) -> Option<Envelope> {
    let words: Vec<String> = serde_json::from_str(raw).ok()?;
    Some(Envelope {
        entries: words
            .into_iter()
            .map(|word| Entry {
                word,
                layout: None,
                converted_word: None,
                confirmation_count: 1,
                added_at: None,
            })
            .collect(),
    })
}

fn parse_envelope(raw: &str) -> Result<Envelope, StoreError> {
    match serde_json::from_str::<Envelope>(raw) {
        Ok(envelope) => Ok(envelope),
        Err(e) => try_parse_legacy(raw).ok_or(StoreError::Serde(e)),
    }
}

/// Confirmation count at which a forced conversion stops being a "soft" hint and becomes
/// something the validator trusts without reservation.
const HARD_KNOWLEDGE_THRESHOLD: u32 = 3;

/// A word lookup result: either a remembered record, with the layout it last converted
/// in, its remembered converted spelling, and whether it has crossed the hard-knowledge
/// threshold, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForcedLookup {
    Found {
        layout: Option<Layout>,
        converted_word: Option<String>,
        is_hard_knowledge: bool,
    },
    NotFound,
}

pub struct ForcedConversionStore {
    path: PathBuf,
    snapshot: Mutex<Arc<HashMap<String, Record>>>,
}

impl ForcedConversionStore {
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = Self::read_from_disk(&path).unwrap_or_default();
        Self {
            path,
            snapshot: Mutex::new(Arc::new(map)),
        }
    }

    fn read_from_disk(path: &Path) -> Option<HashMap<String, Record>> {
        let raw = std::fs::read_to_string(path).ok()?;
        let envelope = parse_envelope(&raw).ok()?;
        Some(
            envelope
                .entries
                .into_iter()
                .map(|e| {
                    (
                        e.word.to_lowercase(),
                        Record {
                            layout: e.layout,
                            converted_word: e.converted_word,
                            confirmation_count: e.confirmation_count.max(1),
                            added_at: e.added_at,
                        },
                    )
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn lookup(&self, word: &str) -> ForcedLookup {
        let snapshot = self.snapshot.lock().unwrap().clone();
        match snapshot.get(&word.to_lowercase()) {
            Some(record) => ForcedLookup::Found {
                layout: record.layout,
                converted_word: record.converted_word.clone(),
                is_hard_knowledge: record.confirmation_count >= HARD_KNOWLEDGE_THRESHOLD,
            },
            None => ForcedLookup::NotFound,
        }
    }

    /// Teaches the store a forced conversion. Re-teaching an already known word
    /// increments its confirmation count instead of resetting it, which is how a word
    /// accumulates enough confirmations to become hard knowledge.
    pub fn learn(&self, word: &str, layout: Layout) -> Result<(), StoreError> {
        let mut guard = self.snapshot.lock().unwrap();
        let mut map = (**guard).clone();
        let key = word.to_lowercase();
        let converted = mapping::convert_ru_en_bidirectional(&key);

        map.entry(key)
            .and_modify(|record| {
                record.confirmation_count = record.confirmation_count.saturating_add(1);
                record.layout = Some(layout);
                record.converted_word = Some(converted.clone());
            })
            .or_insert_with(|| Record {
                layout: Some(layout),
                converted_word: Some(converted),
                confirmation_count: 1,
                added_at: Some(now_iso8601()),
            });

        self.persist(&map)?;
        *guard = Arc::new(map);
        Ok(())
    }

    fn persist(&self, map: &HashMap<String, Record>) -> Result<(), StoreError> {
        let envelope = Envelope {
            entries: map
                .iter()
                .map(|(word, record)| Entry {
                    word: word.clone(),
                    layout: record.layout,
                    converted_word: record.converted_word.clone(),
                    confirmation_count: record.confirmation_count,
                    added_at: record.added_at.clone(),
                })
                .collect(),
        };
        write_atomic(&self.path, &envelope)
    }
}

/// Seconds-since-epoch, as a decimal string. Good enough for a persisted "when did we
/// first learn this" marker; this crate has no calendar/timezone dependency to format a
/// proper timestamp with.
fn now_iso8601() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rsw-forced-test-{}-{name}", std::process::id()))
    }

    #[test]
    fn unknown_word_is_not_found() {
        let store = ForcedConversionStore::load(temp_path("unknown"));
        assert_eq!(store.lookup("ghbdtn"), ForcedLookup::NotFound);
    }

    #[test]
    fn learn_then_lookup_round_trips_through_disk() {
        let path = temp_path("roundtrip");
        std::fs::remove_file(&path).ok();
        let store = ForcedConversionStore::load(&path);
        store.learn("ghbdtn", Layout::Ru).unwrap();
        assert_eq!(
            store.lookup("GHBDTN"),
            ForcedLookup::Found {
                layout: Some(Layout::Ru),
                converted_word: Some("привет".to_string()),
                is_hard_knowledge: false,
            }
        );

        let reloaded = ForcedConversionStore::load(&path);
        assert_eq!(
            reloaded.lookup("ghbdtn"),
            ForcedLookup::Found {
                layout: Some(Layout::Ru),
                converted_word: Some("привет".to_string()),
                is_hard_knowledge: false,
            }
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn legacy_bare_array_shape_loads_as_soft_knowledge() {
        let path = temp_path("legacy");
        std::fs::write(&path, r#"["ghbdtn", "ntcn"]"#).unwrap();
        let store = ForcedConversionStore::load(&path);
        assert_eq!(
            store.lookup("ghbdtn"),
            ForcedLookup::Found {
                layout: None,
                converted_word: None,
                is_hard_knowledge: false,
            }
        );
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn repeated_learning_increments_confirmation_count_until_hard_knowledge() {
        let path = temp_path("hard-knowledge");
        std::fs::remove_file(&path).ok();
        let store = ForcedConversionStore::load(&path);

        store.learn("ntcn", Layout::Ru).unwrap();
        assert_eq!(
            store.lookup("ntcn"),
            ForcedLookup::Found {
                layout: Some(Layout::Ru),
                converted_word: Some("тест".to_string()),
                is_hard_knowledge: false,
            }
        );

        store.learn("ntcn", Layout::Ru).unwrap();
        store.learn("ntcn", Layout::Ru).unwrap();
        assert_eq!(
            store.lookup("ntcn"),
            ForcedLookup::Found {
                layout: Some(Layout::Ru),
                converted_word: Some("тест".to_string()),
                is_hard_knowledge: true,
            }
        );

        std::fs::remove_file(&path).ok();
    }
}
