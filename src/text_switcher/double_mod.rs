//! Manual double-modifier override, deferred learning, and undo ([K]).
//!
//! The trigger chord itself is unchanged from the teacher's own hotkey-sequence
//! recognizer (double-tap Left Shift drives the existing `convert_last_word` action);
//! this module only adds what happens *after* that manual conversion lands: a deferred
//! learning timer that promotes repeated manual corrections into the forced-conversion
//! store, and a wider Ctrl+Z undo window that teaches the opposite lesson (a user
//! exception) when the correction is explicitly rejected.

use std::{
    collections::HashMap,
    sync::{
        LazyLock, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    thread,
    time::{Duration, Instant},
};

use rust_switcher_core::{config::TuningConfig, store::forced::Layout};

struct PendingLearn {
    word: String,
    layout: Layout,
    generation: u64,
    at: Instant,
}

static PENDING: Mutex<Option<PendingLearn>> = Mutex::new(None);
static GENERATION: AtomicU64 = AtomicU64::new(0);
static LAST_AUTO: Mutex<Option<(String, Instant)>> = Mutex::new(None);

/// Number of times a word must be rolled back before it is actually blacklisted into the
/// user-exception store. A single undo is often just a typo in the undo itself; two undos
/// of the same word is a real pattern.
const UNDO_STRIKE_THRESHOLD: u32 = 2;
static UNDO_STRIKES: LazyLock<Mutex<HashMap<String, u32>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn tuning() -> TuningConfig {
    crate::config::load().map(|c| c.tuning).unwrap_or_default()
}

/// Call right after a manual (double-tap) conversion lands. `word` is the original typed
/// text; `layout` is the layout the freshly converted spelling now belongs to.
pub fn on_manual_conversion(word: String, layout: Layout) {
    let generation = GENERATION.fetch_add(1, Ordering::AcqRel) + 1;
    *PENDING.lock().unwrap() = Some(PendingLearn {
        word: word.clone(),
        layout,
        generation,
        at: Instant::now(),
    });

    let delay_ms = u64::from(tuning().learning_delay_ms);
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(delay_ms));

        let pending = {
            let mut guard = PENDING.lock().unwrap();
            match guard.as_ref() {
                Some(p) if p.generation == generation => guard.take(),
                _ => None,
            }
        };
        let Some(pending) = pending else {
            return;
        };

        if let Err(e) = crate::text_switcher::stores::forced().learn(&pending.word, pending.layout)
        {
            tracing::warn!(error = %e, "manual override: learning failed");
        } else {
            tracing::trace!(word = %pending.word, "manual override: learned forced conversion");
            crate::text_switcher::coordinator::notify_learned(&pending.word);
        }
    });
}

/// Call right after an autoconvert lands, so a following Ctrl+Z within the rollback
/// window can be recognized as undoing it.
pub fn on_auto_conversion(word: String) {
    *LAST_AUTO.lock().unwrap() = Some((word, Instant::now()));
}

/// What a Ctrl+Z press is being checked against.
pub enum UndoTarget {
    /// The most recent manual (double-tap) conversion, within `cmd_z_undo_window_ms`.
    Manual { word: String },
    /// A recent automatic conversion, within `auto_rollback_window_ms`.
    Automatic { word: String, switched_at: Instant },
}

/// Returns `true` if this undo should be treated as a rollback of a recent conversion
/// (the caller restores the original text via the journal and swallows the keystroke);
/// `false` means it's an ordinary editor undo with no learning effect.
pub fn on_undo_pressed(target: UndoTarget) -> bool {
    match target {
        UndoTarget::Manual { word } => {
            let mut guard = PENDING.lock().unwrap();
            let matches = guard
                .as_ref()
                .is_some_and(|p| p.word == word && within(p.at, tuning().cmd_z_undo_window_ms));
            if !matches {
                return false;
            }
            guard.take();
            drop(guard);
            learn_exception(&word);
            true
        }
        UndoTarget::Automatic { word, switched_at } => {
            if !within(switched_at, tuning().auto_rollback_window_ms) {
                return false;
            }
            learn_exception(&word);
            true
        }
    }
}

/// Entry point for the keyboard hook's Ctrl+Z handling. Does not itself decide whether to
/// swallow the keystroke; the editor's own undo handles restoring the text, this only
/// teaches the store the correction was unwanted. Picks whichever of the pending manual
/// or automatic correction is more recent, since only one Ctrl+Z can apply to either.
pub fn on_ctrl_z() -> bool {
    let manual = PENDING.lock().unwrap().as_ref().map(|p| (p.word.clone(), p.at));
    let auto = LAST_AUTO.lock().unwrap().clone();
    let target = match (manual, auto) {
        (Some(m), Some(a)) if m.1 >= a.1 => UndoTarget::Manual { word: m.0 },
        (Some(m), None) => UndoTarget::Manual { word: m.0 },
        (_, Some(a)) => UndoTarget::Automatic {
            word: a.0,
            switched_at: a.1,
        },
        (None, None) => return false,
    };
    on_undo_pressed(target)
}

fn within(at: Instant, window_ms: u32) -> bool {
    at.elapsed() <= Duration::from_millis(u64::from(window_ms))
}

fn learn_exception(word: &str) {
    crate::text_switcher::coordinator::notify_rollback(word);

    let key = word.to_lowercase();
    let strikes = {
        let mut counts = UNDO_STRIKES.lock().unwrap();
        let count = counts.entry(key.clone()).or_insert(0);
        *count += 1;
        *count
    };

    if strikes < UNDO_STRIKE_THRESHOLD {
        tracing::trace!(word, strikes, "rollback: below blacklist threshold");
        return;
    }

    UNDO_STRIKES.lock().unwrap().remove(&key);

    if let Err(e) = crate::text_switcher::stores::exceptions().learn(word) {
        tracing::warn!(error = %e, word, "rollback: exception learning failed");
    }
}
