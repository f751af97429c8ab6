//! Coordinator ([L]): owns enable/disable, pause/resume, running counters, and the
//! observer hook the rest of the application (tray icon, notifications) subscribes to
//! instead of polling.

use std::sync::{
    Mutex, OnceLock,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

/// A transient, externally-driven suspension distinct from the user's own enable/disable
/// toggle — e.g. a collaborating dictation feature holding the switcher off while it
/// speaks into the focused field. Not persisted; cleared the moment the holder drops it.
pub trait ExternalPauseSource: Send + Sync {
    fn is_pausing(&self) -> bool;
}

/// Subscribers learn about switcher activity instead of polling counters.
pub trait TextSwitcherObserver: Send + Sync {
    fn on_auto_switch(&self, _word: &str, _converted: &str) {}
    fn on_manual_switch(&self, _word: &str, _converted: &str) {}
    fn on_learned(&self, _word: &str) {}
    fn on_rollback(&self, _word: &str) {}
}

#[derive(Debug, Default)]
pub struct Counters {
    pub auto_switches: u64,
    pub manual_switches: u64,
    pub rollbacks: u64,
    pub learned: u64,
}

struct RawCounters {
    auto_switches: AtomicU64,
    manual_switches: AtomicU64,
    rollbacks: AtomicU64,
    learned: AtomicU64,
}

impl RawCounters {
    const fn new() -> Self {
        Self {
            auto_switches: AtomicU64::new(0),
            manual_switches: AtomicU64::new(0),
            rollbacks: AtomicU64::new(0),
            learned: AtomicU64::new(0),
        }
    }

    fn snapshot(&self) -> Counters {
        Counters {
            auto_switches: self.auto_switches.load(Ordering::Relaxed),
            manual_switches: self.manual_switches.load(Ordering::Relaxed),
            rollbacks: self.rollbacks.load(Ordering::Relaxed),
            learned: self.learned.load(Ordering::Relaxed),
        }
    }
}

static ENABLED: AtomicBool = AtomicBool::new(true);
static COUNTERS: RawCounters = RawCounters::new();

fn observers() -> &'static Mutex<Vec<Box<dyn TextSwitcherObserver>>> {
    static OBSERVERS: OnceLock<Mutex<Vec<Box<dyn TextSwitcherObserver>>>> = OnceLock::new();
    OBSERVERS.get_or_init(|| Mutex::new(Vec::new()))
}

fn pause_sources() -> &'static Mutex<Vec<Box<dyn ExternalPauseSource>>> {
    static SOURCES: OnceLock<Mutex<Vec<Box<dyn ExternalPauseSource>>>> = OnceLock::new();
    SOURCES.get_or_init(|| Mutex::new(Vec::new()))
}

/// Hard, user-initiated, persisted switch: when disabled, no detection or conversion
/// runs at all.
#[must_use]
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Acquire)
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Release);
}

/// A transient suspension layered on top of enable/disable: `true` if disabled, or if
/// any registered external source is currently asking for a pause.
#[must_use]
pub fn is_suspended() -> bool {
    !is_enabled() || pause_sources().lock().unwrap().iter().any(|s| s.is_pausing())
}

pub fn register_pause_source(source: Box<dyn ExternalPauseSource>) {
    pause_sources().lock().unwrap().push(source);
}

pub fn register_observer(observer: Box<dyn TextSwitcherObserver>) {
    observers().lock().unwrap().push(observer);
}

#[must_use]
pub fn counters() -> Counters {
    COUNTERS.snapshot()
}

pub fn notify_auto_switch(word: &str, converted: &str) {
    COUNTERS.auto_switches.fetch_add(1, Ordering::Relaxed);
    for observer in observers().lock().unwrap().iter() {
        observer.on_auto_switch(word, converted);
    }
}

pub fn notify_manual_switch(word: &str, converted: &str) {
    COUNTERS.manual_switches.fetch_add(1, Ordering::Relaxed);
    for observer in observers().lock().unwrap().iter() {
        observer.on_manual_switch(word, converted);
    }
}

pub fn notify_learned(word: &str) {
    COUNTERS.learned.fetch_add(1, Ordering::Relaxed);
    for observer in observers().lock().unwrap().iter() {
        observer.on_learned(word);
    }
}

pub fn notify_rollback(word: &str) {
    COUNTERS.rollbacks.fetch_add(1, Ordering::Relaxed);
    for observer in observers().lock().unwrap().iter() {
        observer.on_rollback(word);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysPausing;
    impl ExternalPauseSource for AlwaysPausing {
        fn is_pausing(&self) -> bool {
            true
        }
    }

    #[test]
    fn disabled_implies_suspended_regardless_of_pause_sources() {
        set_enabled(false);
        assert!(is_suspended());
        set_enabled(true);
    }

    #[test]
    fn counters_start_at_zero_and_increment() {
        let before = counters().auto_switches;
        notify_auto_switch("ghbdtn", "привет");
        assert_eq!(counters().auto_switches, before + 1);
    }
}
