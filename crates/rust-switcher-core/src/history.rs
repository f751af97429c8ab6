//! Context bias and layout-switch bias ([H.1]): two independent signals the hybrid
//! validator consults when n-gram scoring alone is inconclusive.

use std::{collections::VecDeque, time::Instant};

use crate::config::TuningConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    En,
    Ru,
}

struct ClassificationEvent {
    lang: Lang,
    at: Instant,
}

struct LayoutSwitchEvent {
    to: Lang,
    at: Instant,
}

/// Ring of recent word classifications plus the most recent observed keyboard-layout
/// switch. Callers drive time explicitly (`now: Instant`) rather than this type calling
/// `Instant::now()` itself, so bias computation is deterministic in tests.
pub struct ConversionHistory {
    classifications: VecDeque<ClassificationEvent>,
    last_layout_switch: Option<LayoutSwitchEvent>,
    tuning: TuningConfig,
}

const MAX_TRACKED_EVENTS: usize = 64;

impl ConversionHistory {
    #[must_use]
    pub fn new(tuning: TuningConfig) -> Self {
        Self {
            classifications: VecDeque::new(),
            last_layout_switch: None,
            tuning,
        }
    }

    pub fn record_classification(&mut self, lang: Lang, now: Instant) {
        self.classifications.push_back(ClassificationEvent { lang, at: now });
        if self.classifications.len() > MAX_TRACKED_EVENTS {
            self.classifications.pop_front();
        }
    }

    pub fn record_layout_switch(&mut self, to: Lang, now: Instant) {
        self.last_layout_switch = Some(LayoutSwitchEvent { to, at: now });
    }

    fn window(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.tuning.context_time_window_ms))
    }

    /// Returns the biased language if at least `min_context_words` of the trailing
    /// window were classified and more than `context_bias_threshold` of them agree.
    #[must_use]
    pub fn context_bias(&self, now: Instant) -> Option<Lang> {
        let window = self.window();
        let recent: Vec<Lang> = self
            .classifications
            .iter()
            .filter(|e| now.saturating_duration_since(e.at) <= window)
            .map(|e| e.lang)
            .collect();

        if recent.len() < self.tuning.min_context_words {
            return None;
        }

        let en = recent.iter().filter(|l| **l == Lang::En).count();
        let ru = recent.len() - en;
        let total = recent.len() as f64;

        if en as f64 / total > self.tuning.context_bias_threshold {
            return Some(Lang::En);
        }
        if ru as f64 / total > self.tuning.context_bias_threshold {
            return Some(Lang::Ru);
        }
        None
    }

    /// Returns the just-switched-to layout if the switch happened within
    /// `layout_bias_window_ms` of `now`.
    #[must_use]
    pub fn layout_switch_bias(&self, now: Instant) -> Option<Lang> {
        let window = std::time::Duration::from_millis(u64::from(self.tuning.layout_bias_window_ms));
        self.last_layout_switch
            .as_ref()
            .filter(|e| now.saturating_duration_since(e.at) <= window)
            .map(|e| e.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn context_bias_needs_minimum_word_count() {
        let mut history = ConversionHistory::new(TuningConfig::default());
        let t0 = Instant::now();
        history.record_classification(Lang::Ru, t0);
        assert_eq!(history.context_bias(t0), None);
    }

    #[test]
    fn context_bias_follows_majority_above_threshold() {
        let mut history = ConversionHistory::new(TuningConfig::default());
        let t0 = Instant::now();
        history.record_classification(Lang::Ru, t0);
        history.record_classification(Lang::Ru, t0);
        history.record_classification(Lang::En, t0);
        assert_eq!(history.context_bias(t0), Some(Lang::Ru));
    }

    #[test]
    fn context_bias_expires_outside_window() {
        let mut history = ConversionHistory::new(TuningConfig::default());
        let t0 = Instant::now();
        history.record_classification(Lang::Ru, t0);
        history.record_classification(Lang::Ru, t0);
        let later = t0 + Duration::from_secs(60);
        assert_eq!(history.context_bias(later), None);
    }

    #[test]
    fn layout_switch_bias_expires_after_window() {
        let mut history = ConversionHistory::new(TuningConfig::default());
        let t0 = Instant::now();
        history.record_layout_switch(Lang::En, t0);
        assert_eq!(history.layout_switch_bias(t0), Some(Lang::En));
        let later = t0 + Duration::from_secs(10);
        assert_eq!(history.layout_switch_bias(later), None);
    }
}
