//! Tuning constants for the hybrid validator and the manual-override learning path.
//!
//! Plain data, no persistence here — the Windows application embeds this struct inside
//! its own `confy`-backed config and persists it there.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TuningConfig {
    pub double_cmd_threshold_ms: u32,
    pub auto_rollback_window_ms: u32,
    pub cmd_z_undo_window_ms: u32,
    pub learning_delay_ms: u32,
    pub layout_bias_window_ms: u32,
    pub context_time_window_ms: u32,
    pub context_bias_threshold: f64,
    pub min_context_words: usize,
    pub min_word_length: usize,
    pub unknown_probability: f64,
    pub trigram_weight: f64,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            double_cmd_threshold_ms: 400,
            auto_rollback_window_ms: 3_000,
            cmd_z_undo_window_ms: 10_000,
            learning_delay_ms: 2_000,
            layout_bias_window_ms: 5_000,
            context_time_window_ms: 30_000,
            context_bias_threshold: 0.5,
            min_context_words: 2,
            min_word_length: 2,
            unknown_probability: 1e-5,
            trigram_weight: 1.5,
        }
    }
}
