//! CLI-mode latch ([M]): once a line is recognized as a CLI invocation, conversion stays
//! suppressed for the rest of that line even though later tokens on their own would look
//! like ordinary convertible words.

use crate::text::sensitive::starts_cli_invocation;

#[derive(Debug, Default)]
pub struct CliModeLatch {
    armed: bool,
}

impl CliModeLatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Feeds the current (possibly partial) line. Arms the latch the first time the
    /// line's first token is a recognized CLI runner; a no-op once already armed.
    pub fn observe_line(&mut self, line: &str) {
        if !self.armed && starts_cli_invocation(line) {
            self.armed = true;
        }
    }

    /// Clears the latch. Call on Enter, Escape, or a foreground-window change.
    pub fn clear(&mut self) {
        self.armed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arms_on_recognized_runner_and_stays_armed_for_rest_of_line() {
        let mut latch = CliModeLatch::new();
        latch.observe_line("yarn");
        assert!(latch.is_armed());
        latch.observe_line("yarn dlx ghbdtn");
        assert!(latch.is_armed());
    }

    #[test]
    fn does_not_arm_for_ordinary_words() {
        let mut latch = CliModeLatch::new();
        latch.observe_line("ghbdtn");
        assert!(!latch.is_armed());
    }

    #[test]
    fn clear_resets_the_latch() {
        let mut latch = CliModeLatch::new();
        latch.observe_line("git status");
        latch.clear();
        assert!(!latch.is_armed());
    }
}
