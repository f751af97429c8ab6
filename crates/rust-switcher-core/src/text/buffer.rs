//! The live "word buffer": the run of code points typed since the last word boundary,
//! plus whatever trailing punctuation/whitespace immediately follows it.
//!
//! This is deliberately platform-agnostic: the Windows keyboard hook decodes keystrokes
//! into text and feeds them here; this type only knows about bounding and boundaries.

const MAX_LEN: usize = 50;
const TRUNCATE_TO: usize = 30;

#[derive(Debug, Default, Clone)]
pub struct WordBuffer {
    chars: Vec<char>,
    pending_punctuation: String,
}

impl WordBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.pending_punctuation.clear();
    }

    /// Appends a decoded keystroke. Whitespace/punctuation immediately following a
    /// non-empty word buffer is tracked as pending punctuation rather than appended to
    /// the word itself; two consecutive boundary characters close out the word (no
    /// further pending-punctuation accumulation is meaningful once a second arrives —
    /// the caller should have already consumed/reset between words by then).
    pub fn push(&mut self, ch: char) {
        if ch.is_whitespace() || is_word_boundary_punct(ch) {
            if !self.chars.is_empty() {
                self.pending_punctuation.push(ch);
            }
            return;
        }

        if !self.pending_punctuation.is_empty() {
            // A new word started; drop the old buffer and its trailing punctuation.
            self.chars.clear();
            self.pending_punctuation.clear();
        }

        self.chars.push(ch);
        if self.chars.len() > MAX_LEN {
            let drop = self.chars.len() - TRUNCATE_TO;
            self.chars.drain(0..drop);
        }
    }

    pub fn backspace(&mut self) {
        if !self.pending_punctuation.is_empty() {
            self.pending_punctuation.pop();
        } else {
            self.chars.pop();
        }
    }

    #[must_use]
    pub fn word(&self) -> String {
        self.chars.iter().collect()
    }

    #[must_use]
    pub fn pending_punctuation(&self) -> &str {
        &self.pending_punctuation
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

fn is_word_boundary_punct(ch: char) -> bool {
    matches!(ch, '.' | ',' | '!' | '?' | ';' | ':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_word_and_pending_punctuation_separately() {
        let mut buf = WordBuffer::new();
        for ch in "ghbdtn!".chars() {
            buf.push(ch);
        }
        assert_eq!(buf.word(), "ghbdtn");
        assert_eq!(buf.pending_punctuation(), "!");
    }

    #[test]
    fn truncates_overlong_runs_keeping_the_tail() {
        let mut buf = WordBuffer::new();
        for ch in std::iter::repeat_n('a', 60) {
            buf.push(ch);
        }
        assert_eq!(buf.word().chars().count(), TRUNCATE_TO);
    }

    #[test]
    fn new_word_after_punctuation_resets_buffer() {
        let mut buf = WordBuffer::new();
        for ch in "hello, world".chars() {
            buf.push(ch);
        }
        assert_eq!(buf.word(), "world");
    }

    #[test]
    fn backspace_undoes_pending_punctuation_first() {
        let mut buf = WordBuffer::new();
        for ch in "hi!".chars() {
            buf.push(ch);
        }
        buf.backspace();
        assert_eq!(buf.word(), "hi");
        assert_eq!(buf.pending_punctuation(), "");
    }
}
