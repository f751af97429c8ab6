//! Human-readable names for the four hotkey actions, used in duplicate-sequence
//! error messages so users see "Convert last word" instead of a field name.

pub const CONVERT_LAST_WORD: &str = "Convert last word";
pub const CONVERT_SELECTION: &str = "Convert selection";
pub const PAUSE: &str = "Pause autoconvert";
pub const SWITCH_LAYOUT: &str = "Switch keyboard layout";
