//! Tracks which modifier keys are currently held, as a bitmask of `config::MODVK_*` bits,
//! so the hook can assemble a `HotkeyChord` for a given keystroke without re-querying
//! `GetAsyncKeyState` (which would race with the low-level hook's own view of the world).

use std::sync::atomic::{AtomicU32, Ordering};

static HELD_MODS: AtomicU32 = AtomicU32::new(0);

pub(crate) fn set_held(bit: u32, down: bool) {
    if down {
        HELD_MODS.fetch_or(bit, Ordering::AcqRel);
    } else {
        HELD_MODS.fetch_and(!bit, Ordering::AcqRel);
    }
}

#[must_use]
pub(crate) fn held_mods_vks() -> u32 {
    HELD_MODS.load(Ordering::Acquire)
}
