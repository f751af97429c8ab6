use crate::config::{self, MODVK_LCTRL, MODVK_RCTRL};

use super::{HookDecision, mods, now_tick_ms, vk::mod_bit_for_vk};

const VK_Z: u32 = 0x5A;

/// Handles a single `WH_KEYBOARD_LL` key-down. Updates the held-modifiers bitmask and,
/// for modifier keys, feeds the chord-sequence recognizer so a configured double-tap
/// (e.g. double Left Shift) fires its bound hotkey. Ctrl+Z is watched separately: it is
/// never swallowed (the foreground editor's own undo still runs), but a Ctrl+Z shortly
/// after a switcher conversion teaches the store that the correction was unwanted.
pub(crate) fn handle_keydown(vk: u32, is_mod: bool) -> windows::core::Result<HookDecision> {
    if vk == VK_Z && mods::held_mods_vks() & (MODVK_LCTRL | MODVK_RCTRL) != 0 {
        let _ = crate::text_switcher::double_mod::on_ctrl_z();
    }

    let Some(bit) = mod_bit_for_vk(vk) else {
        return Ok(HookDecision::Pass);
    };

    if !is_mod {
        return Ok(HookDecision::Pass);
    }

    mods::set_held(bit, true);

    let Some(hwnd) = super::main_hwnd() else {
        return Ok(HookDecision::Pass);
    };

    let chord = config::HotkeyChord {
        mods: 0,
        mods_vks: bit,
        vk: None,
    };
    let now_ms = now_tick_ms();

    let mut matched = false;
    let mut failure = None;
    crate::platform::win::state::with_state_mut_do(hwnd, |state| {
        match super::sequence::try_match_any_sequence(hwnd, state, chord, now_ms) {
            Ok(m) => matched = m,
            Err(e) => failure = Some(e),
        }
    });

    if let Some(e) = failure {
        return Err(e);
    }

    Ok(if matched {
        HookDecision::Swallow
    } else {
        HookDecision::Pass
    })
}
