use super::{HookDecision, mods, vk::mod_bit_for_vk};

/// Handles a single `WH_KEYBOARD_LL` key-up. Only clears the held-modifiers bitmask;
/// sequence progress lives across key-ups so a double-tap can complete.
pub(crate) fn handle_keyup(vk: u32, is_mod: bool) -> windows::core::Result<HookDecision> {
    if let Some(bit) = mod_bit_for_vk(vk) {
        mods::set_held(bit, false);
    }
    let _ = is_mod;
    Ok(HookDecision::Pass)
}
