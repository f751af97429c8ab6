use windows::Win32::UI::WindowsAndMessaging::{
    KBDLLHOOKSTRUCT, WM_KEYDOWN, WM_KEYUP, WM_SYSKEYDOWN, WM_SYSKEYUP,
};

use crate::config::{
    MODVK_LALT, MODVK_LCTRL, MODVK_LSHIFT, MODVK_LWIN, MODVK_RALT, MODVK_RCTRL, MODVK_RSHIFT,
    MODVK_RWIN,
};

const VK_LSHIFT: u32 = 0xA0;
const VK_RSHIFT: u32 = 0xA1;
const VK_LCONTROL: u32 = 0xA2;
const VK_RCONTROL: u32 = 0xA3;
const VK_LMENU: u32 = 0xA4;
const VK_RMENU: u32 = 0xA5;
const VK_LWIN: u32 = 0x5B;
const VK_RWIN: u32 = 0x5C;
const VK_SHIFT: u32 = 0x10;
const VK_CONTROL: u32 = 0x11;
const VK_MENU: u32 = 0x12;

const LLKHF_EXTENDED: u32 = 0x0100;

#[must_use]
pub fn is_keydown_msg(msg: u32) -> bool {
    matches!(msg, m if m == WM_KEYDOWN || m == WM_SYSKEYDOWN)
}

#[must_use]
pub fn is_keyup_msg(msg: u32) -> bool {
    matches!(msg, m if m == WM_KEYUP || m == WM_SYSKEYUP)
}

/// Resolves the generic "Shift/Control/Alt" virtual keys the hook can observe into their
/// left/right-specific counterpart, using the extended-key flag the same way
/// `GetMessageExtraInfo`-free low level hooks conventionally do.
#[must_use]
pub fn normalize_vk(kb: &KBDLLHOOKSTRUCT) -> u32 {
    let vk = kb.vkCode;
    let extended = kb.flags.0 & LLKHF_EXTENDED != 0;
    match vk {
        VK_SHIFT => {
            if extended {
                VK_RSHIFT
            } else {
                VK_LSHIFT
            }
        }
        VK_CONTROL => {
            if extended {
                VK_RCONTROL
            } else {
                VK_LCONTROL
            }
        }
        VK_MENU => {
            if extended {
                VK_RMENU
            } else {
                VK_LMENU
            }
        }
        other => other,
    }
}

#[must_use]
pub fn mod_bit_for_vk(vk: u32) -> Option<u32> {
    match vk {
        VK_LSHIFT => Some(MODVK_LSHIFT),
        VK_RSHIFT => Some(MODVK_RSHIFT),
        VK_LCONTROL => Some(MODVK_LCTRL),
        VK_RCONTROL => Some(MODVK_RCTRL),
        VK_LMENU => Some(MODVK_LALT),
        VK_RMENU => Some(MODVK_RALT),
        VK_LWIN => Some(MODVK_LWIN),
        VK_RWIN => Some(MODVK_RWIN),
        _ => None,
    }
}
