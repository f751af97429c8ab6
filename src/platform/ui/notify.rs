//! Window-procedure glue for the info notification queue (see `info_notifier`).

use windows::Win32::{Foundation::HWND, UI::WindowsAndMessaging::WM_APP};

use crate::platform::win::state::with_state_mut_do;

/// Application private message signaling that `AppState::infos` is non empty.
pub const WM_APP_NOTIFY: u32 = WM_APP + 4;

/// Handles `WM_APP_NOTIFY` by draining and presenting one queued info notification.
pub fn on_wm_app_notify(hwnd: HWND) {
    with_state_mut_do(hwnd, |state| {
        super::info_notifier::drain_one_and_present(hwnd, state);
    });
}
