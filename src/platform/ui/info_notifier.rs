//! Queues non-error informational notifications, mirroring `error_notifier` but
//! presenting through an info-styled tray balloon instead of a message box fallback.

use windows::Win32::{
    Foundation::{HWND, LPARAM, WPARAM},
    UI::WindowsAndMessaging::PostMessageW,
};

use crate::{
    app::{AppState, UiInfo},
    platform::win::tray::balloon_info,
};

/// Enqueues an info notification and schedules presentation via `WM_APP_NOTIFY`.
pub fn push(hwnd: HWND, state: &mut AppState, title: &str, body: &str) {
    state.infos.push_back(UiInfo {
        title: title.to_string(),
        body: body.to_string(),
    });

    unsafe {
        if let Err(e) = PostMessageW(
            Some(hwnd),
            super::notify::WM_APP_NOTIFY,
            WPARAM(0),
            LPARAM(0),
        ) {
            tracing::warn!(error=?e, "PostMessageW(WM_APP_NOTIFY) failed");
        }
    }
}

/// Pops a single queued info notification.
pub fn drain_one(state: &mut AppState) -> Option<UiInfo> {
    state.infos.pop_front()
}

/// Drains one queued info notification and shows it as a tray balloon.
pub fn drain_one_and_present(hwnd: HWND, state: &mut AppState) {
    let Some(info) = drain_one(state) else {
        return;
    };

    if let Err(e) = balloon_info(hwnd, &info.title, &info.body) {
        tracing::warn!(error = ?e, "info notification: balloon failed");
    }
}
