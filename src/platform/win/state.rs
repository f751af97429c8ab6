//! Accessors for the per-window `AppState` stored in `GWLP_USERDATA`.

use windows::Win32::{
    Foundation::HWND,
    UI::WindowsAndMessaging::{GWLP_USERDATA, GetWindowLongPtrW},
};

use crate::app::AppState;

/// Returns a mutable reference to the window's `AppState`, or `None` before
/// `WM_CREATE` has run (or after `WM_NCDESTROY` has torn it down).
///
/// # Safety
/// The pointer stored in `GWLP_USERDATA` is set exactly once, by `WM_CREATE`, to a
/// `Box::into_raw(Box<AppState>)` and cleared on `WM_NCDESTROY`; every access happens on
/// the window's owning thread via the window procedure, so there is no concurrent access.
unsafe fn state_ptr(hwnd: HWND) -> *mut AppState {
    unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut AppState }
}

/// Returns an immutable reference to the window's `AppState`, or `None` outside
/// the lifetime described on [`with_state_mut`].
pub fn get_state(hwnd: HWND) -> Option<&'static AppState> {
    let p = unsafe { state_ptr(hwnd) };
    if p.is_null() {
        return None;
    }
    Some(unsafe { &*p })
}

pub fn with_state_mut<T>(hwnd: HWND, f: impl FnOnce(&mut AppState) -> T) -> Option<T> {
    let p = unsafe { state_ptr(hwnd) };
    if p.is_null() {
        return None;
    }
    Some(f(unsafe { &mut *p }))
}

/// Same as [`with_state_mut`], discarding the closure's result; convenient at call sites
/// that only care about the side effect and would otherwise need to name the return type.
pub fn with_state_mut_do(hwnd: HWND, f: impl FnOnce(&mut AppState)) {
    with_state_mut(hwnd, f);
}
