//! Process-wide singletons backing the hybrid validator: the forced-conversion store,
//! the user-exception store, and the rolling context/layout-switch history. All three
//! are cheap to share (`Mutex<Arc<_>>` snapshots inside the stores themselves, a plain
//! `Mutex` around the history), so a single instance per process is enough.

use std::{
    path::PathBuf,
    sync::{Mutex, OnceLock},
};

use rust_switcher_core::{
    history::ConversionHistory,
    store::{exceptions::UserExceptionStore, forced::ForcedConversionStore},
};

const APP_DIR: &str = "RustSwitcher";

fn store_dir() -> PathBuf {
    std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

pub fn forced() -> &'static ForcedConversionStore {
    static STORE: OnceLock<ForcedConversionStore> = OnceLock::new();
    STORE.get_or_init(|| ForcedConversionStore::load(store_dir().join("forced_conversions.json")))
}

pub fn exceptions() -> &'static UserExceptionStore {
    static STORE: OnceLock<UserExceptionStore> = OnceLock::new();
    STORE.get_or_init(|| UserExceptionStore::load(store_dir().join("user_exceptions.json")))
}

pub fn history() -> &'static Mutex<ConversionHistory> {
    static HISTORY: OnceLock<Mutex<ConversionHistory>> = OnceLock::new();
    HISTORY.get_or_init(|| {
        let tuning = crate::config::load().map(|c| c.tuning).unwrap_or_default();
        Mutex::new(ConversionHistory::new(tuning))
    })
}
