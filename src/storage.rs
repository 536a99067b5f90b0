//! Keyed JSON persistence
//!
//! LocalStorage on the web. Natively each key is a `<key>.json` file in the
//! directory named by `SNAKE_RUSH_DATA`; without it nothing is persisted.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Directory for native save files
pub const DATA_DIR_ENV: &str = "SNAKE_RUSH_DATA";

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(target_arch = "wasm32")]
fn read(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok()?
}

#[cfg(target_arch = "wasm32")]
fn write(key: &str, json: &str) -> bool {
    local_storage().is_some_and(|s| s.set_item(key, json).is_ok())
}

#[cfg(not(target_arch = "wasm32"))]
fn path_for(key: &str) -> Option<std::path::PathBuf> {
    let dir = std::env::var_os(DATA_DIR_ENV)?;
    Some(std::path::Path::new(&dir).join(format!("{key}.json")))
}

#[cfg(not(target_arch = "wasm32"))]
fn read(key: &str) -> Option<String> {
    std::fs::read_to_string(path_for(key)?).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn write(key: &str, json: &str) -> bool {
    let Some(path) = path_for(key) else {
        return false;
    };
    match std::fs::write(&path, json) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Could not write {}: {}", path.display(), e);
            false
        }
    }
}

/// Stored value for `key`; `None` if absent or unreadable
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let json = read(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding stored {}: {}", key, e);
            None
        }
    }
}

/// Store `value` under `key`; `false` if nothing was written
pub fn save<T: Serialize>(key: &str, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => write(key, &json),
        Err(e) => {
            log::warn!("Could not encode {}: {}", key, e);
            false
        }
    }
}
