#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

use log::{error, warn};
use web_sys::window;

pub const ATTRIBUTION_KEY: &str = "quiz_utms";
pub const SPOTS_KEY: &str = "quiz_spots_left";
pub const QUIZ_DATA_KEY: &str = "quiz_data";

pub const DEFAULT_SPOTS: u32 = 37;

/// String key/value persistence. Writes are fire-and-forget: a full or
/// disabled storage never blocks the funnel.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// `window.localStorage`, resolved on every call so a page without storage
/// (private mode, sandboxed iframe) simply reads as empty.
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        window().and_then(|w| w.local_storage().ok()).flatten()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|storage| storage.get_item(key).ok()).flatten()
    }

    fn set(&self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    error!("Failed to write {} to localStorage", key);
                }
            }
            None => warn!("localStorage unavailable, dropping write to {}", key),
        }
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
    }
}

/// The persisted scarcity counter shared across page loads.
pub trait SpotsStore {
    fn spots_left(&self) -> u32;
    fn set_spots_left(&self, spots: u32);
}

impl<S: KeyValueStore + ?Sized> SpotsStore for S {
    fn spots_left(&self) -> u32 {
        let Some(raw) = self.get(SPOTS_KEY) else {
            return DEFAULT_SPOTS;
        };
        match serde_json::from_str::<u32>(raw.trim()) {
            Ok(spots) => spots,
            Err(e) => {
                error!("Stored spots counter {:?} is unreadable: {}", raw, e);
                DEFAULT_SPOTS
            }
        }
    }

    fn set_spots_left(&self, spots: u32) {
        self.set(SPOTS_KEY, &spots.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spots_default_when_absent() {
        let store = MemoryStorage::new();
        assert_eq!(store.spots_left(), DEFAULT_SPOTS);
    }

    #[test]
    fn spots_default_when_corrupt() {
        let store = MemoryStorage::new().with_item(SPOTS_KEY, "lots");
        assert_eq!(store.spots_left(), DEFAULT_SPOTS);
    }

    #[test]
    fn spots_round_trip_through_storage() {
        let store = MemoryStorage::new();
        store.set_spots_left(21);
        assert_eq!(store.get(SPOTS_KEY).as_deref(), Some("21"));
        assert_eq!(store.spots_left(), 21);
    }

    #[test]
    fn spots_accept_padded_value() {
        let store = MemoryStorage::new().with_item(SPOTS_KEY, " 18\n");
        assert_eq!(store.spots_left(), 18);
    }
}
