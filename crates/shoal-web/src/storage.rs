use shoal_core::{MemoryStore, SessionStore};

/// `sessionStorage`, or an in-memory map when the browser refuses access
/// (private mode, sandboxed frames).
pub enum BrowserStore {
    Session(web_sys::Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match web_sys::window().and_then(|w| w.session_storage().ok().flatten()) {
            Some(storage) => BrowserStore::Session(storage),
            None => {
                log::warn!("storage: sessionStorage unavailable, caching in memory");
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl SessionStore for BrowserStore {
    fn load(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Session(storage) => storage.get_item(key).ok().flatten(),
            BrowserStore::Memory(store) => store.load(key),
        }
    }

    fn save(&mut self, key: &str, value: &str) {
        match self {
            BrowserStore::Session(storage) => {
                if storage.set_item(key, value).is_err() {
                    // Quota exceeded; the next page simply refetches.
                    log::debug!("storage: dropped write for {key}");
                }
            }
            BrowserStore::Memory(store) => store.save(key, value),
        }
    }
}
