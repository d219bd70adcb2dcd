use std::collections::HashMap;

/// Session-scoped key/value persistence. Best-effort: writes may be dropped
/// and reads may return nothing.
pub trait SessionStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

pub const DIRECTORY_KEY: &str = "shoal.directory.v1";
pub const IMAGES_KEY: &str = "shoal.images.v1";

/// Store used when the browser refuses session storage (and in tests).
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
