use std::collections::HashMap;
use std::sync::RwLock;

use crate::custom::{
    CustomEmojiSnapshot, CustomEmojiStore, DEFAULT_DELIMITER, ImageHandle, StoreError,
    validate_shortcode,
};

/// Custom emoji store held in process memory.
///
/// Readers take a full snapshot under a shared lock; writers take the
/// exclusive lock only for the insert.
#[derive(Debug)]
pub struct MemoryEmojiStore {
    entries: RwLock<HashMap<String, ImageHandle>>,
    delimiter: char,
}

impl Default for MemoryEmojiStore {
    fn default() -> Self {
        Self {
            entries: RwLock::default(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl MemoryEmojiStore {
    /// An empty store accepting shortcodes for the `:` delimiter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject shortcodes containing `delimiter` instead of `:`.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl CustomEmojiStore for MemoryEmojiStore {
    fn get_all(&self) -> Result<CustomEmojiSnapshot, StoreError> {
        let guard = self.entries.read().map_err(|_| StoreError::Unavailable {
            reason: "store lock poisoned".into(),
        })?;
        Ok(CustomEmojiSnapshot::from(guard.clone()))
    }

    fn put(&self, shortcode: &str, image: ImageHandle) -> Result<(), StoreError> {
        validate_shortcode(shortcode, self.delimiter)?;
        let mut guard = self.entries.write().map_err(|_| StoreError::Unavailable {
            reason: "store lock poisoned".into(),
        })?;
        guard.insert(shortcode.to_string(), image);
        tracing::debug!(shortcode, "custom emoji registered");
        Ok(())
    }
}
