use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque image bytes for a custom emoji.
///
/// Cloning is cheap; every occurrence of a shortcode in a message shares the
/// same allocation. Serializes as a base64 string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle(Arc<[u8]>);

impl ImageHandle {
    /// Wrap raw image bytes.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// The raw image bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte length of the image.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the image has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Base64 (standard alphabet, padded) encoding of the image bytes.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Decode a base64 string produced by [`ImageHandle::to_base64`].
    pub fn from_base64(s: &str) -> Result<Self, base64::DecodeError> {
        STANDARD.decode(s).map(Self::new)
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageHandle({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for ImageHandle {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ImageHandle {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl Serialize for ImageHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for ImageHandle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Immutable view of a custom emoji store, taken once per formatting call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomEmojiSnapshot {
    entries: HashMap<String, ImageHandle>,
}

impl CustomEmojiSnapshot {
    /// A snapshot with no custom emoji.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Image registered for `shortcode`, if any. Exact, case-sensitive match.
    pub fn get(&self, shortcode: &str) -> Option<&ImageHandle> {
        self.entries.get(shortcode)
    }

    /// Number of registered shortcodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no shortcodes are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered shortcodes in sorted order.
    pub fn shortcodes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

impl From<HashMap<String, ImageHandle>> for CustomEmojiSnapshot {
    fn from(entries: HashMap<String, ImageHandle>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>> FromIterator<(K, ImageHandle)> for CustomEmojiSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, ImageHandle)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Errors raised by a [`CustomEmojiStore`].
///
/// Use [`StoreError::is_retryable()`] to tell transient outages from
/// permanent failures.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store cannot be reached right now.
    #[error("custom emoji store unavailable: {reason}")]
    Unavailable {
        /// Human-readable description of the outage.
        reason: String,
    },

    /// A shortcode was rejected on registration.
    #[error("invalid shortcode {shortcode:?}: {reason}")]
    InvalidShortcode {
        /// The rejected shortcode.
        shortcode: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Reading or writing the store file failed.
    #[error("custom emoji store I/O failed: {}", path.display())]
    Io {
        /// The store file.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a valid emoji store document.
    #[error("custom emoji store is malformed: {}", path.display())]
    Malformed {
        /// The store file.
        path: PathBuf,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Whether retrying the same operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. } | StoreError::Io { .. })
    }
}

/// Keyed storage for user-uploaded emoji images.
///
/// Implementations coordinate their own concurrent readers and writers;
/// formatting only ever calls [`CustomEmojiStore::get_all`].
pub trait CustomEmojiStore: Send + Sync {
    /// Take an immutable snapshot of every registered emoji.
    fn get_all(&self) -> Result<CustomEmojiSnapshot, StoreError>;

    /// Register (or replace) the image for `shortcode`.
    fn put(&self, shortcode: &str, image: ImageHandle) -> Result<(), StoreError>;
}

/// Delimiter of the standard chat vocabulary.
pub const DEFAULT_DELIMITER: char = ':';

/// Check that `shortcode` can be written between two `delimiter`s and read
/// back as one shortcode.
pub fn validate_shortcode(shortcode: &str, delimiter: char) -> Result<(), StoreError> {
    let reason = if shortcode.is_empty() {
        "must not be empty".to_string()
    } else if shortcode.contains(delimiter) {
        format!("must not contain {delimiter:?}")
    } else if shortcode.chars().any(char::is_whitespace) {
        "must not contain whitespace".to_string()
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidShortcode {
        shortcode: shortcode.to_string(),
        reason,
    })
}
