use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

/// The default emoji resource compiled into every binary.
pub const BUNDLED_EMOJI_JSON: &str = include_str!("../data/emojis.json");

/// Errors that can occur when loading a native emoji resource.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EmojiTableError {
    /// The resource file could not be read.
    #[error("failed to read emoji table {}", path.display())]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The resource is not valid JSON or lacks the `emojis` array.
    #[error("invalid emoji table JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct EmojiResource {
    emojis: Vec<EmojiEntry>,
}

#[derive(Deserialize)]
struct EmojiEntry {
    #[serde(default)]
    shortname: Option<String>,
    #[serde(default)]
    html: Option<String>,
}

/// Shortcode → render fragment lookup for built-in emoji.
///
/// Keys are stored without their delimiters (`smile`, not `:smile:`).
/// Lookups are exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeEmojiTable {
    entries: HashMap<String, String>,
}

impl NativeEmojiTable {
    /// An empty table. Every shortcode stays literal when formatting with it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a resource of the form `{"emojis": [{"shortname": ":x:", "html": "..."}]}`.
    ///
    /// The first and last characters of each `shortname` are its delimiters
    /// and are stripped. Entries with a missing label or fragment, or a label
    /// too short to hold anything between its delimiters, are skipped.
    pub fn load_from_str(json: &str) -> Result<Self, EmojiTableError> {
        let resource: EmojiResource = serde_json::from_str(json)?;
        let mut entries = HashMap::with_capacity(resource.emojis.len());
        for entry in resource.emojis {
            let (Some(label), Some(html)) = (entry.shortname, entry.html) else {
                continue;
            };
            if let Some(code) = strip_delimiters(&label) {
                entries.insert(code.to_string(), html);
            }
        }
        Ok(Self { entries })
    }

    /// Read and parse a resource file.
    pub fn load_from_path(path: &Path) -> Result<Self, EmojiTableError> {
        let json = std::fs::read_to_string(path).map_err(|source| EmojiTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_from_str(&json)
    }

    /// Parse the bundled default resource.
    pub fn bundled() -> Result<Self, EmojiTableError> {
        Self::load_from_str(BUNDLED_EMOJI_JSON)
    }

    /// Load from `path` (or the bundled resource when `None`), degrading to an
    /// empty table on failure.
    ///
    /// Load failures are reported through `tracing` rather than returned, so
    /// formatting keeps working with shortcodes left as literal text.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(p) => Self::load_from_path(p),
            None => Self::bundled(),
        };
        match loaded {
            Ok(table) => {
                tracing::debug!(entries = table.len(), "native emoji table loaded");
                table
            }
            Err(e) => {
                tracing::warn!(error = %e, "native emoji table unavailable, shortcodes stay literal");
                Self::empty()
            }
        }
    }

    /// Process-wide table built from the bundled resource on first access.
    pub fn shared() -> &'static NativeEmojiTable {
        static SHARED: OnceLock<NativeEmojiTable> = OnceLock::new();
        SHARED.get_or_init(|| Self::load_or_empty(None))
    }

    /// Fragment for `shortcode`, if known.
    pub fn get(&self, shortcode: &str) -> Option<&str> {
        self.entries.get(shortcode).map(String::as_str)
    }

    /// Whether `shortcode` has an entry.
    pub fn contains(&self, shortcode: &str) -> bool {
        self.entries.contains_key(shortcode)
    }

    /// Number of shortcodes in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(shortcode, fragment)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for NativeEmojiTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn strip_delimiters(label: &str) -> Option<&str> {
    let mut chars = label.chars();
    let first = chars.next()?;
    let last = chars.next_back()?;
    let inner = &label[first.len_utf8()..label.len() - last.len_utf8()];
    (!inner.is_empty()).then_some(inner)
}
