use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::custom::{
    CustomEmojiSnapshot, CustomEmojiStore, DEFAULT_DELIMITER, ImageHandle, StoreError,
    validate_shortcode,
};

/// On-disk layout: `{"emojis": {"shortcode": "<base64 image>", ...}}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    emojis: BTreeMap<String, ImageHandle>,
}

/// Custom emoji store persisted as a single JSON document.
///
/// A missing file reads as an empty store. Each `put` holds an exclusive
/// advisory lock on the sibling `<path>.lock` file for its whole
/// read-modify-write, so writers in other threads, store instances, or
/// processes never drop each other's entries. The new document is written to
/// a uniquely named temp file in the same directory and renamed over the old
/// one, so readers never observe a half-written document.
#[derive(Debug)]
pub struct FileEmojiStore {
    path: PathBuf,
    delimiter: char,
}

impl FileEmojiStore {
    /// Store backed by the document at `path`. The file is created on first `put`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: DEFAULT_DELIMITER,
        }
    }

    /// Reject shortcodes containing `delimiter` instead of `:`.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<StoreDocument, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreDocument::default()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Open `<path>.lock` and block until it is exclusively held. The lock is
    /// released when the returned file is dropped.
    fn lock_writers(&self) -> Result<File, StoreError> {
        fs::create_dir_all(self.parent_dir()).map_err(|e| self.io_error(e))?;
        let mut lock_path = self.path.clone().into_os_string();
        lock_path.push(".lock");
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(PathBuf::from(lock_path))
            .map_err(|e| self.io_error(e))?;
        FileExt::lock_exclusive(&lock).map_err(|e| self.io_error(e))?;
        Ok(lock)
    }

    fn write_document(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })?;
        let mut tmp = NamedTempFile::new_in(self.parent_dir()).map_err(|e| self.io_error(e))?;
        tmp.write_all(&json).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;
        Ok(())
    }
}

impl CustomEmojiStore for FileEmojiStore {
    fn get_all(&self) -> Result<CustomEmojiSnapshot, StoreError> {
        let doc = self.read_document()?;
        Ok(doc.emojis.into_iter().collect())
    }

    fn put(&self, shortcode: &str, image: ImageHandle) -> Result<(), StoreError> {
        validate_shortcode(shortcode, self.delimiter)?;
        let _lock = self.lock_writers()?;
        let mut doc = self.read_document()?;
        doc.emojis.insert(shortcode.to_string(), image);
        self.write_document(&doc)?;
        tracing::debug!(shortcode, path = %self.path.display(), "custom emoji persisted");
        Ok(())
    }
}
