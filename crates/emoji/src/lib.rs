//! Emoji data for chatmark.
//!
//! Two sources feed shortcode resolution:
//!
//! - [`NativeEmojiTable`] maps shortcodes to fixed HTML/unicode fragments.
//!   It is loaded once from a JSON resource (a default one is bundled) and
//!   never mutated afterward.
//! - [`CustomEmojiStore`] implementations hold user-uploaded images keyed by
//!   shortcode. Formatting reads an immutable [`CustomEmojiSnapshot`] taken
//!   from the store once per call.

#![warn(missing_docs)]

/// Custom emoji handles, snapshots, and the store trait.
pub mod custom;
/// JSON-file-backed custom emoji store.
pub mod file;
/// In-process custom emoji store.
pub mod memory;
/// Native emoji table loading.
pub mod native;

pub use custom::{
    CustomEmojiSnapshot, CustomEmojiStore, DEFAULT_DELIMITER, ImageHandle, StoreError,
    validate_shortcode,
};
pub use file::FileEmojiStore;
pub use memory::MemoryEmojiStore;
pub use native::{BUNDLED_EMOJI_JSON, EmojiTableError, NativeEmojiTable};
