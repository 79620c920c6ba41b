//! chatmark core library.
//!
//! Turns sanitized chat text into formatted markup: inline emphasis
//! (`*`, `_`, `` ` ``, `**`, `__`), autolinked URLs, native emoji shortcodes,
//! and custom image-backed emoji. The main entry points are [`format`] for an
//! explicit vocabulary/table/snapshot, [`format_with_store`] to snapshot a
//! custom emoji store first, and [`format_str`] for the defaults.

#![warn(missing_docs)]

/// Formatting entry points.
pub mod format;
/// Chat grammar: token types and the lexer.
pub mod grammar;
/// Token rewriting: emphasis, emoji, autolinks, and flattening.
pub mod rewrite;
/// Markup vocabulary configuration.
pub mod vocab;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Entry points
pub use format::{FormatError, format, format_str, format_with_store};

// Tokens
pub use grammar::lexer::{TokKind, Token, tokenize};

// Rewriter
pub use rewrite::{RewriteResult, flatten, rewrite};

// Vocabulary
pub use vocab::{
    DEFAULT_SENTINEL, LinkMarkup, MarkupVocabulary, SENTINEL_REPLACEMENT, TagPair,
    VocabularyError, load_vocabulary_from_str,
};

// Emoji data (re-exported from the emoji crate)
pub use chatmark_emoji::{
    CustomEmojiSnapshot, CustomEmojiStore, FileEmojiStore, ImageHandle, MemoryEmojiStore,
    NativeEmojiTable, StoreError,
};
