//! Entry points: tokenize → rewrite → flatten.

use chatmark_emoji::{CustomEmojiSnapshot, CustomEmojiStore, NativeEmojiTable, StoreError};
use thiserror::Error;

use crate::grammar::lexer::tokenize;
use crate::rewrite::{RewriteResult, flatten, rewrite};
use crate::vocab::MarkupVocabulary;

/// Errors surfaced by [`format_with_store`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FormatError {
    /// The custom emoji snapshot could not be taken. Nothing was formatted;
    /// the caller decides whether to retry, render degraded, or abort.
    #[error("custom emoji lookup failed: {0}")]
    Store(#[from] StoreError),
}

impl FormatError {
    /// Whether retrying the call later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FormatError::Store(e) => e.is_retryable(),
        }
    }
}

/// Format sanitized chat text against an explicit vocabulary, native table,
/// and custom emoji snapshot.
///
/// The input must already be stripped of HTML; no escaping happens here.
pub fn format(
    text: &str,
    vocab: &MarkupVocabulary,
    native: &NativeEmojiTable,
    custom: &CustomEmojiSnapshot,
) -> RewriteResult {
    let mut tokens = tokenize(text, vocab);
    let images = rewrite(&mut tokens, vocab, native, custom);
    let text = flatten(&tokens);
    tracing::trace!(
        tokens = tokens.len(),
        custom_emojis = images.len(),
        "message formatted"
    );
    RewriteResult {
        text,
        images,
        sentinel: vocab.sentinel,
    }
}

/// Format with the standard vocabulary, the shared bundled emoji table, and
/// no custom emoji.
pub fn format_str(text: &str) -> RewriteResult {
    format(
        text,
        MarkupVocabulary::standard(),
        NativeEmojiTable::shared(),
        &CustomEmojiSnapshot::empty(),
    )
}

/// Snapshot `store` once, then [`format`] against the snapshot.
///
/// A store failure aborts the whole call; no partial result is produced.
pub fn format_with_store(
    text: &str,
    vocab: &MarkupVocabulary,
    native: &NativeEmojiTable,
    store: &dyn CustomEmojiStore,
) -> Result<RewriteResult, FormatError> {
    let snapshot = store.get_all()?;
    Ok(format(text, vocab, native, &snapshot))
}
