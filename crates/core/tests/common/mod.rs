//! Shared test helpers for `chatmark_core` integration tests.

#![allow(unreachable_pub)]

use chatmark_core::grammar::lexer::{TokKind, tokenize};
use chatmark_core::{
    CustomEmojiSnapshot, ImageHandle, MarkupVocabulary, NativeEmojiTable, RewriteResult, format,
};

/// Native table built from `(shortcode, fragment)` pairs.
#[allow(dead_code)]
pub fn native(pairs: &[(&str, &str)]) -> NativeEmojiTable {
    pairs.iter().copied().collect()
}

/// Custom snapshot built from `(shortcode, handle)` pairs.
#[allow(dead_code)]
pub fn custom(pairs: &[(&str, &ImageHandle)]) -> CustomEmojiSnapshot {
    pairs.iter().map(|(k, v)| (*k, (*v).clone())).collect()
}

/// A distinguishable fake image.
#[allow(dead_code)]
pub fn handle(tag: u8) -> ImageHandle {
    ImageHandle::from(vec![0x89, b'P', b'N', b'G', tag])
}

/// Format with the default vocabulary and the given tables.
#[allow(dead_code)]
pub fn format_with(
    text: &str,
    native: &NativeEmojiTable,
    custom: &CustomEmojiSnapshot,
) -> RewriteResult {
    format(text, &MarkupVocabulary::default(), native, custom)
}

/// Format with the default vocabulary and empty tables; return the text.
#[allow(dead_code)]
pub fn format_plain(text: &str) -> String {
    format_with(text, &NativeEmojiTable::empty(), &CustomEmojiSnapshot::empty()).text
}

/// Token `(kind, text)` pairs for `text` under the default vocabulary.
#[allow(dead_code)]
pub fn lex(text: &str) -> Vec<(TokKind, String)> {
    tokenize(text, &MarkupVocabulary::default())
        .into_iter()
        .map(|t| (t.kind, t.text.into_owned()))
        .collect()
}

/// Token texts only.
#[allow(dead_code)]
pub fn lex_texts(text: &str) -> Vec<String> {
    lex(text).into_iter().map(|(_, t)| t).collect()
}
