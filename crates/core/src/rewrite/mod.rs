//! In-place rewriting of a token sequence into formatted markup.
//!
//! A single left-to-right sweep visits every index once. At each index the
//! emphasis rule runs first, then the emoji rule, then the autolink rule,
//! each seeing whatever token currently sits at that index. Rules may
//! overwrite, insert, or remove tokens; indices stay contiguous.

mod autolink;
mod emoji;
mod emphasis;

use serde::Serialize;

use chatmark_emoji::{CustomEmojiSnapshot, ImageHandle, NativeEmojiTable};

use crate::grammar::lexer::Token;
use crate::vocab::MarkupVocabulary;

/// Formatted message text plus the custom emoji images it references.
///
/// Every resolved custom emoji appears in `text` as one `sentinel`
/// character; `images` lists their handles in the same left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteResult {
    /// Flattened formatted text.
    pub text: String,
    /// Images for each sentinel in `text`, in order of occurrence.
    #[serde(rename = "custom_emojis")]
    pub images: Vec<ImageHandle>,
    /// The placeholder character marking image positions in `text`.
    pub sentinel: char,
}

impl RewriteResult {
    /// Whether the message references any custom emoji.
    pub fn has_custom_emojis(&self) -> bool {
        !self.images.is_empty()
    }

    /// Number of sentinel characters in `text`.
    pub fn sentinel_count(&self) -> usize {
        self.text.chars().filter(|&c| c == self.sentinel).count()
    }

    /// Replace each sentinel with `render(image)` for its image, in order.
    pub fn splice_images(&self, mut render: impl FnMut(&ImageHandle) -> String) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut images = self.images.iter();
        for c in self.text.chars() {
            match (c == self.sentinel).then(|| images.next()).flatten() {
                Some(image) => out.push_str(&render(image)),
                None => out.push(c),
            }
        }
        out
    }
}

/// Apply emphasis pairing, emoji substitution, and autolinking to `tokens`.
///
/// Returns the custom emoji images resolved, in order of occurrence. Custom
/// shortcodes take precedence over native ones.
pub fn rewrite(
    tokens: &mut Vec<Token<'_>>,
    vocab: &MarkupVocabulary,
    native: &NativeEmojiTable,
    custom: &CustomEmojiSnapshot,
) -> Vec<ImageHandle> {
    let mut images = Vec::new();
    let mut i = 0usize;
    while i < tokens.len() {
        emphasis::pair_at(tokens, i, vocab);
        if let Some(image) = emoji::substitute_at(tokens, i, vocab, native, custom) {
            images.push(image);
        }
        i = autolink::wrap_at(tokens, i, vocab);
    }
    images
}

/// Concatenate token texts in order.
pub fn flatten(tokens: &[Token<'_>]) -> String {
    let len = tokens.iter().map(|t| t.text.len()).sum();
    let mut out = String::with_capacity(len);
    for tok in tokens {
        out.push_str(&tok.text);
    }
    out
}
