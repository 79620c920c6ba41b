use chatmark_emoji::{CustomEmojiSnapshot, ImageHandle, NativeEmojiTable};

use crate::grammar::lexer::{TokKind, Token};
use crate::vocab::MarkupVocabulary;

/// Resolve the shortcode opened by the delimiter at `i`, if any.
///
/// The shortcode is the concatenated text between this delimiter and the
/// next one. A custom hit turns the region into one sentinel token and
/// returns its image; a native hit turns it into the native fragment. An
/// unterminated or unknown shortcode stays literal.
pub(super) fn substitute_at(
    tokens: &mut Vec<Token<'_>>,
    i: usize,
    vocab: &MarkupVocabulary,
    native: &NativeEmojiTable,
    custom: &CustomEmojiSnapshot,
) -> Option<ImageHandle> {
    if tokens[i].kind != TokKind::Delimiter {
        return None;
    }
    let j = (i + 1..tokens.len()).find(|&j| tokens[j].kind == TokKind::Delimiter)?;
    let shortcode: String = tokens[i + 1..j].iter().map(|t| t.text.as_ref()).collect();

    let (replacement, image) = if let Some(image) = custom.get(&shortcode) {
        (Token::owned(TokKind::Sentinel, vocab.sentinel), Some(image.clone()))
    } else if let Some(html) = native.get(&shortcode) {
        (Token::owned(TokKind::Markup, html), None)
    } else {
        return None;
    };

    tokens[i] = replacement;
    tokens.drain(i + 1..=j);
    image
}
