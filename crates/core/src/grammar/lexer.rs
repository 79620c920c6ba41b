use std::borrow::Cow;

use crate::vocab::{MarkupVocabulary, SENTINEL_REPLACEMENT};

/// Classification of a chat token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokKind {
    /// Emphasis flag, single (`*`) or doubled (`**`).
    Flag,
    /// Start of an autolinkable URL (`http://`, `www.`, ...).
    LinkPrefix,
    /// Emoji shortcode delimiter (`:` by default).
    Delimiter,
    /// A single whitespace character.
    Whitespace,
    /// Any other single character.
    Text,
    /// A fragment substituted by the rewriter (tags, native emoji).
    Markup,
    /// Placeholder for a resolved custom emoji.
    Sentinel,
}

/// A token of chat text.
///
/// Freshly tokenized tokens borrow their text from the input; the rewriter
/// replaces text with owned fragments as it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokKind,
    /// Current text of the token.
    pub text: Cow<'a, str>,
}

impl<'a> Token<'a> {
    /// Token borrowing `text` from the input.
    pub fn borrowed(kind: TokKind, text: &'a str) -> Self {
        Self {
            kind,
            text: Cow::Borrowed(text),
        }
    }

    /// Token owning a substituted fragment.
    pub fn owned(kind: TokKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: Cow::Owned(text.into()),
        }
    }
}

/// Split sanitized chat text into tokens.
///
/// One step per iteration, in priority order:
/// 1. a flag char followed by itself, when the doubled literal is in the
///    vocabulary, becomes one doubled [`TokKind::Flag`] token;
/// 2. any other flag char becomes a single [`TokKind::Flag`] token;
/// 3. a link prefix with at least one character after it becomes a
///    [`TokKind::LinkPrefix`] token (longest prefix wins);
/// 4. anything else becomes a one-character token.
///
/// A literal sentinel in the input is emitted as U+FFFD so only the rewriter
/// can produce sentinels.
pub fn tokenize<'a>(input: &'a str, vocab: &MarkupVocabulary) -> Vec<Token<'a>> {
    let prefixes = vocab.prefixes_longest_first();
    let mut toks = Vec::with_capacity(input.len());
    let mut i = 0usize;

    while let Some(c) = input[i..].chars().next() {
        let start = i;
        let width = c.len_utf8();
        let rest = &input[i..];

        if vocab.is_flag_char(c) {
            i += width;
            if input[i..].starts_with(c) && vocab.flag_markup(&input[start..i + width]).is_some() {
                i += width;
            }
            toks.push(Token::borrowed(TokKind::Flag, &input[start..i]));
            continue;
        }

        if let Some(prefix) = prefixes
            .iter()
            .find(|p| rest.len() > p.len() && rest.starts_with(p.as_str()))
        {
            i += prefix.len();
            toks.push(Token::borrowed(TokKind::LinkPrefix, &input[start..i]));
            continue;
        }

        i += width;
        let tok = if c == vocab.sentinel {
            Token::owned(TokKind::Text, SENTINEL_REPLACEMENT)
        } else if c == vocab.emoji_delimiter {
            Token::borrowed(TokKind::Delimiter, &input[start..i])
        } else if c.is_whitespace() {
            Token::borrowed(TokKind::Whitespace, &input[start..i])
        } else {
            Token::borrowed(TokKind::Text, &input[start..i])
        };
        toks.push(tok);
    }
    toks
}
