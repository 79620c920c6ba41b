use crate::grammar::lexer::{TokKind, Token};
use crate::vocab::MarkupVocabulary;

/// Wrap the URL starting at the link prefix at `i` in an anchor.
///
/// The URL runs from the prefix to the first whitespace token or the end of
/// the sequence; the whitespace stays outside the anchor. Returns the index
/// the sweep continues from, which lies past the inserted closing fragment
/// so the URL is never rewritten again.
pub(super) fn wrap_at(tokens: &mut Vec<Token<'_>>, i: usize, vocab: &MarkupVocabulary) -> usize {
    if tokens[i].kind != TokKind::LinkPrefix {
        return i + 1;
    }
    let end = (i + 1..tokens.len())
        .find(|&j| tokens[j].kind == TokKind::Whitespace)
        .unwrap_or(tokens.len());

    let url: String = tokens[i..end].iter().map(|t| t.text.as_ref()).collect();
    let close = [vocab.link.href_close.as_str(), &url, vocab.link.close.as_str()].concat();

    tokens.insert(end, Token::owned(TokKind::Markup, close));
    tokens.insert(i, Token::owned(TokKind::Markup, vocab.link.open.as_str()));
    end + 2
}
