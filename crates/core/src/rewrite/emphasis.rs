use crate::grammar::lexer::{TokKind, Token};
use crate::vocab::MarkupVocabulary;

/// Pair the flag at `i` with the rightmost later flag of the same literal.
///
/// Outermost-greedy: with `*a*b*c*` the first `*` pairs with the last, then
/// the two middle ones pair with each other. A flag with no later twin is
/// left as literal text.
pub(super) fn pair_at(tokens: &mut [Token<'_>], i: usize, vocab: &MarkupVocabulary) {
    let opener = &tokens[i];
    if opener.kind != TokKind::Flag {
        return;
    }
    let Some(tags) = vocab.flag_markup(&opener.text) else {
        return;
    };
    let Some(j) = (i + 1..tokens.len())
        .rev()
        .find(|&j| tokens[j].kind == TokKind::Flag && tokens[j].text == opener.text)
    else {
        return;
    };
    tokens[i] = Token::owned(TokKind::Markup, tags.open.as_str());
    tokens[j] = Token::owned(TokKind::Markup, tags.close.as_str());
}
