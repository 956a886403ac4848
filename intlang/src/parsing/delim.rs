//! Delimited list.
use super::{expect, expr::Expr, NotMatched, Parse};
use crate::{token_stream::TokenStream, tokens::TokenKind};

/// Comma separated expressions between an opening and closing token.
///
/// A trailing comma before the closing token is accepted.
pub(crate) fn parse_delimited(
    input: &mut TokenStream,
    open: TokenKind,
    close: TokenKind,
) -> Result<Vec<Expr>, NotMatched> {
    expect(input, open)?;

    let mut items = vec![];
    while !input.match_token(close) {
        items.push(Expr::parse(input)?);

        // Lookahead for the delimiter is here and not in the item.
        if input.match_token(TokenKind::Comma) {
            continue;
        }
        if input.peek_kind() != Some(close) {
            return Err(NotMatched::new(input, format!("',' or '{}'", close)));
        }
    }

    Ok(items)
}
