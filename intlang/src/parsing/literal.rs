//! Literal values.
use super::NotMatched;
use crate::{token_stream::TokenStream, tokens::TokenKind};

/// Parse an integer literal token into its value.
pub(crate) fn parse_int(input: &mut TokenStream) -> Result<i64, NotMatched> {
    let position = input.snapshot();

    let token = input
        .consume(TokenKind::Int)
        .map_err(|_| NotMatched::new(input, "an integer"))?;

    token.text.parse::<i64>().map_err(|_| {
        input.restore(position);
        NotMatched::new(input, "an integer that fits in 64 bits")
    })
}
