use super::{NotMatched, Parse};
use crate::{token_stream::TokenStream, tokens::TokenKind};
use smol_str::SmolStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: SmolStr,
    pub line: usize,
}

impl Parse for Ident {
    #[inline]
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        let token = input
            .consume(TokenKind::Ident)
            .map_err(|_| NotMatched::new(input, "an identifier"))?;

        Ok(Ident {
            name: token.text.clone(),
            line: token.line,
        })
    }
}
