use super::{expect, ident::Ident, many, stmts::Stmt, NotMatched, Parse};
use crate::{token_stream::TokenStream, tokens::TokenKind};

/// Function definition.
///
/// # Example
///
/// ```text
/// fn add(a, b)
///     a + b
/// end
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
}

impl Parse for FuncDef {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        expect(input, TokenKind::Fn)?;
        let name = Ident::parse(input)?;
        let params = parse_params(input)?;

        let (body, stmt_err) = many::<Stmt>(input);
        expect(input, TokenKind::End).map_err(|err| stmt_err.furthest(err))?;

        Ok(FuncDef { name, params, body })
    }
}

/// Parameter names between parentheses.
///
/// Separating commas may be left out.
fn parse_params(input: &mut TokenStream) -> Result<Vec<Ident>, NotMatched> {
    expect(input, TokenKind::LeftParen)?;

    let mut params = vec![];
    while !input.match_token(TokenKind::RightParen) {
        let param = Ident::parse(input).map_err(|_| NotMatched::new(input, "a parameter name"))?;
        params.push(param);
        input.match_token(TokenKind::Comma);
    }

    Ok(params)
}
