//! Atoms, the highest precedence expressions.
use super::{
    attempt, delim::parse_delimited, expect, expr::Expr, ident::Ident, literal::parse_int, many,
    NotMatched, Parse,
};
use crate::{token_stream::TokenStream, tokens::TokenKind};

/// Atom with its optional call and index suffixes.
///
/// # Example
///
/// ```text
/// table[2]
/// make_grid(3)[1][2]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub base: AtomBase,
    /// Arguments when the base is called.
    pub call: Option<Vec<Expr>>,
    /// Index suffixes, applied after the call.
    pub indices: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtomBase {
    Paren(Box<Expr>),
    List(Vec<Expr>),
    Ident(Ident),
    Int(i64),
}

/// Single index suffix `[expr]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Index(pub Expr);

/// Argument list of a call suffix.
struct CallArgs(Vec<Expr>);

impl Parse for Atom {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        let base = AtomBase::parse(input)?;
        let call = attempt::<CallArgs>(input).ok().map(|args| args.0);
        let (indices, _) = many::<Index>(input);

        Ok(Atom {
            base,
            call,
            indices: indices.into_iter().map(|index| index.0).collect(),
        })
    }
}

impl Parse for AtomBase {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        match input.peek_kind() {
            Some(TokenKind::LeftParen) => {
                input.next_token();
                let expr = Expr::parse(input)?;
                expect(input, TokenKind::RightParen)?;
                Ok(AtomBase::Paren(Box::new(expr)))
            }
            Some(TokenKind::LeftBracket) => {
                parse_delimited(input, TokenKind::LeftBracket, TokenKind::RightBracket)
                    .map(AtomBase::List)
            }
            Some(TokenKind::Ident) => Ident::parse(input).map(AtomBase::Ident),
            Some(TokenKind::Int) => parse_int(input).map(AtomBase::Int),
            _ => Err(NotMatched::new(input, "an expression")),
        }
    }
}

impl Parse for Index {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        expect(input, TokenKind::LeftBracket)?;
        let expr = Expr::parse(input)?;
        expect(input, TokenKind::RightBracket)?;
        Ok(Index(expr))
    }
}

impl Parse for CallArgs {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        parse_delimited(input, TokenKind::LeftParen, TokenKind::RightParen).map(CallArgs)
    }
}
