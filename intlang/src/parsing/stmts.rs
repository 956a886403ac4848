//! Statement parsing.
use super::{atom::Index, attempt, expect, expr::Expr, ident::Ident, many, nested, NotMatched, Parse};
use crate::{token_stream::TokenStream, tokens::TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(Assign),
    /// Expression statements
    Expr(Expr),
    If(IfStmt),
}

/// Store to a variable, or to an indexed location reached through it.
///
/// # Example
///
/// ```text
/// total = total + 1
/// grid[y][x] = 0
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Ident,
    pub indices: Vec<Expr>,
    pub value: Expr,
}

/// Conditional block with an optional else branch.
///
/// # Example
///
/// ```text
/// if x > 0
///     print(x)
/// else
///     print(0)
/// end
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_body: Vec<Stmt>,
    pub else_body: Vec<Stmt>,
}

impl Parse for Stmt {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        let start = input.position();

        // An identifier followed by `=` would also parse as an equality
        // expression, so assignment has to be tried first.
        let assign_err = match attempt::<Assign>(input) {
            Ok(assign) => return Ok(Stmt::Assign(assign)),
            Err(err) => err,
        };

        let expr_err = match attempt::<Expr>(input) {
            Ok(expr) => return Ok(Stmt::Expr(expr)),
            Err(err) => err,
        };

        let if_err = match attempt::<IfStmt>(input) {
            Ok(if_stmt) => return Ok(Stmt::If(if_stmt)),
            Err(err) => err,
        };

        let err = assign_err.furthest(expr_err).furthest(if_err);
        if err.at == start {
            Err(NotMatched::new(input, "an expression, assignment or if statement"))
        } else {
            Err(err)
        }
    }
}

impl Parse for Assign {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        let target = Ident::parse(input)?;
        let (indices, _) = many::<Index>(input);
        expect(input, TokenKind::Eq)?;
        let value = Expr::parse(input)?;

        Ok(Assign {
            target,
            indices: indices.into_iter().map(|index| index.0).collect(),
            value,
        })
    }
}

impl Parse for IfStmt {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched> {
        expect(input, TokenKind::If)?;

        nested(input, |input| {
            let cond = Expr::parse(input)?;

            let (then_body, mut body_err) = many::<Stmt>(input);

            let else_body = if input.match_token(TokenKind::Else) {
                let (else_body, else_err) = many::<Stmt>(input);
                body_err = else_err;
                else_body
            } else {
                vec![]
            };

            expect(input, TokenKind::End).map_err(|err| body_err.furthest(err))?;

            Ok(IfStmt {
                cond,
                then_body,
                else_body,
            })
        })
    }
}
