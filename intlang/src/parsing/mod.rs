//! Recursive descent parser.
//!
//! Every production implements [`Parse`]. A production that doesn't match
//! returns [`NotMatched`], which is a local signal and not a failure: the
//! caller restores the token cursor and tries its next alternative. Only when
//! no alternative matches at the top level does parsing fail with a
//! [`ParseError`].
mod atom;
mod delim;
mod expr;
mod func;
mod ident;
mod literal;
mod prog;
mod stmts;

pub use atom::*;
pub use expr::*;
pub use func::*;
pub use ident::*;
pub use prog::*;
pub use stmts::*;

use crate::{
    constants::MAX_NESTING_DEPTH,
    token_stream::TokenStream,
    tokens::{Token, TokenKind},
};
use std::{error::Error, fmt};

pub trait Parse: Sized {
    fn parse(input: &mut TokenStream) -> Result<Self, NotMatched>;
}

/// Parse a whole program from a lexed token sequence.
pub fn parse_program(tokens: &[Token]) -> Result<Program, ParseError> {
    let mut input = TokenStream::new(tokens);
    Program::parse(&mut input).map_err(|err| ParseError::new(&input, err))
}

/// Attempt a production, restoring the cursor when it doesn't match.
pub fn attempt<T: Parse>(input: &mut TokenStream) -> Result<T, NotMatched> {
    let snapshot = input.snapshot();
    T::parse(input).map_err(|err| {
        input.restore(snapshot);
        err
    })
}

/// Parse a production as many times as it matches.
///
/// Also returns the failure that ended the run, so the caller can report
/// it if whatever comes next doesn't match either.
pub fn many<T: Parse>(input: &mut TokenStream) -> (Vec<T>, NotMatched) {
    let mut items = vec![];
    loop {
        match attempt::<T>(input) {
            Ok(item) => items.push(item),
            Err(err) => return (items, err),
        }
    }
}

/// Parse a production that can contain itself, one level deeper.
///
/// Signals a mismatch instead once the nesting reaches
/// [`MAX_NESTING_DEPTH`].
pub(crate) fn nested<'a, T>(
    input: &mut TokenStream<'a>,
    parse: impl FnOnce(&mut TokenStream<'a>) -> Result<T, NotMatched>,
) -> Result<T, NotMatched> {
    if input.depth() >= MAX_NESTING_DEPTH {
        return Err(NotMatched::new(
            input,
            format!("at most {} levels of nesting", MAX_NESTING_DEPTH),
        ));
    }

    input.descend();
    let result = parse(input);
    input.ascend();
    result
}

/// Consume a token of the given kind, or signal a mismatch.
pub(crate) fn expect<'a>(input: &mut TokenStream<'a>, token_kind: TokenKind) -> Result<&'a Token, NotMatched> {
    input
        .consume(token_kind)
        .map_err(|_| NotMatched::new(input, format!("'{}'", token_kind)))
}

/// A production didn't match the tokens at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotMatched {
    /// Description of what the production expected to find.
    pub expected: String,
    /// Token index where the mismatch happened.
    pub at: usize,
}

impl NotMatched {
    pub fn new(input: &TokenStream, expected: impl ToString) -> Self {
        Self {
            expected: expected.to_string(),
            at: input.position(),
        }
    }

    /// Keep whichever mismatch got further into the input, since
    /// that's usually closest to the actual mistake.
    pub fn furthest(self, other: NotMatched) -> NotMatched {
        if other.at > self.at {
            other
        } else {
            self
        }
    }
}

/// No alternative of a top level production matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub expected: String,
    /// Text of the offending token, or `None` at the end of the source.
    pub found: Option<String>,
    pub line: Option<usize>,
}

impl ParseError {
    fn new(input: &TokenStream, not_matched: NotMatched) -> Self {
        let token = input.token_at(not_matched.at);
        Self {
            expected: not_matched.expected,
            found: token.map(|token| token.text.to_string()),
            line: token.map(|token| token.line),
        }
    }
}

impl Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.found, self.line) {
            (Some(found), Some(line)) => write!(
                f,
                "expected {} but found '{}' on line {}",
                self.expected, found, line
            ),
            _ => write!(f, "expected {} but reached the end of the source", self.expected),
        }
    }
}
