//! Token cursor with snapshots for backtracking.
use crate::tokens::{Token, TokenKind};

use std::fmt;

/// Cursor over a fully lexed sequence of tokens.
///
/// The parser tries alternatives by taking a [`Snapshot`] of the cursor
/// before an attempt, and restoring it when the attempt doesn't match.
/// Tokens are never copied when backtracking.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    cursor: usize,
    /// Number of nested productions currently being parsed.
    depth: usize,
}

/// Saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot(usize);

impl<'a> TokenStream<'a> {
    #[inline]
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
        }
    }

    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.cursor)
    }

    #[inline]
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.cursor = snapshot.0;
    }

    /// Indicates whether all tokens have been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn descend(&mut self) {
        self.depth += 1;
    }

    #[inline]
    pub fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// Index of the current token.
    #[inline]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn token_at(&self, position: usize) -> Option<&'a Token> {
        self.tokens.get(position)
    }

    /// Return the current token without advancing the cursor.
    ///
    /// Returns `None` at the end of the stream.
    #[inline]
    pub fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor)
    }

    /// Return the current token kind without advancing the cursor.
    #[inline]
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    /// Consumes the current token regardless of kind.
    ///
    /// Returns `None` when the cursor is at the end of the token stream.
    #[inline]
    pub fn next_token(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.cursor);
        if token.is_some() {
            self.cursor += 1;
        }
        token
    }

    /// Consumes the current token if it matches the given token kind.
    ///
    /// Returns true when matched. Returns false when token kinds
    /// do not match, or the token stream is at the end.
    ///
    /// Does not consume the token if the kinds do not match.
    pub fn match_token(&mut self, token_kind: TokenKind) -> bool {
        let is_match = self.peek_kind() == Some(token_kind);
        if is_match {
            self.cursor += 1;
        }
        is_match
    }

    /// Return the current token and advance the cursor.
    ///
    /// The consumed token must match the given token kind, otherwise
    /// a [`TokenError`] is returned and the cursor is not advanced.
    pub fn consume(&mut self, token_kind: TokenKind) -> Result<&'a Token, TokenError> {
        match self.peek() {
            Some(token) if token.kind == token_kind => {
                self.cursor += 1;
                Ok(token)
            }
            Some(token) => Err(TokenError::Mismatch {
                expected: token_kind,
                encountered: token.kind,
            }),
            None => Err(TokenError::EndOfSource { expected: token_kind }),
        }
    }
}

/// Error returned when an unexpected token kind is encountered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Mismatch {
        expected: TokenKind,
        encountered: TokenKind,
    },
    EndOfSource {
        expected: TokenKind,
    },
}

impl std::error::Error for TokenError {}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenError as E;
        match self {
            E::Mismatch {
                expected,
                encountered,
            } => write!(
                f,
                "encountered unexpected token '{}', expected '{}'",
                encountered, expected
            ),
            E::EndOfSource { expected } => {
                write!(f, "unexpected end of source code, expected '{}'", expected)
            }
        }
    }
}
