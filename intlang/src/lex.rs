//! Lexical analysis (tokenizer)
use crate::tokens::{Span, Token, TokenKind};

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;
use smol_str::SmolStr;
use std::{error, fmt};

/// What to do with the text a pattern matched.
#[derive(Debug, Clone, Copy)]
enum Rule {
    Emit(TokenKind),
    /// Whitespace and comments.
    Ignore,
}

/// Token patterns, tried in order at the current position.
///
/// The first pattern that matches wins. Keywords come before identifiers,
/// and longer operators before their prefixes. Integer literals come
/// before the minus operator, so `x -1` lexes as two operands.
#[rustfmt::skip]
const TOKEN_PATTERNS: &[(Rule, &str)] = &[
    (Rule::Emit(TokenKind::And),          r"and\b"),
    (Rule::Emit(TokenKind::Or),           r"or\b"),
    (Rule::Emit(TokenKind::Not),          r"not\b"),
    (Rule::Emit(TokenKind::Fn),           r"fn\b"),
    (Rule::Emit(TokenKind::If),           r"if\b"),
    (Rule::Emit(TokenKind::Else),         r"else\b"),
    (Rule::Emit(TokenKind::End),          r"end\b"),
    (Rule::Emit(TokenKind::Int),          r"-?[0-9]+"),
    (Rule::Emit(TokenKind::Ident),        r"[a-zA-Z_][a-zA-Z0-9_]*"),
    (Rule::Emit(TokenKind::LeftParen),    r"\("),
    (Rule::Emit(TokenKind::RightParen),   r"\)"),
    (Rule::Emit(TokenKind::LeftBracket),  r"\["),
    (Rule::Emit(TokenKind::RightBracket), r"\]"),
    (Rule::Emit(TokenKind::Comma),        r","),
    (Rule::Emit(TokenKind::Plus),         r"\+"),
    (Rule::Emit(TokenKind::Minus),        r"-"),
    (Rule::Emit(TokenKind::Star),         r"\*"),
    (Rule::Emit(TokenKind::Slash),        r"/"),
    (Rule::Emit(TokenKind::NotEq),        r"!="),
    (Rule::Emit(TokenKind::GtEq),         r">="),
    (Rule::Emit(TokenKind::LtEq),         r"<="),
    (Rule::Emit(TokenKind::Eq),           r"="),
    (Rule::Emit(TokenKind::Gt),           r">"),
    (Rule::Emit(TokenKind::Lt),           r"<"),
    (Rule::Ignore,                        r"[ \t\r\n]+|#[^\n]*"),
];

lazy_static! {
    /// Compiled token patterns, each anchored to the start of the remaining input.
    static ref TOKEN_RULES: Vec<(Rule, Regex)> = TOKEN_PATTERNS
        .iter()
        .map(|(rule, pattern)| (*rule, Regex::new(&format!("^(?:{})", pattern)).unwrap()))
        .collect();
}

/// Splits source code into tokens, discarding whitespace and comments.
pub fn tokenize(source_code: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source_code).collect()
}

/// Lexical analyzer.
///
/// Yields tokens lazily as an iterator. Once an error has been yielded the
/// lexer is exhausted and can't be restarted.
pub struct Lexer<'a> {
    /// Keep reference to the source so errors can
    /// slice fragments from it.
    original: &'a str,
    /// Byte position of the start of the remaining input.
    cursor: usize,
    /// One-based line number at the cursor.
    line: usize,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source_code: &'a str) -> Self {
        Self {
            original: source_code,
            cursor: 0,
            line: 1,
            failed: false,
        }
    }

    /// Match the next token pattern against the remaining input.
    ///
    /// Returns `None` at the end of the source, or after an error was returned.
    pub fn next_token(&mut self) -> Option<Result<Token, LexError>> {
        loop {
            if self.failed {
                return None;
            }

            let rest = &self.original[self.cursor..];
            if rest.is_empty() {
                return None;
            }

            let matched = TOKEN_RULES
                .iter()
                .find_map(|(rule, pattern)| pattern.find(rest).map(|m| (*rule, m.end())));

            match matched {
                Some((Rule::Ignore, len)) => self.advance(len),
                Some((Rule::Emit(kind), len)) => return Some(Ok(self.make_token(kind, len))),
                None => {
                    self.failed = true;
                    return Some(Err(self.error()));
                }
            }
        }
    }

    /// Build a token from the current cursor, and advance
    /// the cursor past it.
    fn make_token(&mut self, kind: TokenKind, len: usize) -> Token {
        let span = Span::new(self.cursor as u32, len as u32);
        let text = SmolStr::from(span.fragment(self.original));
        trace!("{:5}:{:<3} {:?} {:?}", span.index, span.size, kind, text);

        let token = Token {
            kind,
            text,
            span,
            line: self.line,
        };
        self.advance(len);

        token
    }

    fn advance(&mut self, len: usize) {
        let end = self.cursor + len;
        self.line += self.original[self.cursor..end].matches('\n').count();
        self.cursor = end;
    }

    #[cold]
    fn error(&self) -> LexError {
        let near = self.original[self.cursor..]
            .lines()
            .next()
            .unwrap_or_default()
            .to_owned();

        LexError {
            line: self.line,
            near,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// No token pattern matched the remaining input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// One-based line number where lexing stopped.
    pub line: usize,
    /// Remainder of the line starting at the unmatched character.
    pub near: String,
}

impl error::Error for LexError {}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unexpected token near '{}' on line {}", self.near, self.line)
    }
}
