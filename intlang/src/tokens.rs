use smol_str::SmolStr;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text the token was lexed from.
    pub text: SmolStr,
    pub span: Span,
    /// One-based source line the token starts on.
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum TokenKind {
    // Keywords
    And,
    Or,
    Not,
    Fn,
    If,
    Else,
    End,

    /// Integer literal, optionally negative.
    Int,
    Ident,

    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    Comma,        // ,
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    NotEq,        // !=
    GtEq,         // >=
    LtEq,         // <=
    Eq,           // =
    Gt,           // >
    Lt,           // <
}

impl fmt::Display for TokenKind {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TokenKind as T;
        match self {
            T::And          => write!(f, "and"),
            T::Or           => write!(f, "or"),
            T::Not          => write!(f, "not"),
            T::Fn           => write!(f, "fn"),
            T::If           => write!(f, "if"),
            T::Else         => write!(f, "else"),
            T::End          => write!(f, "end"),
            T::Int          => write!(f, "integer"),
            T::Ident        => write!(f, "identifier"),
            T::LeftParen    => write!(f, "("),
            T::RightParen   => write!(f, ")"),
            T::LeftBracket  => write!(f, "["),
            T::RightBracket => write!(f, "]"),
            T::Comma        => write!(f, ","),
            T::Plus         => write!(f, "+"),
            T::Minus        => write!(f, "-"),
            T::Star         => write!(f, "*"),
            T::Slash        => write!(f, "/"),
            T::NotEq        => write!(f, "!="),
            T::GtEq         => write!(f, ">="),
            T::LtEq         => write!(f, "<="),
            T::Eq           => write!(f, "="),
            T::Gt           => write!(f, ">"),
            T::Lt           => write!(f, "<"),
        }
    }
}

/// Chunk of source code, encoded as a starting byte position and size.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub index: u32,
    pub size: u32,
}

impl Span {
    pub fn new(index: u32, size: u32) -> Self {
        Self { index, size }
    }

    #[inline]
    pub fn fragment<'a>(&self, text: &'a str) -> &'a str {
        &text[(self.index as usize)..(self.end() as usize)]
    }

    /// Ending index of the span, exclusive.
    #[inline]
    pub fn end(&self) -> u32 {
        self.index + self.size
    }
}
