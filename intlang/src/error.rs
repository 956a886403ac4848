//! Result and errors.
use crate::{layout::LayoutViolation, lex::LexError, parsing::ParseError};
use smol_str::SmolStr;
use std::fmt::{self, Display, Formatter};

pub type IntlangResult<T> = std::result::Result<T, IntlangError>;

/// Compilation failure. There is never partial output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntlangError {
    Lex(LexError),
    Parse(ParseError),
    /// Read of a name that isn't a parameter, local or global.
    UndefinedVariable { name: SmolStr, line: usize },
    /// Write to a function parameter.
    ReadOnlyVariable { name: SmolStr, line: usize },
    /// No function named `main`.
    MissingEntryPoint,
    /// Breach of a memory model invariant.
    Layout(LayoutViolation),
}

impl Display for IntlangError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "lex error: {}", err),
            Self::Parse(err) => write!(f, "parse error: {}", err),
            Self::UndefinedVariable { name, line } => {
                write!(f, "undefined variable '{}' on line {}", name, line)
            }
            Self::ReadOnlyVariable { name, line } => write!(
                f,
                "cannot write to read-only variable '{}' on line {}",
                name, line
            ),
            Self::MissingEntryPoint => write!(f, "function main does not exist"),
            Self::Layout(err) => write!(f, "layout violation: {}", err),
        }
    }
}

impl std::error::Error for IntlangError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lex(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Layout(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LexError> for IntlangError {
    fn from(err: LexError) -> Self {
        IntlangError::Lex(err)
    }
}

impl From<ParseError> for IntlangError {
    fn from(err: ParseError) -> Self {
        IntlangError::Parse(err)
    }
}

impl From<LayoutViolation> for IntlangError {
    fn from(err: LayoutViolation) -> Self {
        IntlangError::Layout(err)
    }
}
