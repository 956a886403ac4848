//! Application errors
use std::fmt;

#[derive(Debug)]
pub struct AppError {
    pub kind: ErrorKind,
}

impl std::error::Error for AppError {}

#[derive(Debug)]
pub enum ErrorKind {
    Intlang(intlang::IntlangError),
    Io(std::io::Error),
    /// Environment variable that isn't a valid size.
    Config { name: &'static str, value: String },
}

impl AppError {
    pub fn config(name: &'static str, value: impl ToString) -> Self {
        Self {
            kind: ErrorKind::Config {
                name,
                value: value.to_string(),
            },
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "application error: {}", self.kind)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Intlang(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Config { name, value } => write!(f, "{name} must be a cell count, found '{value}'"),
        }
    }
}

impl From<intlang::IntlangError> for AppError {
    fn from(err: intlang::IntlangError) -> Self {
        Self {
            kind: ErrorKind::Intlang(err),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io(err),
        }
    }
}
