//! Error types for pomedit

use std::fmt;
use std::io;
use std::sync::Arc;

use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self { start: pos, end: pos }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    Expected { expected: String, found: String },
    MismatchedTag { expected: String, found: String },
    Unterminated { construct: &'static str },
    DuplicateAttribute { name: String },
    InvalidEntity,
    InvalidUtf8,
    UnsupportedEncoding { encoding: String },
    MaxDepthExceeded { max: usize },
    MaxSizeExceeded { max: usize },
    /// An element that must be unique appeared more than once
    DuplicateElement { name: String },
    /// An edit needs an element that the document does not have
    MissingElement { path: String },
    /// Neither the descriptor nor its parent declares the value
    MissingValue { field: String },
    Io(io::ErrorKind),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::Unterminated { construct } => write!(f, "unterminated {construct}"),
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::InvalidEntity => write!(f, "invalid xml entity"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::UnsupportedEncoding { encoding } => {
                write!(f, "unsupported encoding: {encoding}")
            }
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::DuplicateElement { name } => write!(f, "duplicate <{name}> element"),
            Self::MissingElement { path } => write!(f, "no {path} element"),
            Self::MissingValue { field } => write!(f, "no value for {field}"),
            Self::Io(kind) => write!(f, "i/o error: {kind}"),
        }
    }
}

/// Main error type for pomedit
#[derive(Error, Clone, Debug)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
    source: Option<Arc<io::Error>>,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
            source: None,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
            source: None,
        }
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }

    pub fn missing_element(path: &str) -> Self {
        Self::new(
            ErrorKind::MissingElement {
                path: path.to_string(),
            },
            Span::empty(),
        )
    }

    pub fn missing_value(field: &str) -> Self {
        Self::new(
            ErrorKind::MissingValue {
                field: field.to_string(),
            },
            Span::empty(),
        )
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the input could not be read as a well-formed document
    pub fn is_parse(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::MissingElement { .. } | ErrorKind::MissingValue { .. } | ErrorKind::Io(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_parse() {
            write!(f, "error at {}: {}", self.span.start, self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self {
            kind: ErrorKind::Io(err.kind()),
            span: Span::empty(),
            message: err.to_string(),
            source: Some(Arc::new(err)),
        }
    }
}

/// Result type alias for pomedit
pub type Result<T> = std::result::Result<T, Error>;
