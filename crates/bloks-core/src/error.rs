use std::fmt;

/// Broad classification of parser failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed grammar: stray characters, missing delimiters, empty names.
    Structural,
    /// Malformed literal inside an otherwise recognized production.
    Lexical,
    /// Failure at an export boundary, unrelated to the grammar.
    Internal,
}

/// A parse or export error.
///
/// Every structural and lexical variant carries the offset, in characters
/// from the start of input, at which the offending token began or was
/// expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// Input ended where a value was required.
    UnexpectedEndOfInput { offset: usize },
    /// A character that cannot start or continue the current production.
    UnexpectedCharacter { found: char, offset: usize },
    /// Number literal that did not convert to `f64`.
    InvalidNumber { literal: String, offset: usize },
    /// Malformed `\u` escape.
    InvalidEscapeSequence { offset: usize },
    /// String literal without a closing quote. Offset of the opening quote.
    UnterminatedString { offset: usize },
    /// A specific character was required.
    ExpectedCharacter {
        expected: char,
        found: Option<char>,
        offset: usize,
    },
    /// Blok with an empty name. Offset of the opening paren.
    InvalidBlokName { offset: usize },
    /// Nesting exceeded the configured depth limit.
    TooDeeplyNested { limit: usize, offset: usize },
    /// Export or encoding failure.
    Internal { message: String },
}

impl ParserError {
    /// Create an error for an unexpected character.
    pub fn unexpected(found: char, offset: usize) -> Self {
        Self::UnexpectedCharacter { found, offset }
    }

    /// Create an error for an unexpected end of input.
    pub fn unexpected_eof(offset: usize) -> Self {
        Self::UnexpectedEndOfInput { offset }
    }

    /// Create an internal error from any displayable message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Character offset of the failure, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::UnexpectedEndOfInput { offset }
            | Self::UnexpectedCharacter { offset, .. }
            | Self::InvalidNumber { offset, .. }
            | Self::InvalidEscapeSequence { offset }
            | Self::UnterminatedString { offset }
            | Self::ExpectedCharacter { offset, .. }
            | Self::InvalidBlokName { offset }
            | Self::TooDeeplyNested { offset, .. } => Some(*offset),
            Self::Internal { .. } => None,
        }
    }

    /// Categorize this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnexpectedEndOfInput { .. }
            | Self::UnexpectedCharacter { .. }
            | Self::ExpectedCharacter { .. }
            | Self::InvalidBlokName { .. }
            | Self::TooDeeplyNested { .. } => ErrorCategory::Structural,
            Self::InvalidNumber { .. }
            | Self::InvalidEscapeSequence { .. }
            | Self::UnterminatedString { .. } => ErrorCategory::Lexical,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEndOfInput { offset } => {
                write!(f, "unexpected end of input at offset {}", offset)
            }
            Self::UnexpectedCharacter { found, offset } => {
                write!(f, "unexpected character {:?} at offset {}", found, offset)
            }
            Self::InvalidNumber { literal, offset } => {
                write!(f, "invalid number {:?} at offset {}", literal, offset)
            }
            Self::InvalidEscapeSequence { offset } => {
                write!(f, "invalid escape sequence at offset {}", offset)
            }
            Self::UnterminatedString { offset } => {
                write!(f, "unterminated string starting at offset {}", offset)
            }
            Self::ExpectedCharacter {
                expected,
                found: Some(found),
                offset,
            } => write!(
                f,
                "expected {:?} but found {:?} at offset {}",
                expected, found, offset
            ),
            Self::ExpectedCharacter {
                expected,
                found: None,
                offset,
            } => write!(
                f,
                "expected {:?} but reached end of input at offset {}",
                expected, offset
            ),
            Self::InvalidBlokName { offset } => {
                write!(f, "empty blok name at offset {}", offset)
            }
            Self::TooDeeplyNested { limit, offset } => {
                write!(f, "nesting deeper than {} at offset {}", limit, offset)
            }
            Self::Internal { message } => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for ParserError {}

impl From<serde_json::Error> for ParserError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err.to_string())
    }
}
