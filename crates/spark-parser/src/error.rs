//! Parser error types.

use spark_types::ExprError;
use thiserror::Error;

/// A parse failure, carrying the byte position of the first error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A character the grammar cannot start a construct with.
    #[error("unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, position: usize },

    /// A call name absent from the registry table for this grammar.
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String, position: usize },

    /// Supplied parameter count differs from the declared specs.
    #[error("function '{name}' takes {expected} parameter(s), got {got}")]
    WrongArgCount {
        name: String,
        expected: usize,
        got: usize,
        position: usize,
    },

    /// A string literal with no closing quote.
    #[error("unterminated string literal")]
    UnterminatedString { position: usize },

    /// An opening parenthesis with no matching close.
    #[error("unbalanced parentheses")]
    UnbalancedParens { position: usize },

    /// A string literal inside a numeric formula.
    #[error("string literal is not valid in a numeric expression")]
    StringInNumeric { position: usize },

    /// A number literal inside a string formula.
    #[error("number literal is not valid in a string expression")]
    NumberInString { position: usize },

    /// An identifier not followed by a call.
    #[error("expected '(' after '{name}'")]
    ExpectedCall { name: String, position: usize },
}

impl ParseError {
    /// Byte offset of the failure within the formula text.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedCharacter { position, .. }
            | ParseError::UnknownFunction { position, .. }
            | ParseError::WrongArgCount { position, .. }
            | ParseError::UnterminatedString { position }
            | ParseError::UnbalancedParens { position }
            | ParseError::StringInNumeric { position }
            | ParseError::NumberInString { position }
            | ParseError::ExpectedCall { position, .. } => *position,
        }
    }

    /// Convert into the freestanding diagnostic shape consumed by
    /// editor frontends.
    pub fn to_diagnostic(&self) -> ExprError {
        ExprError::new(self.to_string(), self.position())
    }
}
