/// Lex and parse errors with source location.
use diagnostics::{Located, Location};
use thiserror::Error;

use crate::token::TokenKind;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Expected \"##\"")]
    UnterminatedComment,

    #[error("Expected '{quote}'")]
    UnterminatedString { quote: char },

    #[error("Unexpected new line")]
    NewlineInString { row: usize, col: usize },

    #[error("Unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, row: usize, col: usize },

    /// Second half of a two-character operator is missing.
    #[error("Expected '{expected}'")]
    ExpectedCharacter { expected: char, row: usize, col: usize },

    #[error("Too long content")]
    TooLong { row: usize, col: usize },
}

impl Located for LexError {
    fn location(&self) -> Location {
        match *self {
            LexError::UnterminatedComment | LexError::UnterminatedString { .. } => Location::Eof,
            LexError::NewlineInString { row, col }
            | LexError::UnexpectedCharacter { row, col, .. }
            | LexError::ExpectedCharacter { row, col, .. }
            | LexError::TooLong { row, col } => Location::at(row, col),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    /// `expected` is already quoted the way it should be displayed.
    #[error("Expected {expected}, got \"{found}\"")]
    Expected {
        expected: String,
        found: TokenKind,
        row: usize,
        col: usize,
    },

    #[error("Unrecognised token")]
    Unrecognised { row: usize, col: usize },

    #[error("Operator stack overflowed")]
    OperatorOverflow { row: usize, col: usize },
}

impl ParseError {
    pub fn expected(expected: impl Into<String>, found: TokenKind, row: usize, col: usize) -> Self {
        ParseError::Expected {
            expected: expected.into(),
            found,
            row,
            col,
        }
    }
}

impl Located for ParseError {
    fn location(&self) -> Location {
        match self {
            ParseError::Lex(e) => e.location(),
            ParseError::Expected {
                found: TokenKind::Eof,
                ..
            } => Location::Eof,
            ParseError::Expected { row, col, .. }
            | ParseError::Unrecognised { row, col }
            | ParseError::OperatorOverflow { row, col } => Location::at(*row, *col),
        }
    }
}
