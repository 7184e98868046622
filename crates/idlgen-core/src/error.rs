//! Error types for idlgen-core

use std::fmt;

use thiserror::Error;

/// Result type alias for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// A syntactic failure while reading IDL text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}{}", Position(.line, .column))]
pub struct ParseError {
    /// Human-readable description
    pub message: String,

    /// 1-based line, when known
    pub line: Option<usize>,

    /// 1-based column, when known
    pub column: Option<usize>,
}

impl ParseError {
    /// Error located at a specific position
    pub fn at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Error without position information (e.g. unexpected end of input)
    pub fn unpositioned(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }
}

struct Position<'a>(&'a Option<usize>, &'a Option<usize>);

impl fmt::Display for Position<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (*self.0, *self.1) {
            (Some(line), Some(column)) => write!(f, " at line {line}, column {column}"),
            (Some(line), None) => write!(f, " at line {line}"),
            _ => Ok(()),
        }
    }
}
