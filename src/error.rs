//! Error types for the Diana pipeline.
//!
//! The lexer never fails: lexical problems travel through the token stream as
//! [`TokenType::Error`](crate::TokenType::Error) tokens. This module covers
//! everything after that point.
//!
//! ## Error Categories
//!
//! - **Lexical errors**: an `ERROR` token reached the parser
//! - **Parse errors**: unexpected tokens, premature end of input, invalid keys,
//!   malformed `let` bindings, nesting deeper than the configured limit
//! - **Compile errors**: a parser/compiler contract violation (should not happen)
//! - **Deserialization errors**: the value tree does not fit the requested type
//!
//! Every parse error carries the 1-based line and column of the token that
//! triggered it.
//!
//! ## Examples
//!
//! ```rust
//! use diana::{to_value, Error};
//!
//! let result = to_value("db: { host: \"localhost\"");
//! assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
//!
//! if let Err(err) = result {
//!     assert!(err.to_string().contains("line 1"));
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised while parsing, compiling or
/// deserializing Diana documents.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error while reading the source
    #[error("IO error: {0}")]
    Io(String),

    /// An `ERROR` token produced by the lexer
    #[error("Lexical error at line {line}, column {col}: {msg}")]
    Lex { line: usize, col: usize, msg: String },

    /// The current token does not match the one the grammar requires
    #[error("Unexpected token at line {line}, column {col}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        col: usize,
        expected: String,
        found: String,
    },

    /// Input ended while a value or closing delimiter was still required
    #[error("Unexpected end of input at line {line}, column {col}: expected {expected}")]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
    },

    /// Bracketed key whose content is not a number, boolean or quoted string
    #[error("Invalid computed key {key} at line {line}, column {col}\nHelp: computed keys hold a number, `true`/`false` or a quoted string, e.g. [123]: or [\"a.b\"]:")]
    InvalidKey { line: usize, col: usize, key: String },

    /// Number literal that does not fit an f64
    #[error("Invalid number literal '{literal}' at line {line}, column {col}")]
    InvalidNumber {
        line: usize,
        col: usize,
        literal: String,
    },

    /// `let` binding without its `=` sign
    #[error("Malformed let binding '{name}' at line {line}, column {col}: expected '='")]
    MissingLetEquals {
        line: usize,
        col: usize,
        name: String,
    },

    /// Objects, lists or blocks nested deeper than the configured limit
    #[error("Nesting depth limit of {limit} exceeded at line {line}, column {col}")]
    DepthLimitExceeded { line: usize, col: usize, limit: usize },

    /// AST shape the compiler cannot handle
    #[error("Compile error: {0}")]
    Compile(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a lexical error from the message of an `ERROR` token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use diana::Error;
    ///
    /// let err = Error::lex(3, 7, "Unknown character: @");
    /// assert!(err.to_string().contains("line 3, column 7"));
    /// ```
    pub fn lex(line: usize, col: usize, msg: &str) -> Self {
        Error::Lex {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates an error naming the expected and the actual token.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use diana::Error;
    ///
    /// let err = Error::unexpected_token(1, 4, "COLON", "NUMBER(1)");
    /// assert!(err.to_string().contains("expected COLON, found NUMBER(1)"));
    /// ```
    pub fn unexpected_token(line: usize, col: usize, expected: &str, found: &str) -> Self {
        Error::UnexpectedToken {
            line,
            col,
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
        }
    }

    /// Creates an invalid computed key error; `key` is the raw bracketed text.
    pub fn invalid_key(line: usize, col: usize, key: &str) -> Self {
        Error::InvalidKey {
            line,
            col,
            key: key.to_string(),
        }
    }

    pub fn invalid_number(line: usize, col: usize, literal: &str) -> Self {
        Error::InvalidNumber {
            line,
            col,
            literal: literal.to_string(),
        }
    }

    pub fn missing_let_equals(line: usize, col: usize, name: &str) -> Self {
        Error::MissingLetEquals {
            line,
            col,
            name: name.to_string(),
        }
    }

    pub fn depth_limit(line: usize, col: usize, limit: usize) -> Self {
        Error::DepthLimitExceeded { line, col, limit }
    }

    /// Creates a compile error. Reaching one means the AST handed to the
    /// compiler was not produced by [`parse`](crate::parse).
    pub fn compile<T: fmt::Display>(msg: T) -> Self {
        Error::Compile(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use diana::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for source reading failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Returns the `(line, column)` the error points at, if it has one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use diana::Error;
    ///
    /// assert_eq!(Error::lex(2, 5, "oops").position(), Some((2, 5)));
    /// assert_eq!(Error::custom("oops").position(), None);
    /// ```
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            Error::Lex { line, col, .. }
            | Error::UnexpectedToken { line, col, .. }
            | Error::UnexpectedEof { line, col, .. }
            | Error::InvalidKey { line, col, .. }
            | Error::InvalidNumber { line, col, .. }
            | Error::MissingLetEquals { line, col, .. }
            | Error::DepthLimitExceeded { line, col, .. } => Some((*line, *col)),
            Error::Io(_) | Error::Compile(_) | Error::Custom(_) => None,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_position() {
        let err = Error::unexpected_token(10, 5, "RBRACE", "COLON");
        assert_eq!(
            err.to_string(),
            "Unexpected token at line 10, column 5: expected RBRACE, found COLON"
        );
    }

    #[test]
    fn test_invalid_key_has_help() {
        let err = Error::invalid_key(1, 1, "[abc]");
        let msg = err.to_string();
        assert!(msg.contains("[abc]"));
        assert!(msg.contains("Help:"));
    }

    #[test]
    fn test_position() {
        assert_eq!(Error::depth_limit(4, 2, 128).position(), Some((4, 2)));
        assert_eq!(Error::compile("bad node").position(), None);
    }
}
