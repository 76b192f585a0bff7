//! Tokens produced by the [`lexer`](crate::lexer) and consumed by the
//! [`parser`](crate::parser).

use std::fmt;

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// `; text` or `;;; text ;;;`
    Comment,
    /// Bare word, quoted key, bracketed key or operator text
    Identifier,
    Number,
    String,
    /// `true` or `false`
    Boolean,
    /// `null`
    Null,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `*`
    Asterisk,
    Newline,
    Indent,
    Dedent,
    /// `let`
    Let,
    /// Lexical error; the token value holds the message
    Error,
    Eof,
}

impl TokenType {
    /// The upper-case name used in diagnostics, e.g. `LBRACE`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenType::Comment => "COMMENT",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Number => "NUMBER",
            TokenType::String => "STRING",
            TokenType::Boolean => "BOOLEAN",
            TokenType::Null => "NULL",
            TokenType::Colon => "COLON",
            TokenType::Comma => "COMMA",
            TokenType::LBrace => "LBRACE",
            TokenType::RBrace => "RBRACE",
            TokenType::LBracket => "LBRACKET",
            TokenType::RBracket => "RBRACKET",
            TokenType::Asterisk => "ASTERISK",
            TokenType::Newline => "NEWLINE",
            TokenType::Indent => "INDENT",
            TokenType::Dedent => "DEDENT",
            TokenType::Let => "LET",
            TokenType::Error => "ERROR",
            TokenType::Eof => "EOF",
        }
    }

    /// Tokens that only shape the layout of the source.
    #[inline]
    #[must_use]
    pub const fn is_layout(&self) -> bool {
        matches!(
            self,
            TokenType::Newline | TokenType::Indent | TokenType::Dedent
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single token with the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenType,
    pub value: Option<String>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenType, value: Option<String>, line: usize, column: usize) -> Self {
        Token {
            kind,
            value,
            line,
            column,
        }
    }

    /// The token value, or `""` for valueless tokens.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Returns `true` for an `IDENTIFIER` whose text is exactly `text`.
    #[inline]
    #[must_use]
    pub fn is_word(&self, text: &str) -> bool {
        self.kind == TokenType::Identifier && self.value.as_deref() == Some(text)
    }

    /// Source-like rendering, used to rebuild raw `let` expressions.
    #[must_use]
    pub fn source_text(&self) -> String {
        match self.kind {
            TokenType::String => format!("\"{}\"", self.text()),
            TokenType::Colon => ":".to_string(),
            TokenType::Comma => ",".to_string(),
            TokenType::LBrace => "{".to_string(),
            TokenType::RBrace => "}".to_string(),
            TokenType::LBracket => "[".to_string(),
            TokenType::RBracket => "]".to_string(),
            TokenType::Asterisk => "*".to_string(),
            TokenType::Let => "let".to_string(),
            _ => self.text().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}({})", self.kind, value),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let tok = Token::new(TokenType::Number, Some("42".to_string()), 1, 1);
        assert_eq!(tok.to_string(), "NUMBER(42)");
        let tok = Token::new(TokenType::Colon, None, 1, 3);
        assert_eq!(tok.to_string(), "COLON");
    }

    #[test]
    fn test_is_word() {
        let eq = Token::new(TokenType::Identifier, Some("=".to_string()), 1, 7);
        assert!(eq.is_word("="));
        assert!(!eq.is_word("=="));
        let s = Token::new(TokenType::String, Some("=".to_string()), 1, 7);
        assert!(!s.is_word("="));
    }
}
