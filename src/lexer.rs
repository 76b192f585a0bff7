//! Diana lexer.
//!
//! Turns source text into a flat [`Token`] sequence in a single left-to-right
//! pass. Indentation is tracked with an explicit stack of column widths that
//! lives only for the duration of one [`tokenize`] call: a deeper line pushes
//! and emits `INDENT`, a shallower one pops and emits one `DEDENT` per level.
//!
//! The lexer never fails. Problems such as an unterminated string are emitted
//! as `ERROR` tokens whose value is the diagnostic, and the stream always ends
//! with exactly one `EOF`.
//!
//! ```rust
//! use diana::{tokenize, TokenType};
//!
//! let kinds: Vec<TokenType> = tokenize("port: 8_080").iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![TokenType::Identifier, TokenType::Colon, TokenType::Number, TokenType::Eof]
//! );
//! ```

use crate::token::{Token, TokenType};
use log::{debug, trace};
use std::collections::HashMap;

/// Tokenizes a complete Diana document.
#[must_use]
pub fn tokenize(source: &str) -> Vec<Token> {
    let tokens = Lexer::new(source).run();
    debug!(
        "tokenized {} bytes into {} tokens",
        source.len(),
        tokens.len()
    );
    tokens
}

struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    indent_stack: Vec<usize>, // Widths of the open indentation levels, bottom is 0
    brackets: BracketMatches,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            column: 1,
            indent_stack: vec![0],
            brackets: BracketMatches::default(),
            tokens: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.next_char().is_none() {
                break;
            }
        }
    }

    fn push(&mut self, kind: TokenType, value: Option<String>, line: usize, column: usize) {
        if kind == TokenType::Error {
            trace!(
                "lexical error at {}:{}: {}",
                line,
                column,
                value.as_deref().unwrap_or("")
            );
        }
        self.tokens.push(Token::new(kind, value, line, column));
    }

    fn run(mut self) -> Vec<Token> {
        while let Some(ch) = self.peek_char() {
            let (line, col) = (self.line, self.column);
            match ch {
                ';' => self.lex_comment(line, col),
                ' ' | '\t' | '\r' => {
                    self.next_char();
                }
                '\n' => {
                    self.push(TokenType::Newline, None, line, col);
                    self.next_char();
                    self.measure_indent();
                }
                ':' => self.punctuation(TokenType::Colon, line, col),
                ',' => self.punctuation(TokenType::Comma, line, col),
                '{' => self.punctuation(TokenType::LBrace, line, col),
                '}' => self.punctuation(TokenType::RBrace, line, col),
                ']' => self.punctuation(TokenType::RBracket, line, col),
                '*' => self.punctuation(TokenType::Asterisk, line, col),
                '[' => self.lex_bracket(line, col),
                '"' | '\'' => self.lex_quoted(ch, line, col),
                '(' | ')' => {
                    self.next_char();
                    self.push(TokenType::Identifier, Some(ch.to_string()), line, col);
                }
                c if starts_number(c, self.peek_nth(1)) => self.lex_number(line, col),
                c if c.is_alphabetic() || c == '_' => self.lex_word(line, col),
                c if is_operator_char(c) => self.lex_operator(line, col),
                other => {
                    self.next_char();
                    self.push(
                        TokenType::Error,
                        Some(format!("Unknown character: {}", other)),
                        line,
                        col,
                    );
                }
            }
        }

        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.push(TokenType::Dedent, None, self.line, self.column);
        }
        self.push(TokenType::Eof, None, self.line, self.column);
        self.tokens
    }

    fn punctuation(&mut self, kind: TokenType, line: usize, col: usize) {
        self.next_char();
        self.push(kind, None, line, col);
    }

    /// Called right after a `\n`: measures the next line's leading spaces and
    /// emits `INDENT`/`DEDENT` against the indent stack.
    fn measure_indent(&mut self) {
        let after_blanks = self.rest().trim_start_matches([' ', '\t', '\r']);
        if after_blanks.is_empty() || after_blanks.starts_with('\n') {
            return;
        }

        let mut spaces = 0;
        while self.peek_char() == Some(' ') {
            self.next_char();
            spaces += 1;
        }

        let top = self.indent_stack.last().copied().unwrap_or(0);
        if spaces > top {
            self.indent_stack.push(spaces);
            self.push(TokenType::Indent, None, self.line, self.column);
        } else {
            while self.indent_stack.last().is_some_and(|&width| spaces < width) {
                self.indent_stack.pop();
                self.push(TokenType::Dedent, None, self.line, self.column);
            }
        }
    }

    fn lex_comment(&mut self, line: usize, col: usize) {
        if self.rest().starts_with(";;;") {
            let start = self.position;
            self.advance(3);
            loop {
                if self.rest().starts_with(";;;") {
                    self.advance(3);
                    let text = self.input[start..self.position].to_string();
                    self.push(TokenType::Comment, Some(text), line, col);
                    return;
                }
                if self.next_char().is_none() {
                    self.push(
                        TokenType::Error,
                        Some("Unclosed block comment".to_string()),
                        line,
                        col,
                    );
                    return;
                }
            }
        }

        self.next_char(); // consume ';'
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.next_char();
        }
        let text = self.input[start..self.position].trim_end_matches('\r');
        self.push(TokenType::Comment, Some(text.to_string()), line, col);
    }

    /// Lexes `"…"`, `'…'`, `"""…"""` or `'''…'''`. A closing delimiter
    /// followed by `:` makes the whole delimited text a key.
    fn lex_quoted(&mut self, quote: char, line: usize, col: usize) {
        let open = self.position;
        let triple: String = std::iter::repeat(quote).take(3).collect();
        let is_triple = self.rest().starts_with(triple.as_str());
        let delimiter_len = if is_triple { 3 } else { 1 };
        self.advance(delimiter_len);

        let content_start = self.position;
        let content_end = loop {
            let closed = if is_triple {
                self.rest().starts_with(triple.as_str())
            } else {
                self.peek_char() == Some(quote)
            };
            if closed {
                let end = self.position;
                self.advance(delimiter_len);
                break end;
            }
            if self.next_char().is_none() {
                let msg = if is_triple {
                    "Unclosed triple-quoted string".to_string()
                } else {
                    "Unclosed string".to_string()
                };
                self.push(TokenType::Error, Some(msg), line, col);
                return;
            }
        };

        if followed_by_colon(self.rest()) {
            let raw = self.input[open..self.position].to_string();
            self.push(TokenType::Identifier, Some(raw), line, col);
        } else {
            let content = self.input[content_start..content_end].to_string();
            self.push(TokenType::String, Some(content), line, col);
        }
    }

    /// A `[` opens a computed key when its matching `]` is followed by `:`;
    /// otherwise it is an ordinary list bracket.
    fn lex_bracket(&mut self, line: usize, col: usize) {
        let start = self.position;
        let key_end = self
            .brackets
            .end_of(self.input, start)
            .filter(|&end| followed_by_colon(&self.input[end..]));
        let Some(end) = key_end else {
            self.punctuation(TokenType::LBracket, line, col);
            return;
        };

        while self.position < end {
            self.next_char();
        }
        let raw = &self.input[start..self.position];
        if raw[1..raw.len() - 1].trim().is_empty() {
            self.push(
                TokenType::Error,
                Some("Empty computed key".to_string()),
                line,
                col,
            );
        } else {
            self.push(TokenType::Identifier, Some(raw.to_string()), line, col);
        }
    }

    fn lex_number(&mut self, line: usize, col: usize) {
        let start = self.position;
        if self.peek_char() == Some('-') {
            self.next_char();
        }
        let leading_dot = self.peek_char() == Some('.');
        if leading_dot {
            self.next_char();
        }
        self.eat_digits();

        if !leading_dot && self.peek_char() == Some('.') {
            self.next_char();
            self.eat_digits();
        }

        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let exponent_follows = match self.peek_nth(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self.peek_nth(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if exponent_follows {
                self.next_char();
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    self.next_char();
                }
                self.eat_digits();
            }
        }

        let raw = &self.input[start..self.position];
        let cleaned = raw.replace('_', "");
        if cleaned.parse::<f64>().is_ok() {
            self.push(TokenType::Number, Some(cleaned), line, col);
        } else {
            self.push(
                TokenType::Error,
                Some(format!("Invalid number literal '{}'", raw)),
                line,
                col,
            );
        }
    }

    fn eat_digits(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() || ch == '_' {
                self.next_char();
            } else {
                break;
            }
        }
    }

    fn lex_word(&mut self, line: usize, col: usize) {
        let start = self.position;
        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || matches!(ch, '_' | '.' | '-') {
                self.next_char();
            } else {
                break;
            }
        }
        let word = &self.input[start..self.position];
        let kind = match word {
            "true" | "false" => TokenType::Boolean,
            "null" => TokenType::Null,
            "let" => TokenType::Let,
            _ => TokenType::Identifier,
        };
        self.push(kind, Some(word.to_string()), line, col);
    }

    fn lex_operator(&mut self, line: usize, col: usize) {
        let start = self.position;
        while self.peek_char().is_some_and(is_operator_char) {
            self.next_char();
        }
        let text = self.input[start..self.position].to_string();
        self.push(TokenType::Identifier, Some(text), line, col);
    }
}

fn starts_number(ch: char, next: Option<char>) -> bool {
    let next_is_digit = next.is_some_and(|c| c.is_ascii_digit());
    ch.is_ascii_digit()
        || (ch == '-' && (next_is_digit || next == Some('.')))
        || (ch == '.' && next_is_digit)
}

fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '=' | '+' | '-' | '/' | '%' | '<' | '>' | '!' | '&' | '|' | '?' | '^' | '~'
    )
}

fn followed_by_colon(rest: &str) -> bool {
    rest.trim_start_matches([' ', '\t']).starts_with(':')
}

/// Matching `]` offsets for `[` brackets, keyed by the byte offset of the `[`.
///
/// One scan from an unmatched `[` records every bracket opened inside it, so
/// nested and unclosed runs are scanned once in total.
#[derive(Default)]
struct BracketMatches {
    ends: HashMap<usize, Option<usize>>,
}

impl BracketMatches {
    /// Offset just past the `]` matching the `[` at `open`, or `None` when it
    /// never closes. Quoted runs are skipped.
    fn end_of(&mut self, input: &str, open: usize) -> Option<usize> {
        if let Some(&end) = self.ends.get(&open) {
            return end;
        }

        let mut stack = Vec::new();
        let mut quote: Option<char> = None;
        for (i, ch) in input[open..].char_indices() {
            if let Some(q) = quote {
                if ch == q {
                    quote = None;
                }
                continue;
            }
            match ch {
                '"' | '\'' => quote = Some(ch),
                '[' => stack.push(open + i),
                ']' => {
                    if let Some(start) = stack.pop() {
                        self.ends.insert(start, Some(open + i + 1));
                    }
                    if stack.is_empty() {
                        break;
                    }
                }
                _ => {}
            }
        }
        for start in stack {
            self.ends.insert(start, None);
        }
        self.ends.get(&open).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenType> {
        tokenize(src).iter().map(|t| t.kind).collect()
    }

    fn values_of(src: &str, kind: TokenType) -> Vec<String> {
        tokenize(src)
            .into_iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.value.unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_simple_key_value() {
        use TokenType::*;
        assert_eq!(kinds("integer: 123"), vec![Identifier, Colon, Number, Eof]);
    }

    #[test]
    fn test_line_comment() {
        let tokens = tokenize("; this is a comment\nkey: 1");
        assert_eq!(tokens[0].kind, TokenType::Comment);
        assert_eq!(tokens[0].text(), " this is a comment");
        assert_eq!(tokens[1].kind, TokenType::Newline);
    }

    #[test]
    fn test_block_comment() {
        let src = ";;; this is a\nmulti-line\nblock comment ;;;\nkey: 1";
        let comments = values_of(src, TokenType::Comment);
        assert_eq!(
            comments,
            vec![";;; this is a\nmulti-line\nblock comment ;;;".to_string()]
        );
        let key = tokenize(src)
            .into_iter()
            .find(|t| t.is_word("key"))
            .unwrap();
        assert_eq!((key.line, key.column), (4, 1));
    }

    #[test]
    fn test_unclosed_block_comment() {
        let tokens = tokenize(";;; never closed");
        assert_eq!(tokens[0].kind, TokenType::Error);
        assert!(tokens[0].text().contains("Unclosed block comment"));
        assert_eq!(tokens.last().unwrap().kind, TokenType::Eof);
    }

    #[test]
    fn test_strings() {
        assert_eq!(values_of("a: \"value\"", TokenType::String), vec!["value"]);
        assert_eq!(values_of("a: 'single'", TokenType::String), vec!["single"]);
        assert_eq!(values_of("a: \"\"", TokenType::String), vec![""]);
    }

    #[test]
    fn test_triple_quoted_string_keeps_newlines() {
        let strings = values_of("multi: \"\"\"multi\nline\nstring\"\"\"", TokenType::String);
        assert_eq!(strings, vec!["multi\nline\nstring"]);
        let strings = values_of("m: '''a\nb'''", TokenType::String);
        assert_eq!(strings, vec!["a\nb"]);
    }

    #[test]
    fn test_unclosed_string() {
        let tokens = tokenize("key: \"unclosed string");
        let error = tokens.iter().find(|t| t.kind == TokenType::Error).unwrap();
        assert_eq!(error.text(), "Unclosed string");
        assert_eq!((error.line, error.column), (1, 6));
        assert_eq!(tokens.last().unwrap().kind, TokenType::Eof);
    }

    #[test]
    fn test_quoted_keys() {
        let src = "\"name.value.test\": 1\n\"\"\"triple key\"\"\" : 2\n'single': 3";
        let idents = values_of(src, TokenType::Identifier);
        assert_eq!(
            idents,
            vec!["\"name.value.test\"", "\"\"\"triple key\"\"\"", "'single'"]
        );
    }

    #[test]
    fn test_bracketed_keys() {
        let tokens = tokenize("[abc]: 1\n[def] 2");
        assert!(tokens
            .iter()
            .any(|t| t.kind == TokenType::Identifier && t.text() == "[abc]"));
        assert!(tokens.iter().any(|t| t.kind == TokenType::LBracket));
        assert!(tokens.iter().any(|t| t.is_word("def")));
    }

    #[test]
    fn test_list_is_not_a_key() {
        use TokenType::*;
        assert_eq!(
            kinds("[1, 2, 3]"),
            vec![LBracket, Number, Comma, Number, Comma, Number, RBracket, Eof]
        );
        assert_eq!(
            kinds("[[1], [2]]"),
            vec![LBracket, LBracket, Number, RBracket, Comma, LBracket, Number, RBracket, RBracket, Eof]
        );
    }

    #[test]
    fn test_quoted_bracket_key_with_bracket_inside() {
        let idents = values_of("[\"a]b\"]: 1", TokenType::Identifier);
        assert_eq!(idents, vec!["[\"a]b\"]"]);
    }

    #[test]
    fn test_nested_computed_key_span() {
        let idents = values_of("[[1]]: 2\nx: [[3], [4]]", TokenType::Identifier);
        assert_eq!(idents, vec!["[[1]]", "x"]);
    }

    #[test]
    fn test_unclosed_bracket_run() {
        let src = format!("a: {}", "[".repeat(20_000));
        let tokens = tokenize(&src);
        assert_eq!(tokens.len(), 20_003);
        assert!(tokens[2..20_002]
            .iter()
            .all(|t| t.kind == TokenType::LBracket));
        assert_eq!(tokens[20_002].kind, TokenType::Eof);
    }

    #[test]
    fn test_empty_computed_key() {
        let tokens = tokenize("[ ]: 1");
        assert_eq!(tokens[0].kind, TokenType::Error);
        assert!(tokens[0].text().starts_with("Empty computed key"));
    }

    #[test]
    fn test_numbers_with_underscores() {
        let src = "a: 1_000\nb: 3.14_159\nc: 6.02e+23_000\nd: -1_234.5_678e-9_876";
        assert_eq!(
            values_of(src, TokenType::Number),
            vec!["1000", "3.14159", "6.02e+23000", "-1234.5678e-9876"]
        );
    }

    #[test]
    fn test_leading_dot_numbers() {
        assert_eq!(values_of("a: .5\nb: -.5", TokenType::Number), vec![".5", "-.5"]);
    }

    #[test]
    fn test_exponent_requires_digits() {
        use TokenType::*;
        assert_eq!(kinds("3em"), vec![Number, Identifier, Eof]);
        assert_eq!(values_of("1E3", TokenType::Number), vec!["1E3"]);
    }

    #[test]
    fn test_keywords() {
        use TokenType::*;
        assert_eq!(
            kinds("true false null let"),
            vec![Boolean, Boolean, Null, Let, Eof]
        );
        let tokens = tokenize("let x = 1");
        assert_eq!(tokens[0].kind, TokenType::Let);
        assert_eq!(tokens[0].text(), "let");
        assert!(tokens[2].is_word("="));
    }

    #[test]
    fn test_identifier_characters() {
        assert_eq!(
            values_of("server-config.port_2: x", TokenType::Identifier),
            vec!["server-config.port_2", "x"]
        );
    }

    #[test]
    fn test_operator_text() {
        let idents = values_of("let add(a, b) = a + b", TokenType::Identifier);
        assert_eq!(idents, vec!["add", "(", "a", "b", ")", "=", "a", "+", "b"]);
        assert_eq!(values_of("x == y", TokenType::Identifier), vec!["x", "==", "y"]);
    }

    #[test]
    fn test_unknown_character() {
        let tokens = tokenize("a: @");
        let error = tokens.iter().find(|t| t.kind == TokenType::Error).unwrap();
        assert_eq!(error.text(), "Unknown character: @");
        assert_eq!(error.column, 4);
        assert_eq!(tokens.last().unwrap().kind, TokenType::Eof);
    }

    #[test]
    fn test_indent_and_dedent() {
        use TokenType::*;
        assert_eq!(
            kinds("a:\n  b: 1\n  c: 2\nd: 3"),
            vec![
                Identifier, Colon, Newline, Indent, Identifier, Colon, Number, Newline,
                Identifier, Colon, Number, Newline, Dedent, Identifier, Colon, Number, Eof
            ]
        );
    }

    #[test]
    fn test_dedents_flushed_at_eof() {
        let k = kinds("a:\n  b:\n    c: 1");
        let indents = k.iter().filter(|&&t| t == TokenType::Indent).count();
        let dedents = k.iter().filter(|&&t| t == TokenType::Dedent).count();
        assert_eq!(indents, 2);
        assert_eq!(dedents, 2);
        assert_eq!(k[k.len() - 1], TokenType::Eof);
        assert_eq!(k[k.len() - 2], TokenType::Dedent);
    }

    #[test]
    fn test_blank_lines_do_not_touch_indentation() {
        let k = kinds("a:\n  b: 1\n\n   \t\n  c: 2");
        assert_eq!(k.iter().filter(|&&t| t == TokenType::Indent).count(), 1);
        assert_eq!(k.iter().filter(|&&t| t == TokenType::Dedent).count(), 1);
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("a: 1\n  b: 2");
        let b = tokens.iter().find(|t| t.is_word("b")).unwrap();
        assert_eq!((b.line, b.column), (2, 3));
    }

    #[test]
    fn test_crlf_line_endings() {
        use TokenType::*;
        assert_eq!(
            kinds("a: 1\r\nb: 2\r\n"),
            vec![Identifier, Colon, Number, Newline, Identifier, Colon, Number, Newline, Eof]
        );
    }
}
