//! Diana parser.
//!
//! A recursive-descent parser over an immutable token slice. The cursor is a
//! plain index, so lookahead is `O(1)` and the `let` fallback can rewind by
//! restoring it.
//!
//! Layout tokens and comments are insignificant inside `{…}` and `[…]` bodies
//! and between top-level entries. Inside an indented block (`key:` followed by
//! a deeper line) the `DEDENT` closes the block. Any other token that fits no
//! production is a hard error.
//!
//! ```rust
//! use diana::{parse, tokenize, AstNode};
//!
//! let ast = parse(&tokenize("a.b: 1")).unwrap();
//! let AstNode::Program { children } = ast else { unreachable!() };
//! assert_eq!(children.len(), 1);
//! ```

use crate::ast::{AstNode, ComputedKey, KeyNode, KeyValue};
use crate::error::{Error, Result};
use crate::options::DianaOptions;
use crate::token::{Token, TokenType};
use log::{debug, trace};
use std::borrow::Cow;

/// Parses a token sequence into an [`AstNode::Program`] with default options.
pub fn parse(tokens: &[Token]) -> Result<AstNode> {
    parse_with_options(tokens, &DianaOptions::default())
}

/// Parses a token sequence into an [`AstNode::Program`].
///
/// `ERROR` tokens are fatal unless `options.lenient_lexing` is set, in which
/// case they are dropped before parsing.
///
/// # Examples
///
/// ```rust
/// use diana::{parse_with_options, tokenize, DianaOptions, Error};
///
/// let tokens = tokenize("a: [[[1]]]");
/// let options = DianaOptions::new().with_max_depth(2);
/// let err = parse_with_options(&tokens, &options).unwrap_err();
/// assert!(matches!(err, Error::DepthLimitExceeded { limit: 2, .. }));
/// ```
pub fn parse_with_options(tokens: &[Token], options: &DianaOptions) -> Result<AstNode> {
    let tokens = prepare(tokens, options)?;
    let mut parser = Parser::new(&tokens, options.max_depth);
    let program = parser.parse_program()?;
    debug!(
        "parsed {} tokens into {} AST nodes",
        tokens.len(),
        program.node_count()
    );
    Ok(program)
}

/// Applies the lexical-error policy and makes sure the slice ends in `EOF`.
fn prepare<'t>(tokens: &'t [Token], options: &DianaOptions) -> Result<Cow<'t, [Token]>> {
    let mut prepared = Cow::Borrowed(tokens);

    if options.lenient_lexing {
        let errors = tokens
            .iter()
            .filter(|t| t.kind == TokenType::Error)
            .count();
        if errors > 0 {
            trace!("skipping {} ERROR tokens", errors);
            prepared = Cow::Owned(
                tokens
                    .iter()
                    .filter(|t| t.kind != TokenType::Error)
                    .cloned()
                    .collect(),
            );
        }
    } else if let Some(bad) = tokens.iter().find(|t| t.kind == TokenType::Error) {
        return Err(Error::lex(bad.line, bad.column, bad.text()));
    }

    if let Some(scoped) = scope_bracket_layout(&prepared) {
        prepared = Cow::Owned(scoped);
    }

    if prepared.last().map(|t| t.kind) != Some(TokenType::Eof) {
        let (line, column) = prepared.last().map_or((1, 1), |t| (t.line, t.column));
        prepared
            .to_mut()
            .push(Token::new(TokenType::Eof, None, line, column));
    }
    Ok(prepared)
}

/// Keeps indentation inside `{…}` and `[…]` from leaking into the enclosing
/// block structure. A level opened inside brackets is dropped together with
/// its `DEDENT`; a `DEDENT` inside brackets that closes an outer level is
/// moved to just after the outermost closing bracket.
///
/// Returns `None` when no layout token sits inside brackets.
fn scope_bracket_layout(tokens: &[Token]) -> Option<Vec<Token>> {
    let mut depth = 0usize;
    let bracketed_layout = tokens.iter().any(|t| {
        match t.kind {
            TokenType::LBrace | TokenType::LBracket => depth += 1,
            TokenType::RBrace | TokenType::RBracket => depth = depth.saturating_sub(1),
            _ => {}
        }
        depth > 0 && matches!(t.kind, TokenType::Indent | TokenType::Dedent)
    });
    if !bracketed_layout {
        return None;
    }

    let mut scoped = Vec::with_capacity(tokens.len());
    let mut levels: Vec<bool> = Vec::new(); // true when opened inside brackets
    let mut deferred = 0usize;
    depth = 0;
    for token in tokens {
        match token.kind {
            TokenType::LBrace | TokenType::LBracket => depth += 1,
            TokenType::RBrace | TokenType::RBracket => depth = depth.saturating_sub(1),
            TokenType::Indent => {
                levels.push(depth > 0);
                if depth > 0 {
                    continue;
                }
            }
            TokenType::Dedent => {
                if levels.pop().unwrap_or(false) {
                    continue;
                }
                if depth > 0 {
                    deferred += 1;
                    continue;
                }
            }
            _ => {}
        }
        scoped.push(token.clone());
        if depth == 0 && deferred > 0 {
            trace!("moving {} DEDENT tokens past line {}", deferred, token.line);
            for _ in 0..std::mem::take(&mut deferred) {
                scoped.push(Token::new(TokenType::Dedent, None, token.line, token.column));
            }
        }
    }
    Some(scoped)
}

struct Parser<'a> {
    tokens: &'a [Token], // Never empty, always ends with EOF
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], max_depth: usize) -> Self {
        Parser {
            tokens,
            pos: 0,
            depth: 0,
            max_depth,
        }
    }

    // Cursor

    fn peek_at(&self, offset: usize) -> &'a Token {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn peek(&self) -> &'a Token {
        self.peek_at(0)
    }

    fn peek_kind(&self) -> TokenType {
        self.peek().kind
    }

    fn next(&mut self) -> &'a Token {
        let token = self.peek();
        if token.kind != TokenType::Eof {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, kind: TokenType, expected: &str) -> Result<&'a Token> {
        let token = self.peek();
        if token.kind == kind {
            Ok(self.next())
        } else {
            Err(self.unexpected(token, expected))
        }
    }

    fn unexpected(&self, token: &Token, expected: &str) -> Error {
        if token.kind == TokenType::Eof {
            Error::unexpected_eof(token.line, token.column, expected)
        } else {
            Error::unexpected_token(token.line, token.column, expected, &token.to_string())
        }
    }

    fn skip_while(&mut self, skip: impl Fn(TokenType) -> bool) {
        while skip(self.peek_kind()) {
            self.next();
        }
    }

    fn skip_insignificant(&mut self) {
        self.skip_while(|k| k.is_layout() || k == TokenType::Comment);
    }

    fn skip_newlines(&mut self) {
        self.skip_while(|k| k == TokenType::Newline || k == TokenType::Comment);
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            let token = self.peek();
            return Err(Error::depth_limit(token.line, token.column, self.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // Lookahead predicates

    fn at_key(&self) -> bool {
        let token = self.peek();
        match token.kind {
            TokenType::Identifier => true,
            TokenType::Boolean | TokenType::Null | TokenType::Let => {
                self.peek_at(1).kind == TokenType::Colon
            }
            _ => false,
        }
    }

    fn at_key_value(&self) -> bool {
        self.at_key() && self.peek_at(1).kind == TokenType::Colon
    }

    fn at_value(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenType::String
                | TokenType::Number
                | TokenType::Boolean
                | TokenType::Null
                | TokenType::LBrace
                | TokenType::LBracket
                | TokenType::Identifier
        )
    }

    /// True when the next significant token after newlines and comments is an
    /// `INDENT`, i.e. a nested block follows.
    fn block_follows(&self) -> bool {
        let mut offset = 0;
        loop {
            match self.peek_at(offset).kind {
                TokenType::Newline | TokenType::Comment => offset += 1,
                TokenType::Indent => return offset > 0,
                _ => return false,
            }
        }
    }

    fn at_line_end(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenType::Newline | TokenType::Eof | TokenType::Comment | TokenType::Dedent
        )
    }

    // Productions

    fn parse_program(&mut self) -> Result<AstNode> {
        let mut children = Vec::new();
        loop {
            self.skip_while(|k| k.is_layout());
            let token = self.peek();
            match token.kind {
                TokenType::Eof => break,
                TokenType::Comment => {
                    self.next();
                    children.push(AstNode::Comment {
                        value: token.text().to_string(),
                    });
                }
                TokenType::Let if self.peek_at(1).kind != TokenType::Colon => {
                    children.push(self.parse_let()?);
                }
                _ if self.at_key() => {
                    children.push(AstNode::KeyValue(self.parse_key_value()?));
                }
                _ => return Err(self.unexpected(token, "key, comment or let binding")),
            }
        }
        Ok(AstNode::Program { children })
    }

    fn parse_key_value(&mut self) -> Result<KeyValue> {
        let key_token = self.next();
        let key = parse_key(key_token)?;
        self.expect(TokenType::Colon, "COLON")?;
        let value = self.parse_value_or_block()?;
        Ok(KeyValue::new(key, value))
    }

    /// Value after a `key:` or `*`: an inline value, a nested indented block,
    /// or nothing at all (null).
    fn parse_value_or_block(&mut self) -> Result<AstNode> {
        if self.at_value() {
            return self.parse_value();
        }
        if self.block_follows() {
            self.skip_newlines();
            self.expect(TokenType::Indent, "INDENT")?;
            return self.parse_block();
        }
        match self.peek_kind() {
            TokenType::Newline
            | TokenType::Comment
            | TokenType::Eof
            | TokenType::Dedent
            | TokenType::Comma
            | TokenType::RBrace => Ok(AstNode::Null),
            _ => Err(self.unexpected(self.peek(), "value")),
        }
    }

    /// Body of an indented block; the opening `INDENT` is already consumed.
    fn parse_block(&mut self) -> Result<AstNode> {
        self.enter()?;
        self.skip_newlines();
        let node = if self.peek_kind() == TokenType::Asterisk {
            self.parse_indented_list()?
        } else {
            self.parse_indented_object()?
        };
        self.leave();
        Ok(node)
    }

    fn close_block(&mut self) -> bool {
        match self.peek_kind() {
            TokenType::Dedent => {
                self.next();
                true
            }
            TokenType::Eof => true,
            _ => false,
        }
    }

    fn parse_indented_list(&mut self) -> Result<AstNode> {
        let mut items = Vec::new();
        loop {
            self.skip_newlines();
            if self.close_block() {
                break;
            }
            self.expect(TokenType::Asterisk, "ASTERISK")?;
            items.push(self.parse_list_item()?);
        }
        Ok(AstNode::List { items })
    }

    fn parse_indented_object(&mut self) -> Result<AstNode> {
        let mut properties = Vec::new();
        loop {
            self.skip_newlines();
            if self.close_block() {
                break;
            }
            if !self.at_key() {
                return Err(self.unexpected(self.peek(), "key"));
            }
            properties.push(self.parse_key_value()?);
        }
        Ok(AstNode::Object { properties })
    }

    /// `* key: v` starts an object item that continues through deeper
    /// indented key/values or further keys at the same level; anything else
    /// is a single value.
    fn parse_list_item(&mut self) -> Result<AstNode> {
        if !self.at_key_value() {
            return self.parse_value_or_block();
        }

        self.enter()?;
        let mut properties = vec![self.parse_key_value()?];
        loop {
            let resume = self.pos;
            self.skip_newlines();
            if self.peek_kind() == TokenType::Indent {
                self.next();
                loop {
                    self.skip_newlines();
                    if self.close_block() {
                        break;
                    }
                    if !self.at_key() {
                        return Err(self.unexpected(self.peek(), "key"));
                    }
                    properties.push(self.parse_key_value()?);
                }
            } else if self.at_key_value() {
                properties.push(self.parse_key_value()?);
            } else {
                self.pos = resume;
                break;
            }
        }
        self.leave();
        Ok(AstNode::Object { properties })
    }

    fn parse_value(&mut self) -> Result<AstNode> {
        let token = self.peek();
        match token.kind {
            TokenType::String => {
                self.next();
                Ok(AstNode::String {
                    value: token.text().to_string(),
                })
            }
            TokenType::Number => {
                self.next();
                let value = token
                    .text()
                    .parse::<f64>()
                    .map_err(|_| Error::invalid_number(token.line, token.column, token.text()))?;
                Ok(AstNode::Number { value })
            }
            TokenType::Boolean => {
                self.next();
                Ok(AstNode::Boolean {
                    value: token.text() == "true",
                })
            }
            TokenType::Null => {
                self.next();
                Ok(AstNode::Null)
            }
            TokenType::Identifier => {
                self.next();
                Ok(AstNode::Identifier {
                    name: token.text().to_string(),
                })
            }
            TokenType::LBrace => self.parse_object(),
            TokenType::LBracket => self.parse_list(),
            _ => Err(self.unexpected(token, "value")),
        }
    }

    fn parse_object(&mut self) -> Result<AstNode> {
        self.expect(TokenType::LBrace, "LBRACE")?;
        self.enter()?;
        let mut properties = Vec::new();
        loop {
            self.skip_insignificant();
            match self.peek_kind() {
                TokenType::RBrace => {
                    self.next();
                    break;
                }
                TokenType::Comma => {
                    self.next();
                }
                _ if self.at_key() => properties.push(self.parse_key_value()?),
                _ => return Err(self.unexpected(self.peek(), "key or RBRACE")),
            }
        }
        self.leave();
        Ok(AstNode::Object { properties })
    }

    fn parse_list(&mut self) -> Result<AstNode> {
        self.expect(TokenType::LBracket, "LBRACKET")?;
        self.enter()?;
        let mut items = Vec::new();
        loop {
            self.skip_insignificant();
            match self.peek_kind() {
                TokenType::RBracket => {
                    self.next();
                    break;
                }
                TokenType::Comma => {
                    self.next();
                }
                _ if self.at_value() => items.push(self.parse_value()?),
                _ => return Err(self.unexpected(self.peek(), "value or RBRACKET")),
            }
        }
        self.leave();
        Ok(AstNode::List { items })
    }

    fn parse_let(&mut self) -> Result<AstNode> {
        self.expect(TokenType::Let, "LET")?;
        let name_token = self.peek();
        if name_token.kind != TokenType::Identifier || !is_word(name_token.text()) {
            return Err(self.unexpected(name_token, "binding name"));
        }
        self.next();
        let name = name_token.text().to_string();

        let mut annotation = None;
        let mut params = None;
        if self.peek_kind() == TokenType::Colon {
            self.next();
            let ty = self.expect(TokenType::Identifier, "type name")?;
            annotation = Some(Box::new(AstNode::Identifier {
                name: ty.text().to_string(),
            }));
        } else if self.peek().is_word("(") {
            self.next();
            params = Some(self.parse_params(|t| t.is_word(")"), "')'")?);
        } else if self.peek_kind() == TokenType::LBracket {
            self.next();
            params = Some(self.parse_params(|t| t.kind == TokenType::RBracket, "RBRACKET")?);
        }

        let equals = self.peek();
        if !equals.is_word("=") {
            return Err(Error::missing_let_equals(equals.line, equals.column, &name));
        }
        self.next();

        let value = self.parse_let_value()?;
        Ok(AstNode::LetBinding {
            name,
            value: Box::new(value),
            annotation,
            params,
        })
    }

    fn parse_params(&mut self, is_close: impl Fn(&Token) -> bool, close: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        loop {
            let token = self.peek();
            if is_close(token) {
                self.next();
                return Ok(names);
            }
            match token.kind {
                TokenType::Comma => {
                    self.next();
                }
                TokenType::Identifier => {
                    self.next();
                    names.push(token.text().to_string());
                }
                _ => return Err(self.unexpected(token, &format!("parameter name or {}", close))),
            }
        }
    }

    /// A single value that ends the line, or else the rest of the line as a
    /// [`AstNode::RawExpression`].
    fn parse_let_value(&mut self) -> Result<AstNode> {
        let start = self.pos;
        let depth = self.depth;
        if self.at_value() {
            if let Ok(value) = self.parse_value() {
                if self.at_line_end() {
                    return Ok(value);
                }
            }
            self.pos = start;
            self.depth = depth;
        }

        let mut parts = Vec::new();
        while !matches!(self.peek_kind(), TokenType::Newline | TokenType::Eof) {
            let token = self.next();
            if token.kind != TokenType::Comment {
                parts.push(token.source_text());
            }
        }
        if parts.is_empty() {
            return Err(self.unexpected(self.peek(), "let value"));
        }
        let text = parts.join(" ");
        trace!("let value kept as raw expression: {}", text);
        Ok(AstNode::RawExpression { text })
    }
}

/// Decides the key convention from the raw key token.
fn parse_key(token: &Token) -> Result<KeyNode> {
    let raw = token.text();
    if token.kind != TokenType::Identifier {
        return Ok(KeyNode::KeyPath {
            path: vec![raw.to_string()],
        });
    }

    if raw.len() >= 2 && raw.starts_with('[') && raw.ends_with(']') {
        let inner = raw[1..raw.len() - 1].trim();
        return match inner {
            "true" => Ok(KeyNode::ComputedKey {
                value: ComputedKey::Bool(true),
            }),
            "false" => Ok(KeyNode::ComputedKey {
                value: ComputedKey::Bool(false),
            }),
            _ => {
                if let Some(value) = strip_quotes(inner) {
                    return Ok(KeyNode::StringKey {
                        value: value.to_string(),
                    });
                }
                let cleaned = inner.replace('_', "");
                match cleaned.parse::<f64>() {
                    Ok(n) if looks_numeric(&cleaned) => Ok(KeyNode::ComputedKey {
                        value: ComputedKey::Number(n),
                    }),
                    _ => Err(Error::invalid_key(token.line, token.column, raw)),
                }
            }
        };
    }

    if let Some(value) = strip_quotes(raw) {
        return Ok(KeyNode::StringKey {
            value: value.to_string(),
        });
    }

    Ok(KeyNode::KeyPath {
        path: raw.split('.').map(str::to_string).collect(),
    })
}

/// Content of a `"…"`, `'…'`, `"""…"""` or `'''…'''` delimited text.
fn strip_quotes(raw: &str) -> Option<&str> {
    for triple in ["\"\"\"", "'''"] {
        if raw.len() >= 6 && raw.starts_with(triple) && raw.ends_with(triple) {
            return Some(&raw[3..raw.len() - 3]);
        }
    }
    let first = raw.chars().next()?;
    if raw.len() >= 2 && (first == '"' || first == '\'') && raw.ends_with(first) {
        return Some(&raw[1..raw.len() - 1]);
    }
    None
}

/// Bare words start with a letter or `_`; operator runs and parentheses do not.
fn is_word(text: &str) -> bool {
    text.starts_with(|c: char| c.is_alphabetic() || c == '_')
}

/// Rejects words like `inf` or `NaN` that `f64::from_str` also accepts.
fn looks_numeric(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}
