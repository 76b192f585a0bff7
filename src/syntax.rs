//! Diana Language Reference
//!
//! This module documents the Diana configuration syntax as implemented by
//! this crate. It contains no code.
//!
//! # Overview
//!
//! A Diana document is a sequence of `key: value` entries, comments and `let`
//! bindings. It compiles to a JSON-compatible tree: objects keep the order in
//! which their keys first appear.
//!
//! # Entries and Keys
//!
//! ```text
//! name: "Diana"          ; plain key
//! app.config.debug: true ; dotted key, expands into nested objects
//! "app.name": "literal"  ; quoted key, dots are kept
//! [123]: "numeric"       ; computed key, rendered as "123"
//! [true]: "boolean"      ; computed key, rendered as "true"
//! ["a.b"]: "bracketed"   ; bracketed string, same as "a.b"
//! ```
//!
//! **Rules**:
//! - Unquoted keys start with a letter or `_` and continue with letters,
//!   digits, `_`, `-` and `.`; every `.` separates a nesting level
//! - Quoted keys use `"…"`, `'…'`, `"""…"""` or `'''…'''`
//! - Computed keys hold a number (underscores allowed), `true`/`false` or a
//!   quoted string; anything else (`[abc]:`) is an error
//! - A later entry for the same key overwrites the earlier one in place; two
//!   objects under one key are merged key by key
//!
//! ```rust
//! let value = diana::to_value("app.name: \"X\"\napp.debug: true").unwrap();
//! assert_eq!(value.to_string(), r#"{ app: { name: "X", debug: true } }"#);
//! ```
//!
//! # Values
//!
//! | Type | Syntax | Example |
//! |------|--------|---------|
//! | Null | `null`, or nothing after the colon | `value: null` |
//! | Boolean | `true` / `false` | `active: true` |
//! | Number | sign, fraction, exponent, `_` separators | `size: 1_048_576`, `r: -.5e-3` |
//! | String | `"…"`, `'…'`, `"""…"""`, `'''…'''` | `name: "x"` |
//! | Bare word | identifier text, compiles to a string | `mode: production` |
//! | Object | `{ k: v, … }` (commas optional across lines) | `db: { port: 5432 }` |
//! | List | `[v, …]` | `ports: [80, 443]` |
//!
//! Strings are verbatim: there are no escape sequences. Triple-quoted strings
//! keep embedded newlines exactly.
//!
//! # Indentation
//!
//! A key with nothing after its colon, followed by deeper-indented lines,
//! opens a block. Lines starting with `*` make the block a list; otherwise it
//! is an object.
//!
//! ```text
//! server:
//!   host: "0.0.0.0"
//!   port: 8080
//! pets:
//!   * name: "Fluffy"
//!     type: "cat"
//!   * "just a string"
//! ```
//!
//! A list item that begins with `key:` is an object; further `key: value`
//! lines indented under it belong to the same item. Only spaces count
//! towards indentation, and blank lines are ignored.
//!
//! ```rust
//! let src = "pets:\n  * name: \"Fluffy\"\n    type: \"cat\"\n  * \"goldfish\"";
//! let value = diana::to_value(src).unwrap();
//! assert_eq!(value["pets"][0]["type"].as_str(), Some("cat"));
//! assert_eq!(value["pets"][1].as_str(), Some("goldfish"));
//! ```
//!
//! Inside `{…}` and `[…]` newlines and indentation are not significant.
//!
//! # Comments
//!
//! ```text
//! ; line comment
//! ;;; block comment
//!     spanning lines ;;;
//! ```
//!
//! Comments never appear in the compiled output.
//!
//! # Let Bindings
//!
//! ```text
//! let port = 8080
//! let limit: int = 10
//! let add(a, b) = a + b
//! ```
//!
//! Bindings are parsed and kept in the syntax tree but contribute nothing to
//! the compiled value. A right-hand side that is not a single literal is kept
//! as raw text ([`AstNode::RawExpression`](crate::AstNode::RawExpression)).
//!
//! # Errors
//!
//! Lexical problems (unclosed strings or block comments, unknown characters,
//! malformed numbers) are reported with their line and column. So are
//! structural problems such as a missing `}` or a `let` without `=`.
//! See [`Error`](crate::Error).
