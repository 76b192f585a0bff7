//! # diana
//!
//! A compiler for Diana, a human-writable configuration language that compiles
//! to a JSON-compatible value tree.
//!
//! ## What is Diana?
//!
//! Diana reads like a relaxed mix of YAML and JSON: `key: value` lines,
//! dotted keys that expand into nested objects, `{}` objects and `[]` lists,
//! `*` bullet lists driven by indentation, `;` comments and multi-line
//! strings. See the [`syntax`] module for the full language reference.
//!
//! ## Key Features
//!
//! - **Three-stage pipeline**: [`tokenize`] → [`parse`] → [`compile`], each
//!   stage usable on its own
//! - **Precise errors**: every parse error carries a line and column
//! - **Serde Compatible**: [`Value`] serializes to JSON, and [`from_str`]
//!   reads a document straight into any `#[derive(Deserialize)]` type
//! - **Ordered**: objects keep the order their keys were written in
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! diana = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Compiling to a value tree
//!
//! ```rust
//! let src = r#"
//! ; service settings
//! name: "Diana"
//! db: { host: "localhost", port: 5432 }
//! items:
//!   * "a"
//!   * "b"
//! "#;
//!
//! let value = diana::to_value(src).unwrap();
//! assert_eq!(
//!     serde_json::to_string(&value).unwrap(),
//!     r#"{"name":"Diana","db":{"host":"localhost","port":5432},"items":["a","b"]}"#
//! );
//! ```
//!
//! ### Typed configuration
//!
//! ```rust
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct App {
//!     name: String,
//!     debug: bool,
//! }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Config {
//!     app: App,
//! }
//!
//! let config: Config = diana::from_str("app.name: \"X\"\napp.debug: true").unwrap();
//! assert_eq!(config.app, App { name: "X".to_string(), debug: true });
//! ```
//!
//! ### Running the stages separately
//!
//! ```rust
//! use diana::{compile, parse, tokenize, TokenType};
//!
//! let tokens = tokenize("count: 1_000");
//! assert_eq!(tokens[2].kind, TokenType::Number);
//! assert_eq!(tokens[2].text(), "1000");
//!
//! let ast = parse(&tokens).unwrap();
//! let value = compile(&ast).unwrap();
//! assert_eq!(value["count"].as_i64(), Some(1000));
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: stage
//! summaries at `debug` level, lenient-mode skips and raw `let` expressions
//! at `trace` level. Install any `log` backend to see them.
//!
//! ## Demos
//!
//! The `demos/` directory holds runnable programs:
//!
//! - **`simple.rs`** - compile a document and print it as JSON
//! - **`typed_config.rs`** - read a document into Rust structs
//! - **`dynamic_values.rs`** - inspect and build values at runtime
//!
//! Run any demo with: `cargo run --example <name>`

pub mod ast;
pub mod compiler;
pub mod de;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod options;
pub mod parser;
pub mod syntax;
pub mod token;
pub mod value;

pub use ast::{AstNode, ComputedKey, KeyNode, KeyValue};
pub use compiler::{compile, compile_with_options};
pub use de::{from_value, ValueDeserializer};
pub use error::{Error, Result};
pub use lexer::tokenize;
pub use map::DianaMap;
pub use options::{DianaOptions, MergeStrategy};
pub use parser::{parse, parse_with_options};
pub use token::{Token, TokenType};
pub use value::Value;

use serde::de::DeserializeOwned;
use std::io;

/// Compiles Diana source text into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use diana::{to_value, Value};
///
/// let value = to_value("name: \"Diana\"\nactive: true\ncount: 42").unwrap();
/// assert_eq!(value["name"], Value::from("Diana"));
/// assert_eq!(value["count"], Value::Number(42.0));
/// ```
///
/// # Errors
///
/// Returns the first lexical or parse error, with its line and column.
pub fn to_value(source: &str) -> Result<Value> {
    to_value_with_options(source, DianaOptions::default())
}

/// Compiles Diana source text into a [`Value`] with custom options.
///
/// # Examples
///
/// ```rust
/// use diana::{to_value_with_options, DianaOptions};
///
/// let options = DianaOptions::new().with_lenient_lexing(true);
/// let value = to_value_with_options("a: 1\n# b: 2", options).unwrap();
/// assert_eq!(value["a"].as_i64(), Some(1));
/// ```
///
/// # Errors
///
/// Returns the first lexical or parse error, with its line and column.
pub fn to_value_with_options(source: &str, options: DianaOptions) -> Result<Value> {
    let tokens = tokenize(source);
    let ast = parse_with_options(&tokens, &options)?;
    compile_with_options(&ast, &options)
}

/// Deserializes an instance of type `T` from Diana source text.
///
/// # Examples
///
/// ```rust
/// use diana::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x: 1\ny: 2").unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the source is not valid Diana or does not fit `T`.
pub fn from_str<T>(source: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(source, DianaOptions::default())
}

/// Deserializes an instance of type `T` from Diana source text with custom
/// options.
///
/// # Errors
///
/// Returns an error if the source is not valid Diana or does not fit `T`.
pub fn from_str_with_options<T>(source: &str, options: DianaOptions) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(to_value_with_options(source, options)?)
}

/// Deserializes an instance of type `T` from an I/O stream of Diana source.
///
/// # Examples
///
/// ```rust
/// use diana::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_reader(Cursor::new(b"x: 1\ny: 2")).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, the input is not valid Diana, or it
/// does not fit `T`.
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut source = String::new();
    reader
        .read_to_string(&mut source)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&source)
}

/// Deserializes an instance of type `T` from bytes of Diana source.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, not valid Diana, or do
/// not fit `T`.
pub fn from_slice<T>(bytes: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let source = std::str::from_utf8(bytes).map_err(|e| Error::custom(e.to_string()))?;
    from_str(source)
}
