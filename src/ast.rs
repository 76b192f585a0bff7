//! Abstract syntax tree produced by the [`parser`](crate::parser).
//!
//! The tree is built once from the full token sequence and is immutable
//! afterwards; the [`compiler`](crate::compiler) walks it exactly once.

use std::fmt;

/// One node of the Diana syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Root of every parsed document.
    Program { children: Vec<AstNode> },
    KeyValue(KeyValue),
    /// `{ k: v, ... }` or an indented key/value block.
    Object { properties: Vec<KeyValue> },
    /// `[a, b]` or a `*` indented list.
    List { items: Vec<AstNode> },
    String { value: String },
    Number { value: f64 },
    Boolean { value: bool },
    Null,
    /// A bare word in value position; compiles to a plain string.
    Identifier { name: String },
    Comment { value: String },
    /// `let NAME [: TYPE | (params)] = value`
    LetBinding {
        name: String,
        value: Box<AstNode>,
        annotation: Option<Box<AstNode>>,
        params: Option<Vec<String>>,
    },
    /// Right-hand side of a `let` that is not a single literal, kept as the
    /// space-joined source tokens. Never evaluated.
    RawExpression { text: String },
}

/// A `key: value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyValue {
    pub key: KeyNode,
    pub value: Box<AstNode>,
}

impl KeyValue {
    pub fn new(key: KeyNode, value: AstNode) -> Self {
        KeyValue {
            key,
            value: Box::new(value),
        }
    }
}

/// The three key-naming conventions.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyNode {
    /// Unquoted key split on `.`; `a.b.c` expands into nested objects.
    KeyPath { path: Vec<String> },
    /// Quoted key; dots are literal.
    StringKey { value: String },
    /// Bracketed `[123]` or `[true]` key.
    ComputedKey { value: ComputedKey },
}

/// Literal held by a bracketed key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComputedKey {
    Number(f64),
    Bool(bool),
}

impl fmt::Display for ComputedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputedKey::Number(n) => f.write_str(&format_number(*n)),
            ComputedKey::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl KeyNode {
    /// The key as it appears in compiled output; key paths are joined back
    /// with `.`.
    #[must_use]
    pub fn to_key_string(&self) -> String {
        match self {
            KeyNode::KeyPath { path } => path.join("."),
            KeyNode::StringKey { value } => value.clone(),
            KeyNode::ComputedKey { value } => value.to_string(),
        }
    }
}

impl AstNode {
    /// Variant name, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            AstNode::Program { .. } => "Program",
            AstNode::KeyValue(_) => "KeyValue",
            AstNode::Object { .. } => "Object",
            AstNode::List { .. } => "List",
            AstNode::String { .. } => "String",
            AstNode::Number { .. } => "Number",
            AstNode::Boolean { .. } => "Boolean",
            AstNode::Null => "Null",
            AstNode::Identifier { .. } => "Identifier",
            AstNode::Comment { .. } => "Comment",
            AstNode::LetBinding { .. } => "LetBinding",
            AstNode::RawExpression { .. } => "RawExpression",
        }
    }

    /// Number of nodes in this subtree, the node itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + match self {
            AstNode::Program { children } => children.iter().map(AstNode::node_count).sum(),
            AstNode::KeyValue(kv) => kv.value.node_count(),
            AstNode::Object { properties } => {
                properties.iter().map(|kv| 1 + kv.value.node_count()).sum()
            }
            AstNode::List { items } => items.iter().map(AstNode::node_count).sum(),
            AstNode::LetBinding {
                value, annotation, ..
            } => value.node_count() + annotation.as_ref().map_or(0, |a| a.node_count()),
            _ => 0,
        }
    }
}

/// Renders a number the way JavaScript's `String(n)` does: shortest
/// round-trip digits, plain decimal for `1e-6 <= |n| < 1e21` and exponent
/// form (`1e+21`, `1.5e-7`) outside it.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if (1e-6..1e21).contains(&n.abs()) {
        format!("{}", n)
    } else {
        let formatted = format!("{:e}", n);
        match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_key_rendering() {
        assert_eq!(ComputedKey::Number(123.0).to_string(), "123");
        assert_eq!(ComputedKey::Number(1.5).to_string(), "1.5");
        assert_eq!(ComputedKey::Number(-0.25).to_string(), "-0.25");
        assert_eq!(ComputedKey::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_number_rendering_switches_to_exponent_form() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_key_path_string() {
        let key = KeyNode::KeyPath {
            path: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(key.to_key_string(), "a.b");
    }

    #[test]
    fn test_node_count() {
        let program = AstNode::Program {
            children: vec![
                AstNode::Comment {
                    value: "c".to_string(),
                },
                AstNode::KeyValue(KeyValue::new(
                    KeyNode::StringKey {
                        value: "k".to_string(),
                    },
                    AstNode::List {
                        items: vec![AstNode::Null, AstNode::Boolean { value: true }],
                    },
                )),
            ],
        };
        assert_eq!(program.node_count(), 6);
    }
}
