//! Diana compiler: AST → [`Value`].
//!
//! Pure structural recursion over the tree built by the
//! [`parser`](crate::parser). Comments and `let` bindings compile to nothing
//! and are omitted by their parent; every `key: value` entry becomes a
//! one-entry (or dot-path nested) map that is merged into its parent
//! according to [`MergeStrategy`](crate::MergeStrategy).

use crate::ast::{AstNode, KeyNode, KeyValue};
use crate::error::{Error, Result};
use crate::options::DianaOptions;
use crate::{DianaMap, Value};
use log::debug;

/// Compiles an AST with default options.
///
/// # Examples
///
/// ```rust
/// use diana::{compile, parse, tokenize, Value};
///
/// let ast = parse(&tokenize("a.b.c: 1")).unwrap();
/// let value = compile(&ast).unwrap();
/// assert_eq!(value["a"]["b"]["c"], Value::Number(1.0));
/// ```
pub fn compile(ast: &AstNode) -> Result<Value> {
    compile_with_options(ast, &DianaOptions::default())
}

/// Compiles an AST, merging same-key entries with `options.merge`.
pub fn compile_with_options(ast: &AstNode, options: &DianaOptions) -> Result<Value> {
    let compiler = Compiler { options };
    let value = compiler
        .compile_node(ast)?
        .ok_or_else(|| Error::compile(format!("{} node produces no value", ast.kind())))?;
    if let Value::Object(map) = &value {
        debug!("compiled document with {} top-level keys", map.len());
    }
    Ok(value)
}

struct Compiler<'o> {
    options: &'o DianaOptions,
}

impl Compiler<'_> {
    /// `None` means the node is absent from the output.
    fn compile_node(&self, node: &AstNode) -> Result<Option<Value>> {
        let value = match node {
            AstNode::Program { children } => {
                let mut map = DianaMap::new();
                for child in children {
                    if let AstNode::KeyValue(kv) = child {
                        map.merge(self.compile_entry(kv)?, self.options.merge);
                    }
                }
                Value::Object(map)
            }
            AstNode::KeyValue(kv) => Value::Object(self.compile_entry(kv)?),
            AstNode::Object { properties } => Value::Object(self.compile_properties(properties)?),
            AstNode::List { items } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(value) = self.compile_node(item)? {
                        values.push(value);
                    }
                }
                Value::Array(values)
            }
            AstNode::String { value } => Value::String(value.clone()),
            AstNode::Number { value } => Value::Number(*value),
            AstNode::Boolean { value } => Value::Bool(*value),
            AstNode::Null => Value::Null,
            AstNode::Identifier { name } => Value::String(name.clone()),
            AstNode::Comment { .. } | AstNode::LetBinding { .. } => return Ok(None),
            AstNode::RawExpression { text } => {
                return Err(Error::compile(format!(
                    "raw expression '{}' can only appear in a let binding",
                    text
                )))
            }
        };
        Ok(Some(value))
    }

    fn compile_properties(&self, properties: &[KeyValue]) -> Result<DianaMap> {
        let mut map = DianaMap::with_capacity(properties.len());
        for kv in properties {
            map.merge(self.compile_entry(kv)?, self.options.merge);
        }
        Ok(map)
    }

    /// `a.b.c: v` becomes `{a: {b: {c: v}}}`; quoted and computed keys stay
    /// a single entry.
    fn compile_entry(&self, kv: &KeyValue) -> Result<DianaMap> {
        let value = self
            .compile_node(&kv.value)?
            .ok_or_else(|| Error::compile(format!("{} node cannot be a value", kv.value.kind())))?;

        let mut segments = match &kv.key {
            KeyNode::KeyPath { path } if !path.is_empty() => path.clone(),
            key => vec![key.to_key_string()],
        };

        let mut map = DianaMap::new();
        let last = segments.pop().unwrap_or_default();
        map.insert(last, value);
        while let Some(segment) = segments.pop() {
            let mut parent = DianaMap::new();
            parent.insert(segment, Value::Object(map));
            map = parent;
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ComputedKey;
    use crate::options::MergeStrategy;
    use crate::{parse, tokenize};

    fn compile_src(src: &str) -> Value {
        compile(&parse(&tokenize(src)).unwrap()).unwrap()
    }

    fn json(src: &str) -> serde_json::Value {
        serde_json::to_value(compile_src(src)).unwrap()
    }

    #[test]
    fn test_dot_path_expansion() {
        assert_eq!(
            json("a.b.c: 42"),
            serde_json::json!({"a": {"b": {"c": 42}}})
        );
        assert_eq!(json("k: 1"), serde_json::json!({"k": 1}));
    }

    #[test]
    fn test_quoted_and_computed_keys_do_not_split() {
        assert_eq!(json("\"a.b\": 1"), serde_json::json!({"a.b": 1}));
        assert_eq!(json("[\"a.b\"]: 1"), serde_json::json!({"a.b": 1}));
        assert_eq!(json("[true]: \"x\""), serde_json::json!({"true": "x"}));
        assert_eq!(json("[123]: \"x\""), serde_json::json!({"123": "x"}));
        assert_eq!(json("[1.5]: \"x\""), serde_json::json!({"1.5": "x"}));
    }

    #[test]
    fn test_comments_and_lets_are_omitted() {
        let src = "; top\nlet x = 1\na: { ; inner\n b: 2 } ; trailing\n;;; block ;;;";
        assert_eq!(json(src), serde_json::json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_deep_merge_of_dotted_keys() {
        assert_eq!(
            json("app.name: \"X\"\napp.debug: true"),
            serde_json::json!({"app": {"name": "X", "debug": true}})
        );
    }

    #[test]
    fn test_shallow_merge_overwrites() {
        let ast = parse(&tokenize("app.name: \"X\"\napp.debug: true")).unwrap();
        let options = DianaOptions::new().with_merge(MergeStrategy::Shallow);
        let value = compile_with_options(&ast, &options).unwrap();
        assert_eq!(
            serde_json::to_value(value).unwrap(),
            serde_json::json!({"app": {"debug": true}})
        );
    }

    #[test]
    fn test_later_keys_overwrite_in_place() {
        let value = compile_src("a: 1\nb: 2\na: 3");
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(value["a"], Value::Number(3.0));
    }

    #[test]
    fn test_identifier_compiles_to_string() {
        assert_eq!(json("mode: production"), serde_json::json!({"mode": "production"}));
    }

    #[test]
    fn test_list_omits_absent_items() {
        let ast = AstNode::List {
            items: vec![
                AstNode::Comment {
                    value: "c".to_string(),
                },
                AstNode::Null,
            ],
        };
        assert_eq!(compile(&ast).unwrap(), Value::Array(vec![Value::Null]));
    }

    #[test]
    fn test_computed_key_node() {
        let kv = AstNode::KeyValue(KeyValue::new(
            KeyNode::ComputedKey {
                value: ComputedKey::Number(-2.0),
            },
            AstNode::Boolean { value: false },
        ));
        assert_eq!(compile(&kv).unwrap()["-2"], Value::Bool(false));
    }

    #[test]
    fn test_absent_root_is_error() {
        let err = compile(&AstNode::Comment {
            value: "c".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }

    #[test]
    fn test_raw_expression_outside_let_is_error() {
        let err = compile(&AstNode::RawExpression {
            text: "a + b".to_string(),
        })
        .unwrap_err();
        assert!(matches!(err, Error::Compile(_)));
    }

    #[test]
    fn test_indented_list_lengths() {
        let value = compile_src("items:\n  * a: 1\n    b: 2\n  * \"x\"\n  * [1, 2]");
        let items = value["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_object());
        assert_eq!(items[0]["b"], Value::Number(2.0));
    }
}
