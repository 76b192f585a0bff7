//! Property-based tests for the lexer and compiler invariants.

use diana::{diana, to_value, tokenize, DianaMap, TokenType, Value};
use proptest::prelude::*;

fn count(kind: TokenType, src: &str) -> usize {
    tokenize(src).iter().filter(|t| t.kind == kind).count()
}

fn key_segment() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,8}".prop_filter("keywords are not plain keys", |s| {
        !matches!(s.as_str(), "true" | "false" | "null" | "let")
    })
}

/// A small well-formed document built from indented blocks and bullet lists.
fn indented_document() -> impl Strategy<Value = String> {
    let leaf = (key_segment(), any::<u16>()).prop_map(|(k, n)| vec![format!("{}: {}", k, n)]);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (key_segment(), prop::collection::vec(inner.clone(), 1..4)).prop_map(|(k, blocks)| {
                let mut lines = vec![format!("{}:", k)];
                for line in blocks.into_iter().flatten() {
                    lines.push(format!("  {}", line));
                }
                lines
            }),
            (key_segment(), prop::collection::vec(any::<i32>(), 1..4)).prop_map(|(k, items)| {
                let mut lines = vec![format!("{}:", k)];
                lines.extend(items.into_iter().map(|n| format!("  * {}", n)));
                lines
            }),
        ]
    })
    .prop_map(|lines| lines.join("\n"))
}

fn finite_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e12..1.0e12f64).prop_map(Value::Number),
        any::<i32>().prop_map(Value::from),
        "[a-zA-Z0-9 _.,:;\"{}\\[\\]-]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-zA-Z0-9 _.\"-]{0,8}", inner), 0..4).prop_map(|entries| {
                Value::Object(entries.into_iter().collect::<DianaMap>())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_indent_dedent_balance(src in indented_document()) {
        prop_assert_eq!(count(TokenType::Indent, &src), count(TokenType::Dedent, &src));
        prop_assert_eq!(count(TokenType::Eof, &src), 1);
        prop_assert!(to_value(&src).is_ok(), "failed on:\n{}", src);
    }

    #[test]
    fn prop_lexer_always_terminates_with_eof(src in "[ -~\n]{0,64}") {
        let tokens = tokenize(&src);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenType::Eof));
        prop_assert_eq!(count(TokenType::Eof, &src), 1);
    }

    #[test]
    fn prop_underscore_separators_do_not_change_numbers(digits in prop::collection::vec(0u8..10, 1..12)) {
        let plain: String = digits.iter().map(|d| char::from(b'0' + d)).collect();
        let separated: String = plain
            .chars()
            .enumerate()
            .flat_map(|(i, c)| if i > 0 { vec!['_', c] } else { vec![c] })
            .collect();

        let plain_tokens = tokenize(&format!("n: {}", plain));
        let separated_tokens = tokenize(&format!("n: {}", separated));
        prop_assert_eq!(plain_tokens[2].text(), separated_tokens[2].text());
    }

    #[test]
    fn prop_dotted_keys_nest(path in prop::collection::vec(key_segment(), 1..5), n in any::<i32>()) {
        let value = to_value(&format!("{}: {}", path.join("."), n)).unwrap();

        let mut expected = Value::from(n);
        for segment in path.iter().rev() {
            let mut map = DianaMap::new();
            map.insert(segment.clone(), expected);
            expected = Value::Object(map);
        }
        prop_assert_eq!(value, expected);
    }

    #[test]
    fn prop_quoted_keys_never_split(path in prop::collection::vec(key_segment(), 1..5)) {
        let key = path.join(".");
        let value = to_value(&format!("\"{}\": true", key)).unwrap();
        let mut expected = DianaMap::new();
        expected.insert(key, diana!(true));
        prop_assert_eq!(value, Value::Object(expected));
    }

    #[test]
    fn prop_indented_list_length(items in prop::collection::vec(any::<i32>(), 1..10)) {
        let mut src = String::from("items:");
        for n in &items {
            src.push_str(&format!("\n  * {}", n));
        }
        let value = to_value(&src).unwrap();
        prop_assert_eq!(value["items"].as_array().map(Vec::len), Some(items.len()));
    }

    #[test]
    fn prop_display_round_trips(value in finite_value()) {
        let src = format!("root: {}", value);
        let compiled = to_value(&src);
        prop_assert!(compiled.is_ok(), "failed on:\n{}", src);
        prop_assert_eq!(&compiled.unwrap()["root"], &value);
    }
}
