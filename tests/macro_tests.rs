use diana::{diana, to_value, DianaMap, Value};

#[test]
fn test_scalars_match_compiled_scalars() {
    let compiled = to_value("n: null\nyes: true\nno: false\nint: -123\nfloat: 3.5\ntext: \"hello world\"\nempty: \"\"").unwrap();

    assert_eq!(compiled["n"], diana!(null));
    assert_eq!(compiled["yes"], diana!(true));
    assert_eq!(compiled["no"], diana!(false));
    assert_eq!(compiled["int"], diana!(-123));
    assert_eq!(compiled["float"], diana!(3.5));
    assert_eq!(compiled["text"], diana!("hello world"));
    assert_eq!(compiled["empty"], Value::String(String::new()));
}

#[test]
fn test_bracket_lists() {
    assert_eq!(diana!([]), Value::Array(vec![]));
    assert_eq!(
        diana!([1, "hello", true, null, [], {}]),
        Value::Array(vec![
            Value::Number(1.0),
            Value::from("hello"),
            Value::Bool(true),
            Value::Null,
            Value::Array(vec![]),
            Value::Object(DianaMap::new()),
        ])
    );
}

#[test]
fn test_objects_keep_written_order() {
    let value = diana!({ zeta: 1, "alpha": 2, 3: "three" });
    let keys: Vec<&str> = value
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["zeta", "alpha", "3"]);
}

#[test]
fn test_diana_macro_matches_compiled_source() {
    let built = diana!({
        "user": {
            "id": 123,
            "name": "Bob",
            "active": true
        },
        "tags": ["admin", "developer"],
        "count": 42
    });

    let src = "user:\n  id: 123\n  name: \"Bob\"\n  active: true\ntags: [admin, developer]\ncount: 42";
    assert_eq!(to_value(src).unwrap(), built);
}

#[test]
fn test_value_methods() {
    let null_val = diana!(null);
    assert!(null_val.is_null());
    assert!(!null_val.is_bool());
    assert!(!null_val.is_number());
    assert!(!null_val.is_string());
    assert!(!null_val.is_array());
    assert!(!null_val.is_object());

    let bool_val = diana!(true);
    assert_eq!(bool_val.as_bool(), Some(true));

    let str_val = diana!("hello");
    assert_eq!(str_val.as_str(), Some("hello"));

    let array_val = diana!([1, 2, 3]);
    assert_eq!(array_val.as_array().map(Vec::len), Some(3));
    assert_eq!(array_val[2].as_i64(), Some(3));

    let obj_val = diana!({"key": "value"});
    assert_eq!(obj_val.as_object().map(DianaMap::len), Some(1));
    assert_eq!(obj_val.get("key").and_then(Value::as_str), Some("value"));
}

#[test]
fn test_display_compiles_back_to_same_value() {
    let values = vec![
        diana!({
            "plain": "text",
            "a.b": 1.5,
            "quote\"d": "it's \"here\"",
            "list": [[], {}, null, false],
            "nested": { "deep": { "x": (-2) } }
        }),
        diana!({ "multi": "line one\nline two" }),
    ];

    for value in values {
        let src = format!("root: {}", value);
        let compiled = to_value(&src).unwrap_or_else(|e| panic!("{}: {}", src, e));
        assert_eq!(compiled["root"], value, "source was {}", src);
    }
}
