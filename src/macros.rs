/// Builds a [`Value`](crate::Value) in code, with the same shapes a Diana
/// document compiles to.
///
/// Keys may be written the Diana way: bare words, string literals, or number
/// and boolean literals (rendered like computed keys). Keys are never split on
/// `.`. Negative numbers and other multi-token expressions go in parentheses.
///
/// ```rust
/// use diana::{diana, to_value};
///
/// let built = diana!({
///     name: "api",
///     "a.b": true,
///     404: "not found",
///     ports: [80, 443],
///     offset: (-1)
/// });
///
/// let compiled = to_value(
///     "name: api\n\"a.b\": true\n[404]: \"not found\"\nports: [80, 443]\noffset: -1",
/// )
/// .unwrap();
/// assert_eq!(built, compiled);
/// ```
#[macro_export]
macro_rules! diana {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([ $($item:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::diana!($item)),*])
    };

    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut map = $crate::DianaMap::new();
        $(
            map.insert($crate::__diana_key!($key), $crate::diana!($value));
        )*
        $crate::Value::Object(map)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __diana_key {
    ($key:literal) => {
        $key.to_string()
    };

    ($key:ident) => {
        stringify!($key).to_string()
    };
}
