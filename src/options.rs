//! Configuration options for parsing and compiling Diana documents.
//!
//! - [`DianaOptions`]: main configuration struct
//! - [`MergeStrategy`]: how same-key objects combine during compilation
//!
//! ## Examples
//!
//! ```rust
//! use diana::{to_value_with_options, DianaOptions, MergeStrategy};
//!
//! let src = "app.name: \"X\"\napp.debug: true";
//!
//! // Default: maps under the same key are merged recursively
//! let deep = to_value_with_options(src, DianaOptions::new()).unwrap();
//! assert_eq!(deep["app"].as_object().map(|m| m.len()), Some(2));
//!
//! // Shallow: a later `app` entry replaces the earlier one wholesale
//! let options = DianaOptions::new().with_merge(MergeStrategy::Shallow);
//! let shallow = to_value_with_options(src, options).unwrap();
//! assert_eq!(shallow["app"].as_object().map(|m| m.len()), Some(1));
//! ```

/// How an entry is combined with an existing entry under the same key.
///
/// # Examples
///
/// ```rust
/// use diana::MergeStrategy;
///
/// assert_eq!(MergeStrategy::default(), MergeStrategy::Deep);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Objects under the same key are merged key by key, recursively.
    /// Any other combination overwrites.
    #[default]
    Deep,
    /// Later entries always overwrite earlier ones.
    Shallow,
}

/// Configuration for the parser and compiler.
///
/// # Examples
///
/// ```rust
/// use diana::{DianaOptions, MergeStrategy};
///
/// let options = DianaOptions::new()
///     .with_merge(MergeStrategy::Shallow)
///     .with_lenient_lexing(true)
///     .with_max_depth(32);
/// assert_eq!(options.max_depth, 32);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DianaOptions {
    pub merge: MergeStrategy,
    pub lenient_lexing: bool,
    pub max_depth: usize,
}

impl Default for DianaOptions {
    fn default() -> Self {
        DianaOptions {
            merge: MergeStrategy::default(),
            lenient_lexing: false,
            max_depth: 128,
        }
    }
}

impl DianaOptions {
    /// Creates default options (deep merge, lexical errors are fatal,
    /// nesting limited to 128 levels).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use diana::DianaOptions;
    ///
    /// let options = DianaOptions::new();
    /// assert!(!options.lenient_lexing);
    /// assert_eq!(options.max_depth, 128);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how same-key entries combine.
    #[must_use]
    pub fn with_merge(mut self, merge: MergeStrategy) -> Self {
        self.merge = merge;
        self
    }

    /// When enabled, the parser skips `ERROR` tokens instead of failing on
    /// the first one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use diana::{to_value_with_options, DianaOptions};
    ///
    /// assert!(diana::to_value("a: 1 @").is_err());
    ///
    /// let options = DianaOptions::new().with_lenient_lexing(true);
    /// let value = to_value_with_options("a: 1 @", options).unwrap();
    /// assert_eq!(value["a"].as_f64(), Some(1.0));
    /// ```
    #[must_use]
    pub fn with_lenient_lexing(mut self, lenient: bool) -> Self {
        self.lenient_lexing = lenient;
        self
    }

    /// Sets the maximum nesting depth of objects, lists and indented blocks.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
