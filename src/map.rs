//! Ordered map type for Diana objects.
//!
//! [`DianaMap`] wraps [`IndexMap`] so object keys keep the order in which the
//! source first introduced them. Re-assigning a key replaces its value but
//! keeps its original position, which is what a faithful re-serialization of
//! a configuration file needs.
//!
//! ## Examples
//!
//! ```rust
//! use diana::{DianaMap, Value};
//!
//! let mut map = DianaMap::new();
//! map.insert("name".to_string(), Value::from("Diana"));
//! map.insert("port".to_string(), Value::from(5432));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Diana"));
//! ```

use crate::options::MergeStrategy;
use crate::Value;
use indexmap::IndexMap;
use std::collections::HashMap;

/// An insertion-ordered map of string keys to Diana values.
///
/// # Examples
///
/// ```rust
/// use diana::{DianaMap, Value};
///
/// let mut map = DianaMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DianaMap(IndexMap<String, Value>);

impl DianaMap {
    /// Creates an empty `DianaMap`.
    #[must_use]
    pub fn new() -> Self {
        DianaMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        DianaMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the key keeps its position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use diana::{DianaMap, Value};
    ///
    /// let mut map = DianaMap::new();
    /// assert!(map.insert("key".to_string(), Value::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), Value::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, shifting later entries up so the order of the remaining
    /// keys is preserved.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Folds `other` into this map, entry by entry, in `other`'s order.
    ///
    /// With [`MergeStrategy::Deep`], two objects meeting under one key are
    /// merged recursively; with [`MergeStrategy::Shallow`] the incoming
    /// value always wins.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use diana::{diana, DianaMap, MergeStrategy, Value};
    ///
    /// let mut base = DianaMap::new();
    /// base.insert("app".to_string(), diana!({ "name": "X" }));
    ///
    /// let mut extra = DianaMap::new();
    /// extra.insert("app".to_string(), diana!({ "debug": true }));
    ///
    /// base.merge(extra, MergeStrategy::Deep);
    /// assert_eq!(base.get("app"), Some(&diana!({ "name": "X", "debug": true })));
    /// ```
    pub fn merge(&mut self, other: DianaMap, strategy: MergeStrategy) {
        for (key, incoming) in other {
            match (strategy, self.0.get_mut(&key), incoming) {
                (MergeStrategy::Deep, Some(Value::Object(existing)), Value::Object(incoming)) => {
                    existing.merge(incoming, strategy);
                }
                (_, _, incoming) => {
                    self.0.insert(key, incoming);
                }
            }
        }
    }
}

impl From<HashMap<String, Value>> for DianaMap {
    fn from(map: HashMap<String, Value>) -> Self {
        DianaMap(map.into_iter().collect())
    }
}

impl From<DianaMap> for HashMap<String, Value> {
    fn from(map: DianaMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for DianaMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DianaMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for DianaMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        DianaMap(IndexMap::from_iter(iter))
    }
}
