//! Ordered map type for mapping nodes.
//!
//! [`NodeMap`] wraps an [`IndexMap`] so that entries keep the order in which
//! they appeared in the source text (or were produced by the serializer).
//! Keys are unique: inserting an existing key replaces its value in place,
//! which gives "last occurrence wins" semantics for repeated keys.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_records::{Node, NodeMap};
//!
//! let mut map = NodeMap::new();
//! map.insert("title".to_string(), Node::scalar("Funds"));
//! map.insert("iconPath".to_string(), Node::scalar("\"res://x\""));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("title").and_then(|v| v.as_token()), Some("Funds"));
//! ```

use crate::Node;
use indexmap::IndexMap;

/// An insertion-ordered map of raw key tokens to [`Node`]s.
///
/// # Examples
///
/// ```rust
/// use yaml_records::{Node, NodeMap};
///
/// let mut map = NodeMap::new();
/// map.insert("first".to_string(), Node::scalar("1"));
/// map.insert("second".to_string(), Node::scalar("2"));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMap(IndexMap<String, Node>);

impl NodeMap {
    /// Creates an empty `NodeMap`.
    #[must_use]
    pub fn new() -> Self {
        NodeMap(IndexMap::new())
    }

    /// Creates an empty `NodeMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        NodeMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced without
    /// moving the entry and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_records::{Node, NodeMap};
    ///
    /// let mut map = NodeMap::new();
    /// assert!(map.insert("key".to_string(), Node::scalar("1")).is_none());
    /// assert!(map.insert("key".to_string(), Node::scalar("2")).is_some());
    /// assert_eq!(map.get("key"), Some(&Node::scalar("2")));
    /// ```
    pub fn insert(&mut self, key: String, value: Node) -> Option<Node> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value stored under the raw key token.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.0.get(key)
    }

    /// Returns `true` if the map holds the raw key token.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Node> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Node> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.0.iter()
    }
}

impl IntoIterator for NodeMap {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeMap {
    type Item = (&'a String, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Node)> for NodeMap {
    fn from_iter<T: IntoIterator<Item = (String, Node)>>(iter: T) -> Self {
        NodeMap(IndexMap::from_iter(iter))
    }
}
