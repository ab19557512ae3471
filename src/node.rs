//! Generic tree representation of a parsed document.
//!
//! A [`Node`] is what the tree builder produces from text and what the
//! serializer produces from a typed value, before it is written out. Scalars
//! are kept as raw tokens: `"res://x"` is stored with its quotes, and typed
//! coercion only happens when the tree is materialized into a target type.
//!
//! ## Usage Patterns
//!
//! ```rust
//! use yaml_records::{node, parse, Node};
//!
//! let tree = parse("title: Funds\nitems: [a, b]").unwrap();
//! assert_eq!(
//!     tree,
//!     node!({ "title": "Funds", "items": ["a", "b"] })
//! );
//!
//! let title = tree.get("title").and_then(Node::as_token);
//! assert_eq!(title, Some("Funds"));
//! ```

use crate::scalar;
use crate::NodeMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A parsed value: scalar token, mapping, sequence, or the absent marker.
///
/// `Absent` stands for a key written with no value (`key:`) and no deeper
/// block. It materializes as the zero or empty value of whatever type is
/// requested.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Node {
    #[default]
    Absent,
    Scalar(String),
    Mapping(NodeMap),
    Sequence(Vec<Node>),
}

impl Node {
    /// Creates a scalar node from a raw token.
    ///
    /// The token is stored as-is; quotes are part of the token.
    pub fn scalar(token: impl Into<String>) -> Self {
        Node::Scalar(token.into())
    }

    #[inline]
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }

    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Node::Scalar(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Node::Mapping(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    /// Returns the raw token of a scalar node.
    #[must_use]
    pub fn as_token(&self) -> Option<&str> {
        match self {
            Node::Scalar(token) => Some(token),
            _ => None,
        }
    }

    /// Returns the text of a scalar node with one layer of quoting removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_records::Node;
    ///
    /// let node = Node::scalar("\"res://x\"");
    /// assert_eq!(node.as_str().as_deref(), Some("res://x"));
    /// ```
    #[must_use]
    pub fn as_str(&self) -> Option<Cow<'_, str>> {
        self.as_token().map(scalar::decode)
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&NodeMap> {
        match self {
            Node::Mapping(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a raw key in a mapping node.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Returns `true` for the absent marker, empty tokens and empty containers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Absent => true,
            Node::Scalar(token) => token.is_empty(),
            Node::Mapping(map) => map.is_empty(),
            Node::Sequence(items) => items.is_empty(),
        }
    }

    /// Returns a short description of the node kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Absent => "absent value",
            Node::Scalar(_) => "scalar",
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Scalar(scalar::encode(text))
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Scalar(scalar::encode(&text))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Scalar(scalar::encode_bool(value).to_string())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty)*) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::Scalar(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64);

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<NodeMap> for Node {
    fn from(map: NodeMap) -> Self {
        Node::Mapping(map)
    }
}

/// Writes the canonical text of the tree with default options.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::ser::write_node(self, &crate::Options::default()))
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Absent => serializer.serialize_none(),
            Node::Scalar(token) => serializer.serialize_str(&scalar::decode(token)),
            Node::Sequence(items) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Mapping(map) => {
                use serde::ser::SerializeMap;
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(&scalar::decode(key), value)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a scalar, mapping or sequence")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Node::from(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Node::Absent)
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Node::Absent)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Node::Sequence(items))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut entries = NodeMap::new();
                while let Some((key, value)) = map.next_entry::<String, Node>()? {
                    entries.insert(scalar::encode(&key), value);
                }
                Ok(Node::Mapping(entries))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_encodes_token() {
        assert_eq!(Node::from("Funds"), Node::scalar("Funds"));
        assert_eq!(Node::from("a: b"), Node::scalar("\"a: b\""));
        assert_eq!(Node::from(60u32), Node::scalar("60"));
        assert_eq!(Node::from(true), Node::scalar("true"));
    }

    #[test]
    fn test_accessors() {
        let mut map = NodeMap::new();
        map.insert("k".to_string(), Node::scalar("'v'"));
        let node = Node::Mapping(map);

        assert!(node.is_mapping());
        assert!(!node.is_scalar() && !node.is_sequence() && !node.is_absent());
        assert!(node.get("k").is_some_and(Node::is_scalar));
        assert_eq!(node.get("k").and_then(Node::as_token), Some("'v'"));
        assert_eq!(node.get("k").and_then(Node::as_str).as_deref(), Some("v"));
        assert!(node.get("missing").is_none());
        assert!(Node::Absent.is_empty());
        assert!(Node::scalar("").is_empty());
        assert!(!Node::scalar("0").is_empty());
    }

    #[test]
    fn test_display_is_canonical_text() {
        let mut inner = NodeMap::new();
        inner.insert("title".to_string(), Node::scalar("Funds"));
        let mut outer = NodeMap::new();
        outer.insert("funds".to_string(), Node::Mapping(inner));
        assert_eq!(Node::Mapping(outer).to_string(), "funds:\n  title: Funds");
    }
}
