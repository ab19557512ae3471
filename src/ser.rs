//! Serialization to canonical text.
//!
//! Serialization runs in two steps. [`NodeSerializer`] first reduces a value
//! to a [`Node`] tree, applying the canonical key transform to struct fields
//! and the scalar codec to every leaf. The tree is then written out by
//! [`write_node`], which owns all layout decisions:
//!
//! - scalars follow their key on the same line: `title: Funds`
//! - nested containers start on the next line, one indentation unit deeper
//! - a mapping inside a sequence shares the `- ` line with its first entry
//! - empty values and empty containers are written as a bare `key:` or `-`
//! - there is no trailing newline
//!
//! ## Usage
//!
//! ```rust
//! use serde::Serialize;
//! use yaml_records::to_string;
//!
//! #[derive(Serialize)]
//! struct Socket { title: String, slots: u8 }
//!
//! #[derive(Serialize)]
//! struct Flow { sockets: Vec<Socket>, icon_path: Option<String> }
//!
//! let flow = Flow {
//!     sockets: vec![Socket { title: "Main".into(), slots: 2 }],
//!     icon_path: None,
//! };
//! assert_eq!(
//!     to_string(&flow).unwrap(),
//!     "sockets:\n  - title: Main\n    slots: 2\niconPath:"
//! );
//! ```

use crate::key::canonical_key;
use crate::{scalar, Error, Node, NodeMap, Options, Result};
use serde::{ser, Serialize};

/// Reduces any `T: Serialize` to a [`Node`] tree.
///
/// # Examples
///
/// ```rust
/// use yaml_records::{node, to_node};
///
/// assert_eq!(to_node(&vec![1, 2]).unwrap(), node!([1, 2]));
/// assert_eq!(to_node(&Some("a: b")).unwrap(), node!("a: b"));
/// ```
///
/// # Errors
///
/// Returns an error for mapping keys that are not scalars, and for structs
/// whose field names collide after the canonical key transform.
pub fn to_node<T>(value: &T) -> Result<Node>
where
    T: ?Sized + Serialize,
{
    value.serialize(NodeSerializer)
}

/// Writes a tree as canonical text.
pub(crate) fn write_node(node: &Node, options: &Options) -> String {
    let mut out = String::new();
    match node {
        Node::Absent => {}
        Node::Scalar(token) => out.push_str(token),
        Node::Mapping(map) => write_mapping(&mut out, map, 0, false, options),
        Node::Sequence(items) => write_sequence(&mut out, items, 0, options),
    }
    out
}

/// Writes mapping entries at `level`. With `continue_line` the first entry is
/// appended to the current line, which already holds a `- ` prefix.
fn write_mapping(out: &mut String, map: &NodeMap, level: usize, continue_line: bool, options: &Options) {
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if i > 0 || !continue_line {
            out.push_str(&options.indent_str(level));
        }
        out.push_str(key);
        out.push(':');
        match value {
            Node::Scalar(token) if !token.is_empty() => {
                out.push(' ');
                out.push_str(token);
            }
            Node::Mapping(inner) if !inner.is_empty() => {
                out.push('\n');
                write_mapping(out, inner, level + 1, false, options);
            }
            Node::Sequence(items) if !items.is_empty() => {
                out.push('\n');
                write_sequence(out, items, level + 1, options);
            }
            _ => {}
        }
    }
}

fn write_sequence(out: &mut String, items: &[Node], level: usize, options: &Options) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&options.indent_str(level));
        out.push('-');
        match item {
            Node::Scalar(token) if !token.is_empty() => {
                out.push(' ');
                out.push_str(token);
            }
            Node::Mapping(map) if !map.is_empty() => {
                out.push(' ');
                write_mapping(out, map, level + 1, true, options);
            }
            Node::Sequence(inner) if !inner.is_empty() => {
                out.push('\n');
                write_sequence(out, inner, level + 1, options);
            }
            _ => {}
        }
    }
}

/// A serde `Serializer` producing [`Node`] trees.
///
/// Unit variants with index 0 are the zero enumerant and become the empty
/// token; other enums with data use the `Variant: value` shape.
pub struct NodeSerializer;

pub struct SerializeVec {
    items: Vec<Node>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Node>,
}

pub struct SerializeMap {
    map: NodeMap,
    next_key: Option<String>,
}

pub struct SerializeStruct {
    map: NodeMap,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    fields: SerializeStruct,
}

fn tagged(variant: &str, value: Node) -> Node {
    let mut map = NodeMap::with_capacity(1);
    map.insert(scalar::encode(variant), value);
    Node::Mapping(map)
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeStruct;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::from(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        Ok(Node::Sequence(v.iter().map(|&b| Node::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::Absent)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::Absent)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        Ok(Node::Absent)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        variant_index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        if variant_index == 0 {
            Ok(Node::scalar(""))
        } else {
            Ok(Node::from(variant))
        }
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_node(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: NodeMap::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeStruct> {
        Ok(SerializeStruct {
            map: NodeMap::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            fields: self.serialize_struct(variant, len)?,
        })
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(tagged(self.variant, Node::Sequence(self.items)))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_node(key)? {
            Node::Scalar(token) if !token.is_empty() => {
                self.next_key = Some(token);
                Ok(())
            }
            other => Err(Error::unsupported_type(&format!(
                "mapping keys must be non-empty scalars, found {}",
                other.kind()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Mapping(self.map))
    }
}

impl ser::SerializeStruct for SerializeStruct {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = scalar::encode(&canonical_key(key));
        if self.map.contains_key(&key) {
            return Err(Error::structure(format!(
                "two fields share the key `{}`",
                key
            )));
        }
        self.map.insert(key, to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Mapping(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeStruct::serialize_field(&mut self.fields, key, value)
    }

    fn end(self) -> Result<Node> {
        Ok(tagged(self.variant, Node::Mapping(self.fields.map)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node;
    use serde::Serialize;
    use std::collections::BTreeMap;

    fn write(node: &Node) -> String {
        write_node(node, &Options::default())
    }

    #[test]
    fn test_nested_mapping_layout() {
        let tree = node!({
            "cardTypes": { "funds": { "title": "Funds", "iconPath": "res://x" } }
        });
        assert_eq!(
            write(&tree),
            "cardTypes:\n  funds:\n    title: Funds\n    iconPath: \"res://x\""
        );
    }

    #[test]
    fn test_mapping_in_sequence_shares_dash_line() {
        let tree = node!({ "states": [{ "name": "idle", "seconds": 5 }, "x"] });
        assert_eq!(
            write(&tree),
            "states:\n  - name: idle\n    seconds: 5\n  - x"
        );
    }

    #[test]
    fn test_empty_values_are_bare() {
        let tree = node!({ "a": null, "b": "", "c": [], "d": {}, "e": [null, ""] });
        assert_eq!(write(&tree), "a:\nb:\nc:\nd:\ne:\n  -\n  -");
    }

    #[test]
    fn test_nested_sequences_use_bare_dash() {
        let tree = node!([[1, 2], [3]]);
        assert_eq!(write(&tree), "-\n  - 1\n  - 2\n-\n  - 3");
    }

    #[test]
    fn test_custom_indent() {
        let tree = node!({ "outer": [{ "a": 1, "b": 2 }] });
        let options = Options::new().with_indent(4);
        assert_eq!(
            write_node(&tree, &options),
            "outer:\n    - a: 1\n        b: 2"
        );
    }

    #[test]
    fn test_struct_fields_use_canonical_keys() {
        #[derive(Serialize)]
        #[allow(non_snake_case)]
        struct CardType {
            Title: String,
            icon_path: String,
        }
        let card = CardType {
            Title: "Funds".into(),
            icon_path: "x".into(),
        };
        assert_eq!(to_node(&card).unwrap(), node!({ "title": "Funds", "iconPath": "x" }));
    }

    #[test]
    fn test_colliding_field_keys() {
        #[derive(Serialize)]
        #[allow(non_snake_case)]
        struct Clash {
            icon_path: u8,
            iconPath: u8,
        }
        let err = to_node(&Clash { icon_path: 1, iconPath: 2 }).unwrap_err();
        assert!(matches!(err, Error::Structure(_)), "{err:?}");
    }

    #[test]
    fn test_map_keys_are_verbatim() {
        let mut map = BTreeMap::new();
        map.insert("icon_path", 1);
        map.insert("a: b", 2);
        assert_eq!(
            to_node(&map).unwrap(),
            node!({ "a: b": 2, "icon_path": 1 })
        );
    }

    #[test]
    fn test_non_scalar_map_keys_are_unsupported() {
        let mut map = BTreeMap::new();
        map.insert(vec![1], 1);
        let err = to_node(&map).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)), "{err:?}");
    }

    #[test]
    fn test_enum_shapes() {
        #[derive(Serialize)]
        enum Reward {
            Nothing,
            Cards(u32),
            Pair(u8, u8),
            Resource { name: String },
        }
        assert_eq!(to_node(&Reward::Nothing).unwrap(), Node::scalar(""));
        assert_eq!(to_node(&Reward::Cards(3)).unwrap(), node!({ "Cards": 3 }));
        assert_eq!(to_node(&Reward::Pair(1, 2)).unwrap(), node!({ "Pair": [1, 2] }));
        assert_eq!(
            to_node(&Reward::Resource { name: "funds".into() }).unwrap(),
            node!({ "Resource": { "name": "funds" } })
        );
    }
}
