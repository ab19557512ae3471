//! Type materializer: turns a [`Node`] tree into typed values.
//!
//! [`NodeDeserializer`] walks a tree together with the serde data model of
//! the requested type. Scalars are decoded lazily, so the same raw token can
//! become a string, a number, a boolean or an enumerant depending on what
//! the target asks for.
//!
//! ## Zero values
//!
//! The absent marker (`key:` with nothing below it) materializes as the zero
//! or empty value of the target: `0`, `false`, `""`, `None`, an empty
//! sequence or mapping, or the first enumerant.
//!
//! ```rust
//! use serde::Deserialize;
//! use yaml_records::from_str;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! enum Mode { Idle, Running }
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Timer { seconds: u32, mode: Mode, tags: Vec<String> }
//!
//! let timer: Timer = from_str("seconds:\nmode:\ntags:").unwrap();
//! assert_eq!(timer, Timer { seconds: 0, mode: Mode::Idle, tags: vec![] });
//! ```
//!
//! ## Missing fields
//!
//! By default a struct field missing from its mapping follows serde: `Option`
//! fields become `None`, `#[serde(default)]` fields take their default and
//! any other field is an error. With
//! [`Options::with_zero_fill`](crate::Options::with_zero_fill) every missing
//! field is read from the absent marker instead, so it takes the zero value
//! of its type. This also replaces `#[serde(default)]` values.
//!
//! ```rust
//! use serde::Deserialize;
//! use yaml_records::{from_str, from_str_with_options, Options};
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Timer { title: String, seconds: u32 }
//!
//! assert!(from_str::<Timer>("title: Rest").is_err());
//!
//! let options = Options::new().with_zero_fill(true);
//! let timer: Timer = from_str_with_options("title: Rest", &options).unwrap();
//! assert_eq!(timer, Timer { title: "Rest".into(), seconds: 0 });
//! ```
//!
//! ## Error kinds
//!
//! The deserializer is generic over its error type so that nested
//! `Deserialize` impls (such as polymorphic families) can re-enter it with
//! the caller's error. With [`Error`](crate::Error) a wrong node shape is a
//! `Structure` error and an unreadable token is a `ScalarConversion` error.

use crate::key::{find_collision, match_field};
use crate::{scalar, Node, NodeMap, Options, Result};
use serde::de::{self, DeserializeOwned, IntoDeserializer, Unexpected, Visitor};
use std::marker::PhantomData;
use std::str::FromStr;

/// Materializes a tree into any type implementing `Deserialize`.
///
/// # Examples
///
/// ```rust
/// use yaml_records::{from_node, node};
/// use std::collections::BTreeMap;
///
/// let tree = node!({ "funds": 3, "labour": 5 });
/// let counts: BTreeMap<String, u8> = from_node(tree).unwrap();
/// assert_eq!(counts["labour"], 5);
/// ```
///
/// # Errors
///
/// Returns an error when the tree shape or a scalar token does not fit `T`.
pub fn from_node<T: DeserializeOwned>(node: Node) -> Result<T> {
    T::deserialize(NodeDeserializer::new(node))
}

/// Materializes a tree with the materializer settings of `options`.
///
/// # Errors
///
/// See [`from_node`].
pub fn from_node_with_options<T: DeserializeOwned>(node: Node, options: &Options) -> Result<T> {
    T::deserialize(NodeDeserializer::new(node).zero_fill(options.zero_fill))
}

/// Newtype name under which a polymorphic family asks for its whole node.
///
/// [`NodeDeserializer`] answers with a two-element sequence: its zero-fill
/// setting, then the node. Other deserializers treat it as a plain newtype.
pub(crate) const CAPTURE_NODE: &str = "__yaml_records_node";

/// A serde `Deserializer` over an owned [`Node`].
pub struct NodeDeserializer<E> {
    node: Node,
    zero_fill: bool,
    marker: PhantomData<E>,
}

impl<E> NodeDeserializer<E> {
    #[must_use]
    pub fn new(node: Node) -> Self {
        NodeDeserializer {
            node,
            zero_fill: false,
            marker: PhantomData,
        }
    }

    /// Reads struct fields missing from their mapping as the absent marker.
    /// The setting carries over to every nested value.
    #[must_use]
    pub fn zero_fill(mut self, enabled: bool) -> Self {
        self.zero_fill = enabled;
        self
    }
}

/// Adds the absent marker for every field that no present key names.
fn fill_missing(map: &mut NodeMap, fields: &'static [&'static str]) {
    let present: Vec<&'static str> = map
        .keys()
        .filter_map(|key| match_field(fields, &scalar::decode(key)))
        .collect();
    for field in fields {
        if !present.contains(field) {
            log::trace!("zero-filling missing field {}", field);
            map.insert(field.to_string(), Node::Absent);
        }
    }
}

fn unexpected(node: &Node) -> Unexpected<'_> {
    match node {
        Node::Absent => Unexpected::Option,
        Node::Scalar(token) => Unexpected::Str(token),
        Node::Mapping(_) => Unexpected::Map,
        Node::Sequence(_) => Unexpected::Seq,
    }
}

impl<E: de::Error> NodeDeserializer<E> {
    fn invalid_type(&self, expected: &dyn de::Expected) -> E {
        E::invalid_type(unexpected(&self.node), expected)
    }

    /// Decodes the scalar as `T`, or returns `T`'s zero value for the absent
    /// marker.
    fn parse_scalar<T>(&self, expected: &'static str) -> std::result::Result<T, E>
    where
        T: FromStr + Default,
    {
        match &self.node {
            Node::Absent => Ok(T::default()),
            Node::Scalar(token) => {
                let text = scalar::decode(token);
                text.parse()
                    .map_err(|_| E::invalid_value(Unexpected::Str(&text), &expected))
            }
            _ => Err(self.invalid_type(&expected)),
        }
    }

    fn into_text(self, expected: &'static str) -> std::result::Result<String, E> {
        match self.node {
            Node::Absent => Ok(String::new()),
            Node::Scalar(token) => Ok(scalar::decode(&token).into_owned()),
            ref other => Err(E::invalid_type(unexpected(other), &expected)),
        }
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident : $ty:ty,)*) => {
        $(
            fn $method<V>(self, visitor: V) -> std::result::Result<V::Value, E>
            where
                V: Visitor<'de>,
            {
                visitor.$visit(self.parse_scalar::<$ty>(stringify!($ty))?)
            }
        )*
    };
}

impl<'de, E: de::Error> de::Deserializer<'de> for NodeDeserializer<E> {
    type Error = E;

    fn deserialize_any<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Absent => visitor.visit_none(),
            Node::Scalar(token) => visitor.visit_string(scalar::decode(&token).into_owned()),
            Node::Mapping(map) => visitor.visit_map(MapAccess::new(map, None, self.zero_fill)),
            Node::Sequence(items) => visitor.visit_seq(SeqAccess::new(items, self.zero_fill)),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        match &self.node {
            Node::Absent => visitor.visit_bool(false),
            Node::Scalar(token) => {
                let text = scalar::decode(token);
                match scalar::decode_bool(&text) {
                    Some(value) => visitor.visit_bool(value),
                    None => Err(E::invalid_value(Unexpected::Str(&text), &"true or false")),
                }
            }
            _ => Err(self.invalid_type(&"a boolean")),
        }
    }

    deserialize_number! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_i128 => visit_i128: i128,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
        deserialize_u128 => visit_u128: u128,
        deserialize_f32 => visit_f32: f32,
        deserialize_f64 => visit_f64: f64,
    }

    fn deserialize_char<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        let text = self.into_text("a character")?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (None, _) => visitor.visit_char('\0'),
            (Some(ch), None) => visitor.visit_char(ch),
            _ => Err(E::invalid_value(Unexpected::Str(&text), &"a single character")),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        visitor.visit_string(self.into_text("a string")?)
    }

    fn deserialize_string<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        let none = match &self.node {
            Node::Absent => true,
            Node::Scalar(token) => scalar::decode(token).is_empty(),
            _ => false,
        };
        if none {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        if self.node.is_empty() {
            visitor.visit_unit()
        } else {
            Err(self.invalid_type(&"an empty value"))
        }
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        if name == CAPTURE_NODE {
            let captured = vec![Node::from(self.zero_fill), self.node];
            return visitor.visit_seq(SeqAccess::new(captured, false));
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Absent => visitor.visit_seq(SeqAccess::new(Vec::new(), self.zero_fill)),
            Node::Sequence(items) => visitor.visit_seq(SeqAccess::new(items, self.zero_fill)),
            ref other => Err(E::invalid_type(unexpected(other), &visitor)),
        }
    }

    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        let items = match self.node {
            Node::Absent => Vec::new(),
            Node::Sequence(items) => items,
            ref other => return Err(E::invalid_type(unexpected(other), &visitor)),
        };
        if items.len() != len {
            return Err(E::invalid_length(items.len(), &visitor));
        }
        visitor.visit_seq(SeqAccess::new(items, self.zero_fill))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        match self.node {
            Node::Absent => visitor.visit_map(MapAccess::new(NodeMap::new(), None, self.zero_fill)),
            Node::Mapping(map) => visitor.visit_map(MapAccess::new(map, None, self.zero_fill)),
            ref other => Err(E::invalid_type(unexpected(other), &visitor)),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        if let Some(field) = find_collision(fields) {
            return Err(E::duplicate_field(field));
        }
        let mut map = match self.node {
            Node::Absent => NodeMap::new(),
            Node::Mapping(map) => map,
            ref other => return Err(E::invalid_type(unexpected(other), &visitor)),
        };
        if self.zero_fill {
            fill_missing(&mut map, fields);
        }
        visitor.visit_map(MapAccess::new(map, Some(fields), self.zero_fill))
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        let (variant, value) = match self.node {
            Node::Absent => (String::new(), None),
            Node::Scalar(token) => (scalar::decode(&token).into_owned(), None),
            Node::Mapping(map) if map.len() == 1 => match map.into_iter().next() {
                Some((key, value)) => (scalar::decode(&key).into_owned(), Some(value)),
                None => return Err(E::invalid_length(0, &"a single-entry mapping")),
            },
            Node::Mapping(map) => {
                return Err(E::invalid_length(map.len(), &"a single-entry mapping"))
            }
            ref other => return Err(E::invalid_type(unexpected(other), &visitor)),
        };

        // The empty token names the zero enumerant.
        let variant = if variant.is_empty() && value.is_none() {
            match variants.first() {
                Some(first) => first.to_string(),
                None => return Err(E::invalid_value(Unexpected::Str(""), &visitor)),
            }
        } else if !variants.contains(&variant.as_str()) {
            let expected = format!("one of: {}", variants.join(", "));
            return Err(E::invalid_value(Unexpected::Str(&variant), &expected.as_str()));
        } else {
            variant
        };

        visitor.visit_enum(EnumAccess {
            variant,
            value,
            zero_fill: self.zero_fill,
            marker: PhantomData,
        })
    }

    fn deserialize_identifier<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqAccess<E> {
    iter: std::vec::IntoIter<Node>,
    zero_fill: bool,
    marker: PhantomData<E>,
}

impl<E> SeqAccess<E> {
    fn new(items: Vec<Node>, zero_fill: bool) -> Self {
        SeqAccess {
            iter: items.into_iter(),
            zero_fill,
            marker: PhantomData,
        }
    }
}

impl<'de, E: de::Error> de::SeqAccess<'de> for SeqAccess<E> {
    type Error = E;

    fn next_element_seed<T>(&mut self, seed: T) -> std::result::Result<Option<T::Value>, E>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(node) => seed
                .deserialize(NodeDeserializer::new(node).zero_fill(self.zero_fill))
                .map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Map access over a mapping node.
///
/// For structs, `fields` is the field list of the target and keys are
/// translated back from their canonical form to the field name. Map keys
/// are handed over as scalar nodes so that numeric keys decode too.
struct MapAccess<E> {
    iter: indexmap::map::IntoIter<String, Node>,
    value: Option<Node>,
    fields: Option<&'static [&'static str]>,
    zero_fill: bool,
    marker: PhantomData<E>,
}

impl<E> MapAccess<E> {
    fn new(map: NodeMap, fields: Option<&'static [&'static str]>, zero_fill: bool) -> Self {
        MapAccess {
            iter: map.into_iter(),
            value: None,
            fields,
            zero_fill,
            marker: PhantomData,
        }
    }
}

impl<'de, E: de::Error> de::MapAccess<'de> for MapAccess<E> {
    type Error = E;

    fn next_key_seed<K>(&mut self, seed: K) -> std::result::Result<Option<K::Value>, E>
    where
        K: de::DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        self.value = Some(value);
        match self.fields {
            Some(fields) => {
                let text = scalar::decode(&key);
                let name = match match_field(fields, &text) {
                    Some(field) => field.to_string(),
                    None => text.into_owned(),
                };
                seed.deserialize(IntoDeserializer::<E>::into_deserializer(name))
                    .map(Some)
            }
            None => seed
                .deserialize(NodeDeserializer::new(Node::Scalar(key)))
                .map(Some),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> std::result::Result<V::Value, E>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node).zero_fill(self.zero_fill)),
            None => Err(E::custom("value requested before key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumAccess<E> {
    variant: String,
    value: Option<Node>,
    zero_fill: bool,
    marker: PhantomData<E>,
}

impl<'de, E: de::Error> de::EnumAccess<'de> for EnumAccess<E> {
    type Error = E;
    type Variant = VariantAccess<E>;

    fn variant_seed<V>(self, seed: V) -> std::result::Result<(V::Value, Self::Variant), E>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant =
            seed.deserialize(IntoDeserializer::<E>::into_deserializer(self.variant))?;
        Ok((
            variant,
            VariantAccess {
                value: self.value,
                zero_fill: self.zero_fill,
                marker: PhantomData,
            },
        ))
    }
}

struct VariantAccess<E> {
    value: Option<Node>,
    zero_fill: bool,
    marker: PhantomData<E>,
}

impl<'de, E: de::Error> de::VariantAccess<'de> for VariantAccess<E> {
    type Error = E;

    fn unit_variant(self) -> std::result::Result<(), E> {
        match self.value {
            None | Some(Node::Absent) => Ok(()),
            Some(ref other) => Err(E::invalid_type(unexpected(other), &"a unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> std::result::Result<T::Value, E>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(node) => seed.deserialize(NodeDeserializer::new(node).zero_fill(self.zero_fill)),
            None => Err(E::invalid_type(Unexpected::UnitVariant, &"a newtype variant")),
        }
    }

    fn tuple_variant<V>(self, len: usize, visitor: V) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(node) => {
                let deserializer = NodeDeserializer::new(node).zero_fill(self.zero_fill);
                de::Deserializer::deserialize_tuple(deserializer, len, visitor)
            }
            None => Err(E::invalid_type(Unexpected::UnitVariant, &"a tuple variant")),
        }
    }

    fn struct_variant<V>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, E>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(node) => {
                let deserializer = NodeDeserializer::new(node).zero_fill(self.zero_fill);
                de::Deserializer::deserialize_struct(deserializer, "", fields, visitor)
            }
            None => Err(E::invalid_type(Unexpected::UnitVariant, &"a struct variant")),
        }
    }
}
