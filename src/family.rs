//! Polymorphic record families.
//!
//! A family is an abstract record type with several concrete shapes that are
//! told apart only by which keys a mapping contains. Families are declared
//! with [`variant_family!`](crate::variant_family), which lists the concrete
//! variants in the order they are tried.
//!
//! ## Resolution
//!
//! Given a mapping, each variant is tested in declaration order and the first
//! one whose recognized keys are a superset of the present keys is selected.
//! A variant's recognized keys are its serde field names plus their canonical
//! forms (see [`canonical_key`](crate::canonical_key)), discovered once per
//! family by asking the variant type's `Deserialize` impl.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use yaml_records::{from_str, variant_family, Error};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct SocketState { variants: Vec<String>, default_variant: String, sockets: Vec<String> }
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct TimerState { variants: Vec<String>, default_variant: String, seconds: u32 }
//!
//! variant_family! {
//!     #[derive(Debug)]
//!     enum FlowState {
//!         Socket(SocketState),
//!         Timer(TimerState),
//!     }
//! }
//!
//! let state: FlowState = from_str("defaultVariant: idle\nseconds: 60\nvariants: [idle]").unwrap();
//! assert!(matches!(state, FlowState::Timer(TimerState { seconds: 60, .. })));
//!
//! let err = from_str::<FlowState>("seconds: 60\nsockets: []").unwrap_err();
//! assert!(matches!(err, Error::UnknownVariant { .. }));
//! ```

use crate::de::CAPTURE_NODE;
use crate::key::canonical_key;
use crate::{scalar, Node, NodeDeserializer};
use serde::de::{self, DeserializeOwned, Unexpected, Visitor};
use serde::{forward_to_deserialize_any, Deserialize, Deserializer};
use std::fmt;

/// Describes one concrete variant of a family: its name and the textual keys
/// it recognizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDescriptor {
    pub name: &'static str,
    keys: Option<Vec<String>>,
}

impl VariantDescriptor {
    /// Builds the descriptor for record type `T` by reading the field list of
    /// its `Deserialize` impl.
    ///
    /// Types that do not deserialize as a struct (maps, flattened structs)
    /// recognize any key.
    #[must_use]
    pub fn of<T: DeserializeOwned>(name: &'static str) -> Self {
        let keys = struct_fields::<T>().map(|fields| {
            let mut keys = Vec::with_capacity(fields.len() * 2);
            for field in fields {
                let key = canonical_key(field);
                if key != *field {
                    keys.push(field.to_string());
                }
                keys.push(key);
            }
            keys
        });
        VariantDescriptor { name, keys }
    }

    /// Builds a descriptor from an explicit key list.
    #[must_use]
    pub fn with_keys(name: &'static str, keys: &[&str]) -> Self {
        VariantDescriptor {
            name,
            keys: Some(keys.iter().map(|key| key.to_string()).collect()),
        }
    }

    /// The recognized keys, or `None` when the variant accepts any key.
    #[must_use]
    pub fn keys(&self) -> Option<&[String]> {
        self.keys.as_deref()
    }

    /// Returns `true` if every present key is recognized by this variant.
    pub fn accepts<'k, I>(&self, present: I) -> bool
    where
        I: IntoIterator<Item = &'k str>,
    {
        match &self.keys {
            None => true,
            Some(keys) => present.into_iter().all(|key| keys.iter().any(|k| k == key)),
        }
    }
}

/// A polymorphic record family. Usually implemented by
/// [`variant_family!`](crate::variant_family).
pub trait Family: Sized {
    /// The family name, used in error messages.
    const NAME: &'static str;

    /// Variant names in resolution order.
    const VARIANTS: &'static [&'static str];

    /// Variant descriptors in resolution order.
    fn descriptors() -> &'static [VariantDescriptor];

    /// Materializes the deserializer's node as the named variant.
    fn materialize<E: de::Error>(variant: &str, deserializer: NodeDeserializer<E>) -> Result<Self, E>;
}

/// Selects the first variant of `F` that recognizes every key of `node`.
///
/// The absent marker has no keys and therefore selects the first variant.
/// Returns `None` for scalars and sequences.
pub fn resolve<F: Family>(node: &Node) -> Option<&'static VariantDescriptor> {
    let present: Vec<_> = match node {
        Node::Mapping(map) => map.keys().map(|key| scalar::decode(key)).collect(),
        Node::Absent => Vec::new(),
        _ => return None,
    };
    F::descriptors()
        .iter()
        .find(|descriptor| descriptor.accepts(present.iter().map(|key| key.as_ref())))
}

/// `Deserialize` entry point for families.
///
/// # Errors
///
/// Fails with an unknown-variant error when no variant accepts the present
/// keys, and with an invalid-type error when the input is not a mapping.
pub fn deserialize<'de, F, D>(deserializer: D) -> Result<F, D::Error>
where
    F: Family,
    D: Deserializer<'de>,
{
    let (zero_fill, node) = deserializer.deserialize_newtype_struct(CAPTURE_NODE, Capture)?;
    match &node {
        Node::Scalar(token) => {
            return Err(<D::Error as de::Error>::invalid_type(
                Unexpected::Str(token),
                &"a mapping",
            ))
        }
        Node::Sequence(_) => {
            return Err(<D::Error as de::Error>::invalid_type(
                Unexpected::Seq,
                &"a mapping",
            ))
        }
        Node::Mapping(_) | Node::Absent => {}
    }

    let Some(descriptor) = resolve::<F>(&node) else {
        log::debug!(
            "no variant of {} accepts keys {:?}",
            F::NAME,
            node.as_mapping().map(|map| map.keys().collect::<Vec<_>>())
        );
        return Err(<D::Error as de::Error>::unknown_variant(F::NAME, F::VARIANTS));
    };
    log::debug!("resolved {} as variant {}", F::NAME, descriptor.name);
    F::materialize(descriptor.name, NodeDeserializer::new(node).zero_fill(zero_fill))
}

/// Takes the node a family is read from, along with the zero-fill setting
/// when the deserializer is a [`NodeDeserializer`].
struct Capture;

impl<'de> Visitor<'de> for Capture {
    type Value = (bool, Node);

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a family record")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok((false, Node::deserialize(deserializer)?))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let zero_fill: bool = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let node: Node = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        Ok((zero_fill, node))
    }
}

/// Returns the field names a type hands to `deserialize_struct`.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use yaml_records::family::struct_fields;
///
/// #[derive(Deserialize)]
/// struct CardType { title: String, icon_path: String }
///
/// assert_eq!(struct_fields::<CardType>(), Some(&["title", "icon_path"][..]));
/// assert_eq!(struct_fields::<Vec<u8>>(), None);
/// ```
#[must_use]
pub fn struct_fields<T: DeserializeOwned>() -> Option<&'static [&'static str]> {
    match T::deserialize(FieldLister) {
        Err(Listing::Fields(fields)) => Some(fields),
        _ => None,
    }
}

struct FieldLister;

#[derive(Debug)]
enum Listing {
    Fields(&'static [&'static str]),
    NotAStruct,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Fields(fields) => write!(f, "struct with fields {:?}", fields),
            Listing::NotAStruct => f.write_str("not a struct"),
        }
    }
}

impl std::error::Error for Listing {}

impl de::Error for Listing {
    fn custom<T: fmt::Display>(_msg: T) -> Self {
        Listing::NotAStruct
    }
}

impl<'de> Deserializer<'de> for FieldLister {
    type Error = Listing;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value, Listing>
    where
        V: Visitor<'de>,
    {
        Err(Listing::NotAStruct)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value, Listing>
    where
        V: Visitor<'de>,
    {
        Err(Listing::Fields(fields))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value, Listing>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct SocketState {
        variants: Vec<String>,
        default_variant: String,
        sockets: Vec<String>,
    }

    #[derive(Deserialize)]
    #[allow(dead_code)]
    struct Wrapper(SocketState);

    #[test]
    fn test_descriptor_keys_include_both_spellings() {
        let descriptor = VariantDescriptor::of::<SocketState>("Socket");
        assert_eq!(
            descriptor.keys().unwrap(),
            &["variants", "default_variant", "defaultVariant", "sockets"]
        );
        assert!(descriptor.accepts(["defaultVariant", "sockets"]));
        assert!(!descriptor.accepts(["defaultVariant", "seconds"]));
        assert!(descriptor.accepts([]));
    }

    #[test]
    fn test_listing_sees_through_newtype_structs() {
        assert_eq!(
            struct_fields::<Wrapper>(),
            Some(&["variants", "default_variant", "sockets"][..])
        );
    }

    #[test]
    fn test_descriptor_without_fields_accepts_anything() {
        let descriptor = VariantDescriptor::of::<std::collections::HashMap<String, u8>>("Any");
        assert_eq!(descriptor.keys(), None);
        assert!(descriptor.accepts(["whatever"]));
    }

    #[test]
    fn test_explicit_keys() {
        let descriptor = VariantDescriptor::with_keys("Card", &["newCards"]);
        assert!(descriptor.accepts(["newCards"]));
        assert!(!descriptor.accepts(["new_cards"]));
    }
}
