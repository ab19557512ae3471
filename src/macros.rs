/// Builds a [`Node`](crate::Node) tree from a JSON-like literal.
///
/// String literals become scalar tokens (quoted when needed), numbers and
/// booleans become their textual form, and `null` is the absent marker.
///
/// ```rust
/// use yaml_records::{node, Node};
///
/// let tree = node!({
///     "title": "Hello World",
///     "items": [true, false],
///     "socket": null
/// });
/// assert_eq!(tree.get("socket"), Some(&Node::Absent));
/// ```
#[macro_export]
macro_rules! node {
    (null) => {
        $crate::Node::Absent
    };

    ([]) => {
        $crate::Node::Sequence(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Node::Sequence(vec![$($crate::node!($elem)),*])
    };

    ({}) => {
        $crate::Node::Mapping($crate::NodeMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut mapping = $crate::NodeMap::new();
        $(
            mapping.insert($crate::scalar::encode($key), $crate::node!($value));
        )*
        $crate::Node::Mapping(mapping)
    }};

    ($other:expr) => {
        $crate::Node::from($other)
    };
}

/// Declares a polymorphic record family.
///
/// Each variant wraps one concrete record type. Serialization writes the
/// active record as-is, with no tag. Deserialization picks the first variant,
/// in declaration order, whose recognized keys cover every key present in the
/// mapping; see [`Family`](crate::Family).
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use yaml_records::{from_str, to_string, variant_family};
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct TransitionAction { new_state: String }
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// struct VariantAction { new_variant: String }
///
/// variant_family! {
///     #[derive(Debug, PartialEq)]
///     pub enum StateAction {
///         Transition(TransitionAction),
///         Variant(VariantAction),
///     }
/// }
///
/// let action: StateAction = from_str("newVariant: labour").unwrap();
/// assert_eq!(action, StateAction::Variant(VariantAction { new_variant: "labour".into() }));
/// assert_eq!(to_string(&action).unwrap(), "newVariant: labour");
/// ```
#[macro_export]
macro_rules! variant_family {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ( $ty:ty ) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$vmeta])* $variant($ty) ),+
        }

        impl $crate::Family for $name {
            const NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [&'static str] = &[$(stringify!($variant)),+];

            fn descriptors() -> &'static [$crate::VariantDescriptor] {
                static DESCRIPTORS: ::std::sync::OnceLock<::std::vec::Vec<$crate::VariantDescriptor>> =
                    ::std::sync::OnceLock::new();
                DESCRIPTORS.get_or_init(|| {
                    vec![$($crate::VariantDescriptor::of::<$ty>(stringify!($variant))),+]
                })
            }

            fn materialize<E>(
                variant: &str,
                deserializer: $crate::NodeDeserializer<E>,
            ) -> ::std::result::Result<Self, E>
            where
                E: $crate::__serde::de::Error,
            {
                $(
                    if variant == stringify!($variant) {
                        return <$ty as $crate::__serde::Deserialize>::deserialize(deserializer)
                            .map($name::$variant);
                    }
                )+
                Err(E::unknown_variant(Self::NAME, Self::VARIANTS))
            }
        }

        impl $crate::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::__serde::Serializer,
            {
                match self {
                    $( $name::$variant(inner) => $crate::__serde::Serialize::serialize(inner, serializer), )+
                }
            }
        }

        impl<'de> $crate::__serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::__serde::Deserializer<'de>,
            {
                $crate::family::deserialize::<Self, D>(deserializer)
            }
        }
    };
}
