//! # yaml_records
//!
//! A Serde-compatible, schema-less record format with YAML-like syntax.
//!
//! Documents are read and written by looking at the structure of the Rust
//! types involved: there is no separate schema. Structs become mappings
//! keyed by their canonical field names, sequences become `- ` lists, and
//! scalars are written as plain tokens, quoted only when necessary.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use yaml_records::{from_str, to_string};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Post {
//!     title: String,
//!     content: String,
//!     items: Vec<bool>,
//! }
//!
//! let post = Post {
//!     title: "Hello World".to_string(),
//!     content: "This is a test (including special characters! #)".to_string(),
//!     items: vec![true, false, true],
//! };
//!
//! let text = to_string(&post).unwrap();
//! assert_eq!(
//!     text,
//!     "title: Hello World\n\
//!      content: \"This is a test (including special characters! #)\"\n\
//!      items:\n  - true\n  - false\n  - true"
//! );
//!
//! let back: Post = from_str(&text).unwrap();
//! assert_eq!(post, back);
//! ```
//!
//! ## Pipeline
//!
//! Reading goes text → [`parse`] → [`Node`] tree → [`from_node`]. Writing
//! goes value → [`to_node`] → [`Node`] tree → canonical text. Each stage is
//! public, so a tree can be inspected or built by hand with [`node!`].
//!
//! - **Structs**: field `icon_path` is written as key `iconPath`; on input
//!   both spellings are accepted (see [`canonical_key`])
//! - **Optional values**: `None` is written as a bare `key:`
//! - **Plain enums**: written as the variant name; the first variant is the
//!   zero value and is written empty
//! - **Flags**: `bitflags` types via `#[serde(with = "yaml_records::flags")]`
//! - **Polymorphic records**: [`variant_family!`] enums, resolved by the keys
//!   present in the mapping
//!
//! The grammar is documented in [`format`].
//!
//! ## Error Handling
//!
//! All fallible functions return [`Result<T>`]. Parsing is lenient about
//! layout; materialization is strict about shapes and tokens:
//!
//! ```rust
//! use yaml_records::{from_str, Error};
//!
//! #[derive(serde::Deserialize, Debug)]
//! struct Socket { slots: u8 }
//!
//! let err = from_str::<Socket>("slots: many").unwrap_err();
//! assert!(matches!(err, Error::ScalarConversion { .. }));
//! ```

pub mod de;
pub mod error;
pub mod family;
pub mod flags;
pub mod format;
mod key;
mod macros;
pub mod map;
pub mod node;
pub mod options;
pub mod parse;
pub mod scalar;
pub mod ser;

pub use de::{from_node, from_node_with_options, NodeDeserializer};
pub use error::{Error, Result};
pub use family::{Family, VariantDescriptor};
pub use key::canonical_key;
pub use map::NodeMap;
pub use node::Node;
pub use options::Options;
pub use parse::{parse, parse_with_options};
pub use ser::{to_node, NodeSerializer};

#[doc(hidden)]
pub use serde as __serde;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Serializes any `T: Serialize` to canonical text.
///
/// # Examples
///
/// ```rust
/// use serde::Serialize;
/// use yaml_records::to_string;
///
/// #[derive(Serialize)]
/// struct Nullable { property1: Option<u32>, property2: Option<u32> }
///
/// let value = Nullable { property1: Some(60), property2: None };
/// assert_eq!(to_string(&value).unwrap(), "property1: 60\nproperty2:");
/// ```
///
/// # Errors
///
/// Returns an error for non-scalar mapping keys and for struct fields that
/// collide after the canonical key transform.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    to_string_with_options(value, &Options::default())
}

/// Serializes any `T: Serialize` to canonical text with custom options.
///
/// # Errors
///
/// See [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &Options) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let node = to_node(value)?;
    Ok(ser::write_node(&node, options))
}

/// Serializes any `T: Serialize` to a writer.
///
/// # Examples
///
/// ```rust
/// use yaml_records::to_writer;
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &vec!["a", "b"]).unwrap();
/// assert_eq!(buffer, b"- a\n- b");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let text = to_string(value)?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))
}

/// Deserializes an instance of `T` from text.
///
/// # Examples
///
/// ```rust
/// use serde::Deserialize;
/// use std::collections::HashMap;
/// use yaml_records::from_str;
///
/// #[derive(Deserialize, Debug, PartialEq)]
/// struct CardType { title: String, icon_path: String }
///
/// #[derive(Deserialize)]
/// struct Config { card_types: HashMap<String, CardType> }
///
/// let text = "cardTypes:\n\tfunds:\n\t\ttitle: Funds\n\t\ticonPath: \"res://x\"\n";
/// let config: Config = from_str(text).unwrap();
/// assert_eq!(config.card_types["funds"].icon_path, "res://x");
/// ```
///
/// # Errors
///
/// Returns an error if the text is structurally invalid or does not fit `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(s, &Options::default())
}

/// Deserializes an instance of `T` from text with custom options.
///
/// A document with no content materializes like an absent value, so it
/// reads back as the zero value of `T`.
///
/// # Errors
///
/// See [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with_options<T>(s: &str, options: &Options) -> Result<T>
where
    T: DeserializeOwned,
{
    let node = match parse_with_options(s, options)? {
        Node::Mapping(map) if map.is_empty() => Node::Absent,
        node => node,
    };
    from_node_with_options(node, options)
}

/// Deserializes an instance of `T` from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use yaml_records::from_reader;
///
/// let numbers: Vec<u16> = from_reader(Cursor::new(b"- 1\n- 2")).unwrap();
/// assert_eq!(numbers, vec![1, 2]);
/// ```
///
/// # Errors
///
/// Returns an error if reading fails, or see [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut string = String::new();
    reader
        .read_to_string(&mut string)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_str(&string)
}

/// Deserializes an instance of `T` from UTF-8 bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid UTF-8, or see [`from_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice<T>(v: &[u8]) -> Result<T>
where
    T: DeserializeOwned,
{
    let s = std::str::from_utf8(v).map_err(|e| Error::io(&e.to_string()))?;
    from_str(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Nullable {
        property1: Option<u32>,
        property2: Option<u32>,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Post {
        title: String,
        content: String,
        items: Vec<bool>,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct CardType {
        title: String,
        icon_path: String,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Config {
        card_types: HashMap<String, CardType>,
    }

    #[test]
    fn test_nullable_fields() {
        let value: Nullable = from_str("property1: 60").unwrap();
        assert_eq!(
            value,
            Nullable {
                property1: Some(60),
                property2: None
            }
        );
        assert_eq!(to_string(&value).unwrap(), "property1: 60\nproperty2:");
    }

    #[test]
    fn test_quoted_content_and_bool_items() {
        let post = Post {
            title: "Hello World".to_string(),
            content: "This is a test (including special characters! #)".to_string(),
            items: vec![true, false, true],
        };
        let text = to_string(&post).unwrap();
        assert_eq!(
            text,
            "title: Hello World\ncontent: \"This is a test (including special characters! #)\"\nitems:\n  - true\n  - false\n  - true"
        );
        assert_eq!(from_str::<Post>(&text).unwrap(), post);
    }

    #[test]
    fn test_tab_indented_config() {
        let text = "cardTypes:\n\tfunds:\n\t\ttitle: Funds\n\t\ticonPath: \"res://x\"\n";
        let config: Config = from_str(text).unwrap();
        assert_eq!(
            config.card_types["funds"],
            CardType {
                title: "Funds".to_string(),
                icon_path: "res://x".to_string()
            }
        );
    }

    #[test]
    fn test_blank_document_is_zero_value() {
        assert_eq!(from_str::<Vec<u8>>("").unwrap(), Vec::<u8>::new());
        assert_eq!(from_str::<String>("  # nothing\n").unwrap(), "");
        assert_eq!(from_str::<Option<u8>>("").unwrap(), None);
    }

    #[test]
    fn test_top_level_scalars() {
        assert_eq!(to_string(&42).unwrap(), "42");
        assert_eq!(from_str::<i32>("42").unwrap(), 42);
        assert_eq!(from_str::<String>("\"a: b\"").unwrap(), "a: b");
        assert_eq!(from_str::<Vec<String>>("[x, y]").unwrap(), vec!["x", "y"]);
    }

    #[test]
    fn test_writer_and_slice() {
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &Nullable { property1: None, property2: Some(1) }).unwrap();
        assert_eq!(buffer, b"property1:\nproperty2: 1");
        let back: Nullable = from_slice(&buffer).unwrap();
        assert_eq!(back.property2, Some(1));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = from_slice::<String>(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
