//! Error types for record serialization and deserialization.
//!
//! Failures fall into a small number of kinds, all reported synchronously:
//!
//! - **Structure**: the parsed tree does not have the shape the target type
//!   expects (a scalar where a mapping was required, a wrong tuple length,
//!   two fields colliding on the same textual key, inconsistent indentation)
//! - **Unknown variant**: no concrete variant of a polymorphic family accepts
//!   the keys present in a mapping
//! - **Scalar conversion**: a token cannot be decoded as its target scalar
//!   (unknown enumerant, invalid number, unknown flag name)
//!
//! The parser itself is lenient: blank lines, comments and tab indentation are
//! normalized, and a dedent ends the current block without an error.
//!
//! ## Examples
//!
//! ```rust
//! use yaml_records::{from_str, Error};
//!
//! let result: Result<u8, Error> = from_str("300");
//! assert!(matches!(result, Err(Error::ScalarConversion { .. })));
//! ```

use serde::de::{Expected, Unexpected};
use std::fmt;
use thiserror::Error;

/// All errors produced while converting between text, [`Node`](crate::Node)
/// trees and typed values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// The tree shape does not match what the target type expects
    #[error("Structure error: {0}")]
    Structure(String),

    /// No variant of a polymorphic family accepts the present keys
    #[error("Could not find a concrete variant of `{family}` for the given keys (candidates: {candidates})")]
    UnknownVariant { family: String, candidates: String },

    /// A scalar token could not be decoded as its target kind
    #[error("Cannot convert {token} to {expected}")]
    ScalarConversion { token: String, expected: String },

    /// Nesting exceeded [`Options::max_depth`](crate::Options::max_depth)
    #[error("Nesting depth limit of {limit} exceeded at line {line}")]
    DepthLimit { line: usize, limit: usize },

    /// Unsupported value for serialization
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Generic message raised by a `Deserialize` or `Serialize` impl
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Creates a structure error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_records::Error;
    ///
    /// let err = Error::structure("expected a mapping");
    /// assert!(err.to_string().contains("expected a mapping"));
    /// ```
    pub fn structure<T: fmt::Display>(msg: T) -> Self {
        Error::Structure(msg.to_string())
    }

    /// Creates an unknown-variant error naming the family and its candidates.
    pub fn unknown_variant(family: &str, candidates: &[&str]) -> Self {
        Error::UnknownVariant {
            family: family.to_string(),
            candidates: candidates.join(", "),
        }
    }

    /// Creates a scalar conversion error for `token`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use yaml_records::Error;
    ///
    /// let err = Error::scalar_conversion("abc", "an integer");
    /// assert_eq!(err.to_string(), "Cannot convert abc to an integer");
    /// ```
    pub fn scalar_conversion(token: &str, expected: &str) -> Self {
        Error::ScalarConversion {
            token: token.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates a depth limit error.
    pub fn depth_limit(line: usize, limit: usize) -> Self {
        Error::DepthLimit { line, limit }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

// The materializer is generic over `serde::de::Error`, so the error kind is
// carried through serde's typed constructors rather than through `custom`.
impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }

    fn invalid_type(unexp: Unexpected, exp: &dyn Expected) -> Self {
        Error::Structure(format!("invalid type: {}, expected {}", unexp, exp))
    }

    fn invalid_value(unexp: Unexpected, exp: &dyn Expected) -> Self {
        Error::scalar_conversion(&unexp.to_string(), &exp.to_string())
    }

    fn invalid_length(len: usize, exp: &dyn Expected) -> Self {
        Error::Structure(format!("invalid length {}, expected {}", len, exp))
    }

    fn unknown_variant(variant: &str, expected: &'static [&'static str]) -> Self {
        Error::unknown_variant(variant, expected)
    }

    fn unknown_field(field: &str, expected: &'static [&'static str]) -> Self {
        Error::Structure(format!(
            "unknown field `{}`, expected one of: {}",
            field,
            expected.join(", ")
        ))
    }

    fn missing_field(field: &'static str) -> Self {
        Error::Structure(format!("missing field `{}`", field))
    }

    fn duplicate_field(field: &'static str) -> Self {
        Error::Structure(format!("duplicate field `{}`", field))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
