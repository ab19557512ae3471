//! Flags-style enumerations.
//!
//! Bitmask types declared with [`bitflags`] are written as the names of
//! their set flags, comma-separated in declaration order. The empty
//! combination is the empty token. Use this module with serde's `with`
//! attribute:
//!
//! ```rust
//! use bitflags::bitflags;
//! use serde::{Deserialize, Serialize};
//! use yaml_records::{from_str, to_string};
//!
//! bitflags! {
//!     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//!     pub struct Access: u8 {
//!         const READ = 1;
//!         const WRITE = 2;
//!     }
//! }
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Slot {
//!     #[serde(with = "yaml_records::flags")]
//!     access: Access,
//! }
//!
//! let slot = Slot { access: Access::READ | Access::WRITE };
//! assert_eq!(to_string(&slot).unwrap(), "access: READ, WRITE");
//! assert_eq!(from_str::<Slot>("access: WRITE,READ").unwrap(), slot);
//! ```

use crate::Result;
use bitflags::Flags;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Encodes the set flags of `flags` as `Name1, Name2`.
///
/// Bits without a declared name are not written.
pub fn encode<T: Flags>(flags: &T) -> String {
    flags
        .iter_names()
        .map(|(name, _)| name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Decodes a comma-separated list of flag names.
///
/// Names are trimmed and matched case-sensitively; the empty token is the
/// empty combination.
///
/// # Errors
///
/// Returns [`Error::ScalarConversion`](crate::Error::ScalarConversion) for an
/// unknown flag name.
pub fn decode<T: Flags>(text: &str) -> Result<T> {
    decode_names(text)
}

fn decode_names<T: Flags, E: de::Error>(text: &str) -> std::result::Result<T, E> {
    let mut flags = T::empty();
    for name in text.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        match T::from_name(name) {
            Some(flag) => flags.insert(flag),
            None => return Err(E::invalid_value(Unexpected::Str(name), &"a declared flag name")),
        }
    }
    Ok(flags)
}

/// Serializes a flags value as its comma-joined names.
///
/// # Errors
///
/// Propagates the serializer's error.
pub fn serialize<T, S>(flags: &T, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    T: Flags,
    S: Serializer,
{
    serializer.serialize_str(&encode(flags))
}

/// Deserializes a flags value from its comma-joined names.
///
/// # Errors
///
/// Fails when the input is not a string or names an unknown flag.
pub fn deserialize<'de, T, D>(deserializer: D) -> std::result::Result<T, D::Error>
where
    T: Flags,
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(FlagsVisitor(PhantomData))
}

struct FlagsVisitor<T>(PhantomData<T>);

impl<'de, T: Flags> Visitor<'de> for FlagsVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a comma-separated list of flag names")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<T, E> {
        decode_names(value)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<T, E> {
        Ok(T::empty())
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<T, E> {
        Ok(T::empty())
    }
}

#[cfg(test)]
#[allow(non_upper_case_globals)]
mod tests {
    use super::*;
    use crate::{from_str, to_string, Error};
    use bitflags::bitflags;
    use serde::{Deserialize, Serialize};

    bitflags! {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        struct TestFlags: u32 {
            const This = 1;
            const And = 2;
            const That = 4;
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "crate::flags")]
        flags_value: TestFlags,
    }

    #[test]
    fn test_all_flags_round_trip() {
        let holder: Holder = from_str("flagsValue: This, And, That").unwrap();
        assert_eq!(holder.flags_value.bits(), 7);
        assert_eq!(to_string(&holder).unwrap(), "flagsValue: This, And, That");
    }

    #[test]
    fn test_declaration_order_on_output() {
        assert_eq!(encode(&(TestFlags::That | TestFlags::This)), "This, That");
    }

    #[test]
    fn test_empty_combination() {
        assert_eq!(encode(&TestFlags::empty()), "");
        assert_eq!(decode::<TestFlags>("").unwrap(), TestFlags::empty());

        let holder = Holder { flags_value: TestFlags::empty() };
        let text = to_string(&holder).unwrap();
        assert_eq!(text, "flagsValue:");
        assert_eq!(from_str::<Holder>(&text).unwrap(), holder);
    }

    #[test]
    fn test_unknown_name() {
        let err = decode::<TestFlags>("This, Other").unwrap_err();
        assert!(matches!(err, Error::ScalarConversion { .. }), "{err:?}");

        let err = from_str::<Holder>("flagsValue: this").unwrap_err();
        assert!(matches!(err, Error::ScalarConversion { .. }), "{err:?}");
    }
}
