//! Scalar codec: conversion between raw text tokens and scalar text.
//!
//! The tree builder stores scalars as raw, unparsed tokens. Typed coercion
//! (numbers, booleans, enumerants, flags) happens later in the materializer,
//! which first strips one layer of quoting with [`decode`]. On the way out,
//! [`encode`] adds double quotes whenever the text could not be read back
//! verbatim.
//!
//! ```rust
//! use yaml_records::scalar::{decode, encode};
//!
//! assert_eq!(encode("Hello World"), "Hello World");
//! assert_eq!(encode("special! #"), "\"special! #\"");
//! assert_eq!(decode("\"say \\\"hi\\\"\""), "say \"hi\"");
//! assert_eq!(decode("'it\\'s'"), "it\\'s");
//! ```

use crate::options::SPECIAL_CHARACTERS;
use std::borrow::Cow;

/// Strips one layer of matching surrounding quotes from a raw token.
///
/// Double-quoted tokens unescape `\"`, `\\`, `\n`, `\r` and `\t`; any other
/// escape is kept literally. Single-quoted tokens are taken literally.
/// Unquoted tokens pass through unchanged.
#[must_use]
pub fn decode(token: &str) -> Cow<'_, str> {
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        let inner = &token[1..token.len() - 1];
        if !inner.contains('\\') {
            return Cow::Borrowed(inner);
        }
        let mut result = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                result.push(ch);
                continue;
            }
            match chars.next() {
                Some('"') => result.push('"'),
                Some('\\') => result.push('\\'),
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        }
        Cow::Owned(result)
    } else if token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'') {
        Cow::Borrowed(&token[1..token.len() - 1])
    } else {
        Cow::Borrowed(token)
    }
}

/// Returns `true` if `text` must be double-quoted to survive a round trip.
///
/// Besides the special characters, this covers surrounding whitespace and
/// text that would read back as a sequence entry.
#[inline]
#[must_use]
pub fn needs_quotes(text: &str) -> bool {
    text.contains(SPECIAL_CHARACTERS)
        || text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text == "-"
        || text.starts_with("- ")
}

/// Encodes scalar text as a token, quoting it when necessary.
#[must_use]
pub fn encode(text: &str) -> String {
    if !needs_quotes(text) {
        return text.to_string();
    }
    let mut token = String::with_capacity(text.len() + 2);
    token.push('"');
    for ch in text.chars() {
        match ch {
            '"' => token.push_str("\\\""),
            '\\' => token.push_str("\\\\"),
            '\n' => token.push_str("\\n"),
            '\r' => token.push_str("\\r"),
            '\t' => token.push_str("\\t"),
            _ => token.push(ch),
        }
    }
    token.push('"');
    token
}

#[inline]
#[must_use]
pub const fn encode_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Decodes the literal `true` / `false`.
#[must_use]
pub fn decode_bool(text: &str) -> Option<bool> {
    match text {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}
