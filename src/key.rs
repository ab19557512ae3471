//! The canonical key transform shared by the serializer and the materializer.

/// Converts a field name to its textual key.
///
/// The first character is lower-cased and every `_x` inside the name becomes
/// `X`, so both `IconPath` and `icon_path` map to `iconPath`. The transform is
/// idempotent.
///
/// # Examples
///
/// ```rust
/// use yaml_records::canonical_key;
///
/// assert_eq!(canonical_key("icon_path"), "iconPath");
/// assert_eq!(canonical_key("Title"), "title");
/// assert_eq!(canonical_key("defaultVariant"), "defaultVariant");
/// assert_eq!(canonical_key("property1"), "property1");
/// ```
#[must_use]
pub fn canonical_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        key.extend(first.to_lowercase());
    }
    let mut upper_next = false;
    for ch in chars {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            key.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            key.push(ch);
        }
    }
    if upper_next {
        key.push('_');
    }
    key
}

/// Finds the field whose name or canonical key equals `key`.
pub(crate) fn match_field(fields: &'static [&'static str], key: &str) -> Option<&'static str> {
    fields
        .iter()
        .copied()
        .find(|field| *field == key || canonical_key(field) == key)
}

/// Returns the first pair of fields that share a canonical key.
pub(crate) fn find_collision(fields: &'static [&'static str]) -> Option<&'static str> {
    let keys: Vec<String> = fields.iter().map(|field| canonical_key(field)).collect();
    keys.iter()
        .enumerate()
        .find(|&(i, key)| keys[..i].contains(key))
        .map(|(i, _)| fields[i])
}
