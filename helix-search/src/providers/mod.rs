//! Provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::Provider`]
//! for one category, plus a pure parse function over the upstream body so
//! the mapping can be tested without a network.

pub mod general;
pub mod images;
pub mod news;
pub mod videos;

pub use general::GeneralProvider;
pub use images::ImageProvider;
pub use news::NewsProvider;
pub use videos::VideoProvider;

use serde_json::Value;

/// Read `key` from a JSON object as a non-blank string.
///
/// Absent keys, non-string values and blank strings all read as `None`.
pub(crate) fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Read `key` from a JSON object as an array, treating anything else as empty.
pub(crate) fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}
