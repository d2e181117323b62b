//! Field decoders that never fail on a malformed value.
//!
//! The kubelet pod list is an external document whose nested fields are read on a
//! best-effort basis. A field holding a value of the wrong type decodes to `None`
//! and a malformed list element is dropped, so one bad record never rejects the
//! whole snapshot.
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decodes an optional value, yielding `None` for `null` or a value of the wrong type.
pub(super) fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Decodes an optional list, dropping elements that fail to decode.
///
/// `null` yields `None`. A present value that is not a list yields an empty list, so
/// the field still counts as present.
pub(super) fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Array(values) => values
            .into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(item) => Some(item),
                Err(err) => {
                    log::debug!("skipping malformed list element: {}", err);
                    None
                }
            })
            .collect(),
        other => {
            log::debug!("expected a list, found: {}", other);
            Vec::new()
        }
    };
    Ok(Some(items))
}

/// Decodes an optional string map, dropping entries whose value is not a string.
pub(super) fn string_map<'de, D>(
    deserializer: D,
) -> Result<Option<HashMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(value) => Some((key, value)),
                _ => None,
            })
            .collect(),
    ))
}
