//! `application/x-www-form-urlencoded` query string decoding
//!
//! Bracket notation nests: `fields[posts]=title` becomes
//! `{"fields": {"posts": "title"}}` and `tags[]=a&tags[]=b` becomes
//! `{"tags": ["a", "b"]}`. A repeated plain key keeps its last value.

use crate::error::ParseError;
use serde_json::{Map, Value};
use url::form_urlencoded;

/// Decode a raw query string (with or without the leading `?`)
///
/// # Errors
/// Returns [`ParseError::Conflict`] when a name is used both as a plain value
/// and as a bracketed map or list
pub fn decode_query_string(raw: &str) -> Result<Value, ParseError> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut root = Map::new();

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        if key.is_empty() {
            continue;
        }
        let segments = key_segments(&key);
        insert(&mut root, segments[0], &segments, Value::String(value.into_owned()))?;
    }

    Ok(Value::Object(root))
}

fn key_segments(key: &str) -> Vec<&str> {
    match key.find('[') {
        Some(open) if open > 0 && key.ends_with(']') => {
            let mut segments = vec![&key[..open]];
            segments.extend(key[open + 1..key.len() - 1].split("]["));
            segments
        }
        _ => vec![key],
    }
}

fn insert(map: &mut Map<String, Value>, parameter: &str, segments: &[&str], value: Value) -> Result<(), ParseError> {
    let conflict = || ParseError::Conflict {
        parameter: parameter.to_string(),
    };

    let (head, rest) = segments.split_first().ok_or_else(conflict)?;
    let Some(next) = rest.first() else {
        if matches!(map.get(*head), Some(Value::Object(_) | Value::Array(_))) {
            return Err(conflict());
        }
        map.insert((*head).to_string(), value);
        return Ok(());
    };

    if next.is_empty() {
        let entry = map
            .entry((*head).to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match entry {
            Value::Array(items) if rest.len() == 1 => {
                items.push(value);
                Ok(())
            }
            _ => Err(conflict()),
        }
    } else {
        let entry = map
            .entry((*head).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(child) => insert(child, parameter, rest, value),
            _ => Err(conflict()),
        }
    }
}
