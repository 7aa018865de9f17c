//! Message Parsing
//!
//! Turns an already decoded document tree into messages. The decoder
//! (JSON, TOML, YAML ...) is the caller's business; this only looks at the
//! generic value shape.

use super::Message;
use crate::error::ParseError;
use crate::plural::PluralCategory;
use serde_json::{Map, Value};

/// Keys that mark a map as a single message rather than a group.
const RESERVED_KEYS: [&str; 11] = [
    "id",
    "description",
    "hash",
    "leftdelim",
    "rightdelim",
    "zero",
    "one",
    "two",
    "few",
    "many",
    "other",
];

const NESTED_SEPARATOR: &str = ".";

/// Extract every message from a decoded catalog document.
///
/// Three layouts are accepted:
///
/// - a flat map of `id -> text` or `id -> message map`
/// - nested groups, where ids are joined with `.` on the way down
/// - a list of message maps each carrying an `id` key
pub fn parse_messages(document: &Value) -> Result<Vec<Message>, ParseError> {
    match document {
        Value::String(_) => Err(ParseError::InvalidFile),
        Value::Null => Ok(Vec::new()),
        other => collect(other, is_message(other)),
    }
}

fn collect(value: &Value, is_map_message: bool) -> Result<Vec<Message>, ParseError> {
    match value {
        Value::Object(_) if is_map_message =>Ok(vec![Message::from_value(value)?]),
        Value::Object(map) => {
            let mut messages = Vec::new();
            for (key, child) in map {
                let child_is_message = is_message(child);
                for mut message in collect(child, child_is_message)? {
                    if child_is_message {
                        if message.id.is_empty() {
                            message.id = key.clone();
                        }
                    } else {
                        message.id = format!("{}{}{}", key, NESTED_SEPARATOR, message.id);
                    }
                    messages.push(message);
                }
            }
            Ok(messages)
        }
        Value::Array(items) => {
            let mut messages = Vec::with_capacity(items.len());
            for item in items {
                messages.extend(collect(item, true)?);
            }
            Ok(messages)
        }
        Value::String(_) => Ok(vec![Message::from_value(value)?]),
        other => Err(ParseError::UnsupportedValue(other.to_string())),
    }
}

/// A string is a message with only an "other" form. A map is a message
/// when one of the reserved keys holds a string.
fn is_message(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Object(map) => RESERVED_KEYS
            .iter()
            .any(|key| matches!(map.get(*key), Some(Value::String(_)))),
        _ => false,
    }
}

impl Message {
    /// Build a message from a single decoded value: either a bare string
    /// or a map of message fields. Keys match case-insensitively and
    /// unknown keys are ignored.
    pub fn from_value(value: &Value) -> Result<Message, ParseError> {
        match value {
            Value::String(s) => Ok(Message {
                other: Some(s.clone()),
                ..Default::default()
            }),
            Value::Object(map) => {
                let mut fields = Vec::new();
                string_fields(map, &mut fields)?;
                let mut message = Message::default();
                for (key, text) in fields {
                    message.assign(&key, text);
                }
                Ok(message)
            }
            other => Err(ParseError::UnsupportedValue(other.to_string())),
        }
    }

    fn assign(&mut self, key: &str, text: String) {
        match key.to_ascii_lowercase().as_str() {
            "id" => self.id = text,
            "description" => self.description = text,
            "hash" => self.hash = text,
            "leftdelim" => self.left_delim = text,
            "rightdelim" => self.right_delim = text,
            other => {
                if let Ok(category) = other.parse::<PluralCategory>() {
                    self.set_form(category, Some(text));
                }
            }
        }
    }
}

// Flattens a message map into string fields. A `translation` entry is
// either the "other" text or a nested map of forms.
fn string_fields(map: &Map<String, Value>, out: &mut Vec<(String, String)>) -> Result<(), ParseError> {
    for (key, value) in map {
        match (key.as_str(), value) {
            (_, Value::Null) => {}
            ("translation", Value::String(s)) => out.push(("other".to_string(), s.clone())),
            ("translation", Value::Object(forms)) => string_fields(forms, out)?,
            (_, Value::String(s)) => out.push((key.clone(), s.clone())),
            (_, other) => {
                return Err(ParseError::ExpectedString {
                    key: key.clone(),
                    value: other.to_string(),
                })
            }
        }
    }
    Ok(())
}
