//! Property values exchanged between the canvas, the property grid and source.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// A single component property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    String(String),
    /// Objects, arrays and `null`
    Structured(Value),
}

/// Input widget a property is edited with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorKind {
    Checkbox,
    Number,
    Text,
    Json,
}

impl PropValue {
    /// Convert raw widget input into a value.
    ///
    /// Returns `None` when the input does not fit the widget (a number field
    /// holding `abc`, malformed JSON).
    pub fn coerce(raw: &str, kind: EditorKind) -> Option<Self> {
        match kind {
            EditorKind::Checkbox => Some(PropValue::Bool(matches!(
                raw.trim(),
                "true" | "on" | "1" | "checked"
            ))),
            EditorKind::Number => raw.trim().parse::<f64>().ok().map(PropValue::Number),
            EditorKind::Text => Some(PropValue::String(raw.to_string())),
            EditorKind::Json => serde_json::from_str(raw).ok().map(PropValue::Structured),
        }
    }

    pub fn editor_kind(&self) -> EditorKind {
        match self {
            PropValue::Bool(_) => EditorKind::Checkbox,
            PropValue::Number(_) => EditorKind::Number,
            PropValue::String(_) => EditorKind::Text,
            PropValue::Structured(_) => EditorKind::Json,
        }
    }

    /// Convert a JSON value, keeping scalars as scalars
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(b) => PropValue::Bool(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => PropValue::Number(f),
                None => PropValue::Structured(Value::Number(n)),
            },
            Value::String(s) => PropValue::String(s),
            other => PropValue::Structured(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            PropValue::Bool(b) => Value::Bool(*b),
            PropValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropValue::String(s) => Value::String(s.clone()),
            PropValue::Structured(v) => v.clone(),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text shown between tags when this value is used as `children`
    pub fn to_text(&self) -> String {
        match self {
            PropValue::Bool(b) => b.to_string(),
            PropValue::Number(n) => format_number(*n),
            PropValue::String(s) => s.clone(),
            PropValue::Structured(Value::Null) => String::new(),
            PropValue::Structured(v) => v.to_string(),
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::String(s) => f.write_str(s),
            other => f.write_str(&other.to_text()),
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<Value> for PropValue {
    fn from(value: Value) -> Self {
        PropValue::from_json(value)
    }
}

/// Format a number the way it is written in script source.
///
/// Integral values print without a fraction; non-finite values use the
/// global identifiers (`NaN`, `Infinity`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let name = if n > 0.0 { "Infinity" } else { "-Infinity" };
        name.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Parse a numeric literal (`3`, `-1.5`, `1e3`, `1_000`, `NaN`, `Infinity`)
pub fn parse_number(source: &str) -> Option<f64> {
    let s = source.trim();
    match s {
        "NaN" => return Some(f64::NAN),
        "Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let digits = s.strip_prefix('-').unwrap_or(s);
    let first = digits.chars().next()?;
    if !(first.is_ascii_digit() || (first == '.' && digits.len() > 1)) {
        return None;
    }
    if digits.contains(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    s.replace('_', "").parse::<f64>().ok()
}

/// Insertion-ordered property map.
///
/// Order matters: new attributes are written in the order their properties
/// were given, and the property grid lists rows in this order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(String, PropValue)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a property, replacing in place or appending; returns the old value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Option<PropValue> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build from a JSON object; `None` for any other JSON value
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(
                map.into_iter()
                    .map(|(key, value)| (key, PropValue::from_json(value)))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (key, value) in iter {
            props.insert(key, value);
        }
        props
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of property values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Properties, A::Error> {
                let mut props = Properties::new();
                while let Some((key, value)) = access.next_entry::<String, PropValue>()? {
                    props.insert(key, value);
                }
                Ok(props)
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}
