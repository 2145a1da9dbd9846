//! Raw activity payload as received from the fitness-data provider.

use crate::ActivityError;
use serde_json::{Map, Value};

/// An untrusted activity payload.
///
/// The only structural guarantee is that it is a JSON object. Every field is
/// looked up and type-checked lazily by the normalizer.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityPayload(Map<String, Value>);

/// Lookup result for a numeric field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumberField {
    Missing,
    Invalid,
    Value(f64),
}

impl ActivityPayload {
    pub fn from_value(value: Value) -> Result<Self, ActivityError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ActivityError::Malformed(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ActivityError> {
        Self::from_value(serde_json::from_str(s)?)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ActivityError> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    /// Field value, treating JSON `null` as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|v| !v.is_null())
    }

    /// Non-empty string field.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Numeric field. Numeric strings such as `"5200.5"` are accepted.
    pub fn number(&self, name: &str) -> NumberField {
        match self.field(name) {
            None => NumberField::Missing,
            Some(Value::Number(n)) => n.as_f64().map_or(NumberField::Invalid, NumberField::Value),
            Some(Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => NumberField::Value(v),
                _ => NumberField::Invalid,
            },
            Some(_) => NumberField::Invalid,
        }
    }

    /// Provider activity id. Providers send either a number or a string.
    pub fn source_id(&self) -> Option<String> {
        match self.field("id")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
