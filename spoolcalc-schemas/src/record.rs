//! Stored Spool Documents
//!
//! A [`SpoolRecord`] is one spool as the store keeps it: a JSON object keyed
//! by the camelCase names the editor uses. The record does not validate or
//! normalise anything on its own; it only knows how to read and write the
//! engine's numeric fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use spoolcalc_core::quantity::parse_lenient;
use spoolcalc_core::Field;

use crate::RecordError;

/// One stored spool document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpoolRecord {
    fields: Map<String, Value>,
}

impl SpoolRecord {
    /// Empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value, which must be an object
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(RecordError::NotAnObject),
        }
    }

    /// Parse a JSON document
    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        let value: Value = serde_json::from_str(text).map_err(|e| RecordError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    /// Serialize to a JSON document
    pub fn to_json(&self) -> Result<String, RecordError> {
        serde_json::to_string(&self.fields).map_err(|e| RecordError::Parse(e.to_string()))
    }

    /// The underlying JSON object
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Raw value under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// True if `key` holds something other than `null`
    pub fn has(&self, key: &str) -> bool {
        self.fields.get(key).map_or(false, |value| !value.is_null())
    }

    /// Store `value` under `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Remove `key`, returning what it held
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// All keys
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the record has no keys
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Numeric value of `field`, NaN when missing or unreadable
    pub fn number(&self, field: Field) -> f64 {
        self.fields.get(field.name()).map_or(f64::NAN, lenient_number)
    }

    /// Store `value` as the number of `field`; non-finite values become `null`
    pub fn set_number(&mut self, field: Field, value: f64) {
        let value = Number::from_f64(value).map_or(Value::Null, Value::Number);
        self.fields.insert(field.name().to_string(), value);
    }

    /// Every engine field with its numeric value
    pub fn engine_values(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL.into_iter().map(move |field| (field, self.number(field)))
    }
}

impl TryFrom<Value> for SpoolRecord {
    type Error = RecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<SpoolRecord> for Value {
    fn from(record: SpoolRecord) -> Self {
        record.into_value()
    }
}

fn lenient_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => parse_lenient(text),
        _ => f64::NAN,
    }
}
