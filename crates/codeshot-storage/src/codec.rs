use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

use codeshot_core::{CodeShotError, Result};

/// `type` tag of the object that carries a byte sequence on the wire.
pub const BYTES_MARKER: &str = "_bytes_ascii";

/// A value that can be kept in user storage: JSON plus raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<StorageValue>),
    Map(BTreeMap<String, StorageValue>),
}

/// Encode a storage value into wire JSON.
///
/// Fails only for non-finite floats, which JSON cannot represent.
pub fn encode(value: &StorageValue) -> Result<Value> {
    Ok(match value {
        StorageValue::Null => Value::Null,
        StorageValue::Bool(b) => Value::Bool(*b),
        StorageValue::Int(i) => Value::Number((*i).into()),
        StorageValue::Float(f) => Value::Number(
            Number::from_f64(*f)
                .ok_or_else(|| CodeShotError::Codec(format!("cannot encode float {f}")))?,
        ),
        StorageValue::String(s) => Value::String(s.clone()),
        StorageValue::Bytes(bytes) => {
            let mut marker = Map::new();
            marker.insert("type".into(), Value::String(BYTES_MARKER.into()));
            marker.insert("data".into(), Value::String(STANDARD.encode(bytes)));
            Value::Object(marker)
        }
        StorageValue::List(items) => {
            Value::Array(items.iter().map(encode).collect::<Result<_>>()?)
        }
        StorageValue::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), encode(v)?)))
                .collect::<Result<_>>()?,
        ),
    })
}

/// Decode wire JSON back into a storage value.
///
/// A marker object whose `data` is not valid base64 is a codec error.
/// Integers above `i64::MAX`, which other JSON clients may write, come back
/// as the nearest `Float`; precision beyond 53 bits is lost.
pub fn decode(value: &Value) -> Result<StorageValue> {
    if let Some(data) = bytes_marker_data(value) {
        let bytes = STANDARD
            .decode(data)
            .map_err(|e| CodeShotError::Codec(format!("invalid base64 in bytes marker: {e}")))?;
        return Ok(StorageValue::Bytes(bytes));
    }
    Ok(match value {
        Value::Null => StorageValue::Null,
        Value::Bool(b) => StorageValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => StorageValue::Int(i),
            // u64 above i64::MAX, or a float
            None => StorageValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => StorageValue::String(s.clone()),
        Value::Array(items) => {
            StorageValue::List(items.iter().map(decode).collect::<Result<_>>()?)
        }
        Value::Object(entries) => StorageValue::Map(
            entries
                .iter()
                .map(|(k, v)| Ok((k.clone(), decode(v)?)))
                .collect::<Result<_>>()?,
        ),
    })
}

/// Serialize a storage value to JSON text.
pub fn to_json_string(value: &StorageValue) -> Result<String> {
    Ok(serde_json::to_string(&encode(value)?)?)
}

/// Deserialize a storage value from JSON text.
pub fn from_json_string(text: &str) -> Result<StorageValue> {
    decode(&serde_json::from_str::<Value>(text)?)
}

/// Returns the base64 payload if `value` is exactly
/// `{"type": "_bytes_ascii", "data": <string>}`.
fn bytes_marker_data(value: &Value) -> Option<&str> {
    let obj = value.as_object()?;
    if obj.len() != 2 || obj.get("type")?.as_str()? != BYTES_MARKER {
        return None;
    }
    obj.get("data")?.as_str()
}

impl From<bool> for StorageValue {
    fn from(b: bool) -> Self {
        StorageValue::Bool(b)
    }
}

impl From<i64> for StorageValue {
    fn from(i: i64) -> Self {
        StorageValue::Int(i)
    }
}

impl From<f64> for StorageValue {
    fn from(f: f64) -> Self {
        StorageValue::Float(f)
    }
}

impl From<&str> for StorageValue {
    fn from(s: &str) -> Self {
        StorageValue::String(s.to_string())
    }
}

impl From<String> for StorageValue {
    fn from(s: String) -> Self {
        StorageValue::String(s)
    }
}

impl From<Vec<u8>> for StorageValue {
    fn from(bytes: Vec<u8>) -> Self {
        StorageValue::Bytes(bytes)
    }
}

impl From<&[u8]> for StorageValue {
    fn from(bytes: &[u8]) -> Self {
        StorageValue::Bytes(bytes.to_vec())
    }
}

impl From<Vec<StorageValue>> for StorageValue {
    fn from(items: Vec<StorageValue>) -> Self {
        StorageValue::List(items)
    }
}

impl From<BTreeMap<String, StorageValue>> for StorageValue {
    fn from(entries: BTreeMap<String, StorageValue>) -> Self {
        StorageValue::Map(entries)
    }
}

impl<T: Into<StorageValue>> From<Option<T>> for StorageValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(StorageValue::Null, Into::into)
    }
}
