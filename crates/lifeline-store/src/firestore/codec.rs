//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! ```text
//! null        <-> {"nullValue": null}
//! bool        <-> {"booleanValue": b}
//! i64         <-> {"integerValue": "n"}      (string on the wire)
//! f64         <-> {"doubleValue": x}
//! string      <-> {"stringValue": s}
//! array       <-> {"arrayValue": {"values": [...]}}
//! object      <-> {"mapValue": {"fields": {...}}}
//! timestamp    -> RFC 3339 string
//! ```

use serde_json::{Map, Value, json};

use crate::StoreError;

#[must_use]
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => n.as_i64().map_or_else(
            || json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
            |i| json!({ "integerValue": i.to_string() }),
        ),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            json!({ "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

#[must_use]
pub fn encode_fields(fields: &Map<String, Value>) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Decode one typed value.
///
/// # Errors
///
/// Returns `StoreError::Decode` for unknown or malformed encodings.
pub fn decode_value(value: &Value) -> Result<Value, StoreError> {
    let Some(map) = value.as_object() else {
        return Err(StoreError::Decode(format!("expected typed value, got {value}")));
    };
    let Some((kind, inner)) = map.iter().next() else {
        return Err(StoreError::Decode("empty typed value".into()));
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "doubleValue" => Ok(inner.clone()),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| StoreError::Decode(format!("bad integerValue: {inner}")))
        }
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => Ok(inner.clone()),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = inner.get("fields").cloned().unwrap_or(Value::Object(Map::new()));
            decode_fields(&fields).map(Value::Object)
        }
        other => Err(StoreError::Decode(format!("unsupported value kind '{other}'"))),
    }
}

/// Decode a `fields` object into plain JSON.
///
/// # Errors
///
/// Returns `StoreError::Decode` if `fields` is not an object or a value is malformed.
pub fn decode_fields(fields: &Value) -> Result<Map<String, Value>, StoreError> {
    let Some(map) = fields.as_object() else {
        return Err(StoreError::Decode(format!("expected fields object, got {fields}")));
    };
    map.iter()
        .map(|(k, v)| decode_value(v).map(|decoded| (k.clone(), decoded)))
        .collect()
}

/// Last path segment of a resource name (`.../documents/users/u1` -> `u1`).
#[must_use]
pub fn id_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
