//! Manifest serialization
//!
//! Objects are lowered to a `serde_json::Value` first so every mapping is
//! emitted with sorted keys, then written as YAML. Two runs over the same
//! inputs always produce identical bytes.
//!
//! serde_yaml follows YAML 1.2 and leaves words like `yes` or `off` unquoted.
//! Payloads read by YAML 1.1 parsers go through [`to_yaml11_record_bytes`],
//! which quotes those words so they stay strings.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Plain scalars a YAML 1.1 parser resolves to booleans
const YAML11_BOOL_WORDS: &[&str] = &["y", "yes", "n", "no", "true", "false", "on", "off"];

fn is_yaml11_bool(s: &str) -> bool {
    YAML11_BOOL_WORDS.iter().any(|w| w.eq_ignore_ascii_case(s))
}

/// Serialize any object to key-sorted YAML bytes.
///
/// `kind` is only used to label the error.
pub fn to_yaml_bytes<T: Serialize>(kind: &str, value: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(value)
        .map_err(|e| Error::serialization_for_kind(kind, e.to_string()))?;
    serde_yaml::to_string(&value)
        .map(String::into_bytes)
        .map_err(|e| Error::serialization_for_kind(kind, e.to_string()))
}

/// Serialize a flat record to key-sorted YAML that YAML 1.1 readers parse
/// back to the same strings.
///
/// String fields spelling a YAML 1.1 boolean are written double-quoted. The
/// value must serialize to a mapping.
pub fn to_yaml11_record_bytes<T: Serialize>(kind: &str, value: &T) -> Result<Vec<u8>> {
    let fields = match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => return Err(Error::serialization_for_kind(kind, "expected a mapping")),
        Err(e) => return Err(Error::serialization_for_kind(kind, e.to_string())),
    };

    let mut out = String::new();
    for (key, field) in fields {
        let entry = match &field {
            Value::String(s) if is_yaml11_bool(s) => {
                let key = serde_yaml::to_string(&key)
                    .map_err(|e| Error::serialization_for_kind(kind, e.to_string()))?;
                let quoted = serde_json::to_string(s)
                    .map_err(|e| Error::serialization_for_kind(kind, e.to_string()))?;
                format!("{}: {quoted}\n", key.trim_end())
            }
            _ => {
                let single = Map::from_iter([(key, field)]);
                serde_yaml::to_string(&single)
                    .map_err(|e| Error::serialization_for_kind(kind, e.to_string()))?
            }
        };
        out.push_str(&entry);
    }
    Ok(out.into_bytes())
}
