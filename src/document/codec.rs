//! Format boundary: decode bytes into [`Value`] and encode back.
//!
//! Everything format-specific lives here; the merge logic only ever sees the
//! neutral value tree.

use indexmap::IndexMap;

use super::jsonc::{strip_comments, strip_trailing_commas};
use super::{Format, Map, Value};

/// Decode a document whose text is known to be non-blank.
pub(super) fn decode(format: Format, text: &str) -> Result<Value, String> {
    match format {
        Format::Json => decode_json(&strip_trailing_commas(&strip_comments(text))),
        Format::Yaml => decode_yaml(text),
        Format::Toml => decode_toml(text),
        Format::Plist => decode_plist(text.as_bytes()),
    }
}

/// Encode a mapping to text in the given format.
pub(super) fn encode(format: Format, map: &Map) -> Result<String, String> {
    match format {
        Format::Json => {
            let value = to_json(&Value::Map(map.clone()));
            let mut text = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
            text.push('\n');
            Ok(text)
        }
        Format::Yaml => {
            let value = to_yaml(&Value::Map(map.clone()));
            serde_yaml::to_string(&value).map_err(|e| e.to_string())
        }
        Format::Toml => {
            let table = to_toml_table(map);
            toml::to_string_pretty(&table).map_err(|e| e.to_string())
        }
        Format::Plist => {
            let mut buf = Vec::new();
            plist::Value::Dictionary(to_plist_dict(map))
                .to_writer_xml(&mut buf)
                .map_err(|e| e.to_string())?;
            let mut text = String::from_utf8(buf).map_err(|e| e.to_string())?;
            if !text.ends_with('\n') {
                text.push('\n');
            }
            Ok(text)
        }
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn decode_json(text: &str) -> Result<Value, String> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(from_json)
        .map_err(|e| e.to_string())
}

fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(u)) => Value::UInteger(u),
            (None, None) => Value::Float(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(map) => {
            Value::Map(map.into_iter().map(|(k, v)| (k, from_json(v))).collect())
        }
    }
}

fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::from(*i),
        Value::UInteger(u) => serde_json::Value::from(*u),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) | Value::Datetime(s) => serde_json::Value::String(s.clone()),
        Value::Bytes(bytes) => {
            serde_json::Value::Array(bytes.iter().map(|b| serde_json::Value::from(*b)).collect())
        }
        Value::Array(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Map(map) => serde_json::Value::Object(
            map.iter().map(|(k, v)| (k.clone(), to_json(v))).collect(),
        ),
    }
}

// ---------------------------------------------------------------------------
// YAML
// ---------------------------------------------------------------------------

fn decode_yaml(text: &str) -> Result<Value, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    from_yaml(value)
}

fn from_yaml(value: serde_yaml::Value) -> Result<Value, String> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(u)) => Value::UInteger(u),
            (None, None) => Value::Float(n.as_f64().unwrap_or_default()),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, from_yaml(value)?);
            }
            Value::Map(map)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value)?,
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        other => Err(format!("unsupported mapping key: {other:?}")),
    }
}

fn to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Bool(b) => serde_yaml::Value::Bool(*b),
        Value::Integer(i) => serde_yaml::Value::Number((*i).into()),
        Value::UInteger(u) => serde_yaml::Value::Number((*u).into()),
        Value::Float(f) => serde_yaml::Value::Number((*f).into()),
        Value::String(s) | Value::Datetime(s) => serde_yaml::Value::String(s.clone()),
        Value::Bytes(bytes) => serde_yaml::Value::Sequence(
            bytes
                .iter()
                .map(|b| serde_yaml::Value::Number(u64::from(*b).into()))
                .collect(),
        ),
        Value::Array(items) => serde_yaml::Value::Sequence(items.iter().map(to_yaml).collect()),
        Value::Map(map) => serde_yaml::Value::Mapping(
            map.iter()
                .map(|(k, v)| (serde_yaml::Value::String(k.clone()), to_yaml(v)))
                .collect(),
        ),
    }
}

// ---------------------------------------------------------------------------
// TOML
// ---------------------------------------------------------------------------

fn decode_toml(text: &str) -> Result<Value, String> {
    let table: toml::Table = toml::from_str(text).map_err(|e| e.to_string())?;
    Ok(Value::Map(from_toml_table(table)))
}

fn from_toml_table(table: toml::Table) -> Map {
    table.into_iter().map(|(k, v)| (k, from_toml(v))).collect()
}

fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::Datetime(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Map(from_toml_table(table)),
    }
}

/// TOML has no null: null entries are dropped rather than invented.
fn to_toml(value: &Value) -> Option<toml::Value> {
    Some(match value {
        Value::Null => return None,
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Integer(i) => toml::Value::Integer(*i),
        // TOML integers are signed 64-bit.
        Value::UInteger(u) => match i64::try_from(*u) {
            Ok(i) => toml::Value::Integer(i),
            Err(_) => toml::Value::Float(*u as f64),
        },
        Value::Float(f) => toml::Value::Float(*f),
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Datetime(s) => match s.parse::<toml::value::Datetime>() {
            Ok(dt) => toml::Value::Datetime(dt),
            Err(_) => toml::Value::String(s.clone()),
        },
        Value::Bytes(bytes) => toml::Value::Array(
            bytes
                .iter()
                .map(|b| toml::Value::Integer(i64::from(*b)))
                .collect(),
        ),
        Value::Array(items) => toml::Value::Array(items.iter().filter_map(to_toml).collect()),
        Value::Map(map) => toml::Value::Table(to_toml_table(map)),
    })
}

fn to_toml_table(map: &Map) -> toml::Table {
    map.iter()
        .filter_map(|(k, v)| to_toml(v).map(|v| (k.clone(), v)))
        .collect()
}

// ---------------------------------------------------------------------------
// Property list (XML)
// ---------------------------------------------------------------------------

fn decode_plist(bytes: &[u8]) -> Result<Value, String> {
    plist::Value::from_reader_xml(bytes)
        .map(from_plist)
        .map_err(|e| e.to_string())
}

fn from_plist(value: plist::Value) -> Value {
    match value {
        plist::Value::Array(items) => Value::Array(items.into_iter().map(from_plist).collect()),
        plist::Value::Dictionary(dict) => Value::Map(
            dict.into_iter()
                .map(|(k, v)| (k, from_plist(v)))
                .collect::<IndexMap<_, _>>(),
        ),
        plist::Value::Boolean(b) => Value::Bool(b),
        plist::Value::Data(bytes) => Value::Bytes(bytes),
        plist::Value::Date(date) => Value::Datetime(date.to_xml_format()),
        plist::Value::Real(f) => Value::Float(f),
        plist::Value::Integer(i) => match (i.as_signed(), i.as_unsigned()) {
            (Some(i), _) => Value::Integer(i),
            (None, Some(u)) => Value::UInteger(u),
            (None, None) => Value::Null,
        },
        plist::Value::String(s) => Value::String(s),
        plist::Value::Uid(uid) => Value::Integer(uid.get() as i64),
        _ => Value::Null,
    }
}

/// Property lists have no null either; null entries are dropped.
fn to_plist(value: &Value) -> Option<plist::Value> {
    Some(match value {
        Value::Null => return None,
        Value::Bool(b) => plist::Value::Boolean(*b),
        Value::Integer(i) => plist::Value::Integer((*i).into()),
        Value::UInteger(u) => plist::Value::Integer((*u).into()),
        Value::Float(f) => plist::Value::Real(*f),
        Value::String(s) => plist::Value::String(s.clone()),
        Value::Datetime(s) => match plist::Date::from_xml_format(s) {
            Ok(date) => plist::Value::Date(date),
            Err(_) => plist::Value::String(s.clone()),
        },
        Value::Bytes(bytes) => plist::Value::Data(bytes.clone()),
        Value::Array(items) => plist::Value::Array(items.iter().filter_map(to_plist).collect()),
        Value::Map(map) => plist::Value::Dictionary(to_plist_dict(map)),
    })
}

fn to_plist_dict(map: &Map) -> plist::Dictionary {
    let mut dict = plist::Dictionary::new();
    for (k, v) in map {
        if let Some(v) = to_plist(v) {
            dict.insert(k.clone(), v);
        }
    }
    dict
}
