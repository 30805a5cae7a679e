mod json;
mod jsonl;
mod properties;
mod tabular;
mod toml;
mod yaml;

use std::fmt;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::error::{DecodeError, EncodeError};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::value::Value;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Json,
    Jsonl,
    Yaml,
    Toml,
    Csv,
    Tsv,
    Properties,
}

impl Format {
    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Jsonl => "jsonl",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::Properties => "properties",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type DecodeFn = fn(&[u8], &DecodeOptions) -> Result<Value, DecodeError>;
pub type EncodeFn = fn(&Value, &EncodeOptions) -> Result<Vec<u8>, EncodeError>;

/// A matched decoder/encoder pair for one format.
pub struct Codec {
    pub format: Format,
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

/// Process-wide registry, populated once on first access and read-only
/// afterwards; concurrent lookups need no locking. `yml` aliases `yaml`.
static REGISTRY: Lazy<IndexMap<&'static str, Codec>> = Lazy::new(|| {
    IndexMap::from([
        (
            "json",
            Codec {
                format: Format::Json,
                decode: json::decode,
                encode: json::encode,
            },
        ),
        (
            "jsonl",
            Codec {
                format: Format::Jsonl,
                decode: jsonl::decode,
                encode: jsonl::encode,
            },
        ),
        (
            "yaml",
            Codec {
                format: Format::Yaml,
                decode: yaml::decode,
                encode: yaml::encode,
            },
        ),
        (
            "yml",
            Codec {
                format: Format::Yaml,
                decode: yaml::decode,
                encode: yaml::encode,
            },
        ),
        (
            "toml",
            Codec {
                format: Format::Toml,
                decode: toml::decode,
                encode: toml::encode,
            },
        ),
        (
            "csv",
            Codec {
                format: Format::Csv,
                decode: tabular::decode_csv,
                encode: tabular::encode_csv,
            },
        ),
        (
            "tsv",
            Codec {
                format: Format::Tsv,
                decode: tabular::decode_tsv,
                encode: tabular::encode_tsv,
            },
        ),
        (
            "properties",
            Codec {
                format: Format::Properties,
                decode: properties::decode,
                encode: properties::encode,
            },
        ),
    ])
});

/// Case-insensitive registry lookup.
pub fn lookup(name: &str) -> Option<&'static Codec> {
    REGISTRY.get(name.to_ascii_lowercase().as_str())
}

/// Registered format names in registration order.
pub fn supported_formats() -> Vec<&'static str> {
    REGISTRY.keys().copied().collect()
}

/// UTF-8 view of decoder input.
pub(crate) fn text(input: &[u8], format: Format) -> Result<&str, DecodeError> {
    std::str::from_utf8(input)
        .map_err(|err| DecodeError::new(format, format!("input is not valid utf-8: {err}")))
}

/// Deterministic string form of a mapping key for targets that only support
/// string keys. Scalars render as their lexeme; container keys render as
/// compact JSON.
pub(crate) fn stringify_key(key: &Value, format: Format) -> Result<String, EncodeError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok("null".to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Sequence(_) | Value::Mapping(_) => {
            let json = json::to_json(key, format)?;
            serde_json::to_string(&json)
                .map_err(|err| EncodeError::new(format, format!("cannot stringify key: {err}")))
        }
    }
}

/// Single-cell rendering for tabular and properties output. Nested containers
/// are stringified as compact JSON, which is the documented lossy coercion
/// for formats without nesting.
pub(crate) fn stringify_cell(value: &Value, format: Format) -> Result<String, EncodeError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Int(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::String(s) => Ok(s.clone()),
        Value::Sequence(_) | Value::Mapping(_) => {
            let json = json::to_json(value, format)?;
            serde_json::to_string(&json)
                .map_err(|err| EncodeError::new(format, format!("cannot stringify cell: {err}")))
        }
    }
}

/// Typed coercion for cells of untyped formats: booleans, integers, floats
/// and `null` keep their lexical meaning, everything else stays a string.
pub(crate) fn parse_cell(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::String(String::new());
    }
    match serde_json::from_str::<serde_json::Value>(cell) {
        Ok(serde_json::Value::Bool(b)) => Value::Bool(b),
        Ok(serde_json::Value::Number(number)) => match number.as_i64() {
            Some(i) => Value::Int(i),
            None => number.as_f64().map(Value::Float).unwrap_or_else(|| {
                Value::String(cell.to_string())
            }),
        },
        Ok(serde_json::Value::Null) => Value::Null,
        _ => Value::String(cell.to_string()),
    }
}
