use crate::codec::{stringify_key, text, Format};
use crate::error::{DecodeError, EncodeError};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::value::{Mapping, Value};

pub(crate) fn decode(input: &[u8], _options: &DecodeOptions) -> Result<Value, DecodeError> {
    let text = text(input, Format::Toml)?;
    let raw: toml::Value = text
        .parse()
        .map_err(|err: toml::de::Error| DecodeError::new(Format::Toml, err.message()))?;
    Ok(from_toml(raw))
}

/// A TOML document is a table, so anything but a mapping at the top level is
/// unrepresentable, as is `Null` anywhere in the tree.
pub(crate) fn encode(value: &Value, _options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    if !value.is_mapping() {
        return Err(EncodeError::new(
            Format::Toml,
            format!("top-level value must be a mapping, found {}", value.type_name()),
        ));
    }
    let table = to_toml(value)?;
    let rendered = toml::to_string(&table).map_err(|err| EncodeError::new(Format::Toml, err))?;
    Ok(rendered.into_bytes())
}

fn from_toml(raw: toml::Value) -> Value {
    match raw {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Int(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(key, value)| (Value::String(key), from_toml(value)))
                .collect(),
        ),
    }
}

fn to_toml(value: &Value) -> Result<toml::Value, EncodeError> {
    match value {
        Value::Null => Err(EncodeError::new(
            Format::Toml,
            "null is not representable in toml",
        )),
        Value::Bool(b) => Ok(toml::Value::Boolean(*b)),
        Value::Int(i) => Ok(toml::Value::Integer(*i)),
        Value::Float(f) => Ok(toml::Value::Float(*f)),
        Value::String(s) => Ok(toml::Value::String(s.clone())),
        Value::Sequence(items) => Ok(toml::Value::Array(
            items.iter().map(to_toml).collect::<Result<_, _>>()?,
        )),
        Value::Mapping(map) => {
            let mut table = toml::map::Map::with_capacity(map.len());
            for (key, entry) in map.iter() {
                table.insert(stringify_key(key, Format::Toml)?, to_toml(entry)?);
            }
            Ok(toml::Value::Table(table))
        }
    }
}
