use crate::codec::{text, Format};
use crate::error::{DecodeError, EncodeError};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::value::{Mapping, Value};

/// YAML is the one supported format whose mappings may be keyed by arbitrary
/// values; those keys are carried through untouched.
pub(crate) fn decode(input: &[u8], _options: &DecodeOptions) -> Result<Value, DecodeError> {
    let text = text(input, Format::Yaml)?;
    let raw: serde_yaml::Value = serde_yaml::from_str(text).map_err(|err| match err.location() {
        Some(location) => DecodeError::with_line(Format::Yaml, location.line(), &err),
        None => DecodeError::new(Format::Yaml, &err),
    })?;
    Ok(from_yaml(raw))
}

pub(crate) fn encode(value: &Value, _options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let rendered =
        serde_yaml::to_string(value).map_err(|err| EncodeError::new(Format::Yaml, err))?;
    Ok(rendered.into_bytes())
}

fn from_yaml(raw: serde_yaml::Value) -> Value {
    match raw {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(number) => match number.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(number.as_f64().unwrap_or_default()),
        },
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Sequence(items.into_iter().map(from_yaml).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let mut mapping = Mapping::with_capacity(map.len());
            for (key, value) in map {
                mapping.insert(from_yaml(key), from_yaml(value));
            }
            Value::Mapping(mapping)
        }
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}
