use crate::codec::{stringify_key, text, Format};
use crate::error::{DecodeError, EncodeError};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::value::Value;

pub(crate) fn decode(input: &[u8], _options: &DecodeOptions) -> Result<Value, DecodeError> {
    let text = text(input, Format::Json)?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let raw: serde_json::Value = serde_json::from_str(text)
        .map_err(|err| DecodeError::with_line(Format::Json, err.line(), err))?;
    Ok(from_json(raw))
}

pub(crate) fn encode(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let json = to_json(value, Format::Json)?;
    let rendered = if options.pretty {
        serde_json::to_vec_pretty(&json)
    } else {
        serde_json::to_vec(&json)
    };
    rendered.map_err(|err| EncodeError::new(Format::Json, err))
}

/// serde_json tree into the universal model. Integers stay `Int` as long as
/// they fit an `i64`; everything else numeric becomes `Float`.
pub(crate) fn from_json(raw: serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(number.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| (Value::String(key), from_json(value)))
                .collect(),
        ),
    }
}

/// Universal model into a serde_json tree. Non-string mapping keys are
/// stringified deterministically; non-finite floats have no JSON lexeme and
/// fail.
pub(crate) fn to_json(value: &Value, format: Format) -> Result<serde_json::Value, EncodeError> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Int(i) => Ok(serde_json::Value::Number((*i).into())),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| {
                EncodeError::new(format, format!("cannot represent non-finite number {f}"))
            }),
        Value::String(s) => Ok(serde_json::Value::String(s.clone())),
        Value::Sequence(items) => Ok(serde_json::Value::Array(
            items
                .iter()
                .map(|item| to_json(item, format))
                .collect::<Result<_, _>>()?,
        )),
        Value::Mapping(map) => {
            let mut object = serde_json::Map::with_capacity(map.len());
            for (key, entry) in map.iter() {
                object.insert(stringify_key(key, format)?, to_json(entry, format)?);
            }
            Ok(serde_json::Value::Object(object))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Mapping;

    fn decode_str(input: &str) -> Value {
        decode(input.as_bytes(), &DecodeOptions::default()).unwrap()
    }

    #[test]
    fn preserves_integer_float_distinction() {
        let value = decode_str(r#"{"int": 3, "float": 3.0}"#);
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get_str("int"), Some(&Value::Int(3)));
        assert_eq!(map.get_str("float"), Some(&Value::Float(3.0)));
    }

    #[test]
    fn preserves_object_key_order() {
        let value = decode_str(r#"{"z": 1, "a": 2, "m": 3}"#);
        let keys: Vec<_> = value
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn empty_input_decodes_to_null() {
        assert_eq!(decode_str("  \n"), Value::Null);
    }

    #[test]
    fn malformed_input_reports_line() {
        let err = decode(b"{\n  \"a\": ,\n}", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.format, Format::Json);
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn non_string_keys_are_stringified() {
        let value = Value::Mapping(Mapping::from_iter([
            (Value::Int(1), Value::from("one")),
            (Value::Bool(true), Value::from("yes")),
        ]));
        let out = encode(&value, &EncodeOptions::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{"1":"one","true":"yes"}"#
        );
    }

    #[test]
    fn non_finite_floats_fail() {
        let value = Value::Float(f64::NAN);
        assert!(encode(&value, &EncodeOptions::default()).is_err());
    }

    #[test]
    fn round_trips_through_decode() {
        let original = decode_str(r#"{"a":"b","c":["d",2,null],"n":1.25}"#);
        let encoded = encode(&original, &EncodeOptions::default()).unwrap();
        let again = decode(&encoded, &DecodeOptions::default()).unwrap();
        assert_eq!(original, again);
    }
}
