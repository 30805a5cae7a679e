use crate::codec::{parse_cell, stringify_cell, stringify_key, text, Format};
use crate::error::{DecodeError, EncodeError};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::value::{Mapping, Value};

/// Java-style `.properties`: `key=value` or `key: value` per line, `#`
/// comments, trailing-backslash line continuation, and `\ `/`\\` escapes.
pub(crate) fn decode(input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    let text = text(input, Format::Properties)?;
    let comment = options.comment.unwrap_or('#');
    let mut map = Mapping::new();
    let mut pending = String::new();

    for (index, raw) in text.lines().enumerate() {
        if raw.is_empty() || raw.starts_with(comment) {
            continue;
        }
        let fragment = raw.trim_start();
        if let Some(continued) = fragment.strip_suffix('\\') {
            pending.push_str(continued);
            continue;
        }
        pending.push_str(fragment);
        let line = std::mem::take(&mut pending);
        if line.trim().is_empty() {
            continue;
        }

        let separator = line.find(['=', ':']).ok_or_else(|| {
            DecodeError::with_line(
                Format::Properties,
                index + 1,
                format!("property `{line}` has no separator"),
            )
        })?;
        let name = unescape(line[..separator].trim());
        if name.is_empty() {
            return Err(DecodeError::with_line(
                Format::Properties,
                index + 1,
                "property has an empty name",
            ));
        }
        let value = unescape(line[separator + 1..].trim());
        map.insert(Value::String(name), parse_cell(&value));
    }

    Ok(Value::Mapping(map))
}

/// A mapping becomes one `key=value` line per entry in insertion order; a
/// bare scalar is emitted as its lexeme. Sequences have no properties shape.
pub(crate) fn encode(value: &Value, _options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    match value {
        Value::Mapping(map) => {
            let mut lines = Vec::with_capacity(map.len());
            for (key, entry) in map.iter() {
                let name = escape(&stringify_key(key, Format::Properties)?);
                let cell = escape(&stringify_cell(entry, Format::Properties)?);
                lines.push(format!("{name}={cell}"));
            }
            Ok(lines.join("\n").into_bytes())
        }
        Value::String(s) => Ok(s.clone().into_bytes()),
        Value::Bool(b) => Ok(b.to_string().into_bytes()),
        Value::Int(i) => Ok(i.to_string().into_bytes()),
        Value::Float(f) => Ok(f.to_string().into_bytes()),
        other => Err(EncodeError::new(
            Format::Properties,
            format!("cannot encode a top-level {}", other.type_name()),
        )),
    }
}

fn unescape(input: &str) -> String {
    input.replace("\\ ", " ").replace("\\\\", "\\")
}

fn escape(input: &str) -> String {
    input.replace('\\', "\\\\").replace(' ', "\\ ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_str(input: &str) -> Value {
        decode(input.as_bytes(), &DecodeOptions::default()).unwrap()
    }

    #[test]
    fn decodes_key_value_lines() {
        let value = decode_str("# config\nname=Ada\nport: 8080\nratio=0.5\n");
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get_str("name"), Some(&Value::from("Ada")));
        assert_eq!(map.get_str("port"), Some(&Value::Int(8080)));
        assert_eq!(map.get_str("ratio"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn unescapes_spaces_in_keys_and_values() {
        let value = decode_str("greeting\\ text=hello\\ world\n");
        let map = value.as_mapping().unwrap();
        assert_eq!(
            map.get_str("greeting text"),
            Some(&Value::from("hello world"))
        );
    }

    #[test]
    fn joins_continuation_lines() {
        let value = decode_str("key=first\\\n  second\n");
        let map = value.as_mapping().unwrap();
        assert_eq!(map.get_str("key"), Some(&Value::from("firstsecond")));
    }

    #[test]
    fn missing_separator_is_an_error() {
        let err = decode(b"not a property\n", &DecodeOptions::default()).unwrap_err();
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn empty_input_is_an_empty_mapping() {
        assert_eq!(decode_str(""), Value::Mapping(Mapping::new()));
    }

    #[test]
    fn round_trips_a_flat_mapping() {
        let original = decode_str("a=1\nb=two\\ words\nc=true\n");
        let encoded = encode(&original, &EncodeOptions::default()).unwrap();
        let again = decode(&encoded, &DecodeOptions::default()).unwrap();
        assert_eq!(original, again);
    }

    #[test]
    fn scalar_top_level_is_bare_text() {
        let out = encode(&Value::from("hello"), &EncodeOptions::default()).unwrap();
        assert_eq!(out, b"hello");
        let err = encode(&Value::Sequence(Vec::new()), &EncodeOptions::default()).unwrap_err();
        assert!(err.message.contains("sequence"));
    }
}
