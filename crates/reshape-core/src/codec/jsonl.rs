use crate::codec::{json, text, Format};
use crate::error::{DecodeError, EncodeError};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::value::Value;

/// One JSON document per line. Blank lines and comment-prefixed lines are
/// skipped; the result is always a top-level sequence.
pub(crate) fn decode(input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    let text = text(input, Format::Jsonl)?;
    let mut records = Vec::new();
    for (index, raw) in text.lines().enumerate().skip(options.skip_lines) {
        if let Some(limit) = options.limit {
            if records.len() >= limit {
                break;
            }
        }
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = options.comment {
            if line.starts_with(comment) {
                continue;
            }
        }
        let raw_value: serde_json::Value = serde_json::from_str(line)
            .map_err(|err| DecodeError::with_line(Format::Jsonl, index + 1, err))?;
        records.push(json::from_json(raw_value));
    }
    Ok(Value::Sequence(records))
}

/// Sequence in, one compact JSON line per element out.
pub(crate) fn encode(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    let items = value.as_sequence().ok_or_else(|| {
        EncodeError::new(
            Format::Jsonl,
            format!("top-level value must be a sequence, found {}", value.type_name()),
        )
    })?;
    let limit = options.limit.unwrap_or(usize::MAX);
    let mut lines = Vec::with_capacity(items.len().min(limit));
    for item in items.iter().take(limit) {
        let json = json::to_json(item, Format::Jsonl)?;
        let line = serde_json::to_string(&json)
            .map_err(|err| EncodeError::new(Format::Jsonl, err))?;
        lines.push(line);
    }
    Ok(lines.join("\n").into_bytes())
}
