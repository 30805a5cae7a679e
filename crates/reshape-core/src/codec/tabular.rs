use csv::{ReaderBuilder, Trim, WriterBuilder};

use crate::codec::{parse_cell, stringify_cell, stringify_key, text, Format};
use crate::error::{DecodeError, EncodeError};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::value::{Mapping, Value};

pub(crate) fn decode_csv(input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    decode(input, options, Format::Csv)
}

pub(crate) fn decode_tsv(input: &[u8], options: &DecodeOptions) -> Result<Value, DecodeError> {
    decode(input, options, Format::Tsv)
}

pub(crate) fn encode_csv(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    encode(value, options, Format::Csv)
}

pub(crate) fn encode_tsv(value: &Value, options: &EncodeOptions) -> Result<Vec<u8>, EncodeError> {
    encode(value, options, Format::Tsv)
}

fn delimiter(format: Format) -> u8 {
    match format {
        Format::Tsv => b'\t',
        _ => b',',
    }
}

/// First record (or `options.header`) names the columns; every following
/// record becomes a mapping of column name to coerced cell value, collected
/// into a top-level sequence.
fn decode(input: &[u8], options: &DecodeOptions, format: Format) -> Result<Value, DecodeError> {
    let mut text = text(input, format)?;
    for _ in 0..options.skip_lines {
        text = match text.split_once('\n') {
            Some((_, rest)) => rest,
            None => "",
        };
    }
    if text.trim().is_empty() {
        return Err(DecodeError::new(
            format,
            "empty input: tabular formats require a header record",
        ));
    }

    let comment = match options.comment {
        Some(c) if !c.is_ascii() => {
            return Err(DecodeError::new(
                format,
                format!("comment character `{c}` must be ascii"),
            ))
        }
        Some(c) => Some(c as u8),
        None => None,
    };

    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(delimiter(format))
        .trim(Trim::All)
        .flexible(options.flexible)
        .comment(comment)
        .has_headers(options.header.is_none());
    let mut reader = builder.from_reader(text.as_bytes());

    let columns: Vec<String> = match &options.header {
        Some(header) => header.clone(),
        None => reader
            .headers()
            .map_err(|err| DecodeError::new(format, err))?
            .iter()
            .map(str::to_string)
            .collect(),
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        if let Some(limit) = options.limit {
            if rows.len() >= limit {
                break;
            }
        }
        let record = record.map_err(|err| DecodeError::new(format, err))?;
        let mut row = Mapping::with_capacity(columns.len());
        for (index, column) in columns.iter().enumerate() {
            let cell = record.get(index).unwrap_or_default();
            row.insert(Value::String(column.clone()), parse_cell(cell));
        }
        rows.push(Value::Mapping(row));
    }

    Ok(Value::Sequence(rows))
}

/// A sequence of mappings becomes header plus one record per row. Columns
/// come from the options or the first row; cells missing from a row are
/// empty; nesting is stringified.
fn encode(value: &Value, options: &EncodeOptions, format: Format) -> Result<Vec<u8>, EncodeError> {
    let rows = value.as_sequence().ok_or_else(|| {
        EncodeError::new(
            format,
            format!(
                "top-level value must be a sequence of rows, found {}",
                value.type_name()
            ),
        )
    })?;

    let columns: Vec<String> = match (&options.columns, rows.first()) {
        (Some(columns), _) => columns.clone(),
        (None, Some(first)) => {
            let row = first.as_mapping().ok_or_else(|| row_error(format, first))?;
            row.keys()
                .map(|key| stringify_key(key, format))
                .collect::<Result<_, _>>()?
        }
        (None, None) => return Ok(Vec::new()),
    };

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter(format))
        .from_writer(Vec::new());
    writer
        .write_record(&columns)
        .map_err(|err| EncodeError::new(format, err))?;

    let limit = options.limit.unwrap_or(usize::MAX);
    for row in rows.iter().take(limit) {
        let row = row.as_mapping().ok_or_else(|| row_error(format, row))?;
        let mut cells = Vec::with_capacity(columns.len());
        for column in &columns {
            let cell = match row.get_str(column) {
                Some(value) => stringify_cell(value, format)?,
                None => String::new(),
            };
            cells.push(cell);
        }
        writer
            .write_record(&cells)
            .map_err(|err| EncodeError::new(format, err))?;
    }

    writer
        .into_inner()
        .map_err(|err| EncodeError::new(format, err.error()))
}

fn row_error(format: Format, row: &Value) -> EncodeError {
    EncodeError::new(
        format,
        format!("row is not a mapping, found {}", row.type_name()),
    )
}
