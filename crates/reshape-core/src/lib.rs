mod codec;
mod error;
mod options;
pub mod path;
mod value;

use std::io::Read;

pub use crate::codec::{lookup, supported_formats, Codec, Format};
pub use crate::error::{ConvertError, DecodeError, EncodeError, PathError};
pub use crate::options::{ConvertOptions, DecodeOptions, EncodeOptions};
pub use crate::path::Path;
pub use crate::value::{Mapping, Value};

/// Build/version identifier of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Decode `input` under the named format.
pub fn decode_bytes(
    input: &[u8],
    format: &str,
    options: &DecodeOptions,
) -> Result<Value, ConvertError> {
    let codec = resolve(format)?;
    Ok((codec.decode)(input, options)?)
}

/// Decode a string under the named format.
pub fn decode_str(input: &str, format: &str, options: &DecodeOptions) -> Result<Value, ConvertError> {
    decode_bytes(input.as_bytes(), format, options)
}

/// Encode `value` under the named format.
pub fn encode_bytes(
    value: &Value,
    format: &str,
    options: &EncodeOptions,
) -> Result<Vec<u8>, ConvertError> {
    let codec = resolve(format)?;
    Ok((codec.encode)(value, options)?)
}

/// Encode `value` under the named format as a string.
pub fn encode_string(
    value: &Value,
    format: &str,
    options: &EncodeOptions,
) -> Result<String, ConvertError> {
    let codec = resolve(format)?;
    let bytes = (codec.encode)(value, options)?;
    String::from_utf8(bytes).map_err(|_| {
        ConvertError::Encode(EncodeError {
            format: codec.format,
            message: "produced non-utf-8 output".to_string(),
        })
    })
}

/// Convert `input` from one format to another, optionally scoping the read to
/// `input_path` and grafting the result into a base document at
/// `output_path`.
///
/// Purely functional over its inputs: identical inputs give identical output
/// or the identical error, and concurrent calls are safe.
pub fn convert_bytes(input: &[u8], options: &ConvertOptions) -> Result<Vec<u8>, ConvertError> {
    let document = transform(input, options)?;
    encode_bytes(&document, &options.output_format, &options.encode)
}

/// String-in, string-out variant of [`convert_bytes`].
pub fn convert_str(input: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    let document = transform(input.as_bytes(), options)?;
    encode_string(&document, &options.output_format, &options.encode)
}

/// Convert readable input; the only entry point that touches I/O.
pub fn convert_reader<R: Read>(
    mut reader: R,
    options: &ConvertOptions,
) -> Result<Vec<u8>, ConvertError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    convert_bytes(&buf, options)
}

/// Decode, extract, and place; everything in a conversion except the final
/// encode.
fn transform(input: &[u8], options: &ConvertOptions) -> Result<Value, ConvertError> {
    let decoded = decode_bytes(input, &options.input_format, &options.decode)?;
    log::debug!(
        "decoded {} input into a {}",
        options.input_format,
        decoded.type_name()
    );

    let input_path = Path::parse(&options.input_path);
    let extracted = if input_path.is_empty() {
        decoded
    } else {
        path::extract(&decoded, &input_path)?.clone()
    };

    let output_path = Path::parse(&options.output_path);
    if output_path.is_empty() {
        return Ok(extracted);
    }

    let mut base = options
        .base_document
        .clone()
        .unwrap_or_else(|| Value::Mapping(Mapping::new()));
    path::place(&mut base, &output_path, extracted)?;
    log::debug!("placed extracted value at {output_path}");
    Ok(base)
}

fn resolve(format: &str) -> Result<&'static Codec, ConvertError> {
    codec::lookup(format).ok_or_else(|| ConvertError::UnsupportedFormat {
        name: format.to_string(),
    })
}
