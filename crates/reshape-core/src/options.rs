use crate::value::Value;

/// Knobs consumed by decoders. Formats ignore the fields that do not apply to
/// them (`header`/`flexible` are tabular-only, `comment`/`skip_lines`/`limit`
/// cover the line-oriented formats as well).
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    /// Column names for tabular input that carries no header record.
    pub header: Option<Vec<String>>,
    /// Comment character; lines starting with it are skipped. Tabular decoding
    /// requires it to be ASCII. Properties defaults to `#` when unset.
    pub comment: Option<char>,
    /// Accept tabular records whose field count differs from the header.
    pub flexible: bool,
    /// Raw lines dropped from the input before parsing.
    pub skip_lines: usize,
    /// Maximum number of records to decode.
    pub limit: Option<usize>,
}

/// Knobs consumed by encoders.
#[derive(Clone, Debug, Default)]
pub struct EncodeOptions {
    /// Column selection and order for tabular output; defaults to the keys of
    /// the first row.
    pub columns: Option<Vec<String>>,
    /// Maximum number of rows to emit.
    pub limit: Option<usize>,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

/// Full description of one conversion.
///
/// `input_path`/`output_path` are structural addresses into the document
/// (see [`crate::path::Path`]), never filesystem paths; the empty string means
/// the whole document. When `output_path` is non-empty the extracted value is
/// placed into `base_document`, or into a fresh empty mapping when no base is
/// supplied.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    pub input_format: String,
    pub output_format: String,
    pub input_path: String,
    pub output_path: String,
    pub base_document: Option<Value>,
    pub decode: DecodeOptions,
    pub encode: EncodeOptions,
}

impl ConvertOptions {
    pub fn new(input_format: impl Into<String>, output_format: impl Into<String>) -> Self {
        Self {
            input_format: input_format.into(),
            output_format: output_format.into(),
            input_path: String::new(),
            output_path: String::new(),
            base_document: None,
            decode: DecodeOptions::default(),
            encode: EncodeOptions::default(),
        }
    }
}
