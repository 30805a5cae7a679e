use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use reshape_core::{
    convert_str, supported_formats, ConvertOptions, DecodeOptions, EncodeOptions,
};

#[derive(Parser, Debug)]
#[command(
    name = "reshape",
    about = "Convert structured data between serialization formats",
    version
)]
struct Cli {
    /// Input file path (defaults to STDIN)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file path (defaults to STDOUT)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Input format name. Omit to detect from the file extension/content.
    #[arg(short = 'f', long = "from")]
    from: Option<String>,

    /// Output format name.
    #[arg(short = 't', long = "to")]
    to: Option<String>,

    /// Structural path read from the input document ("" = whole document).
    #[arg(long = "input-path", default_value = "")]
    input_path: String,

    /// Structural path the value is placed at inside the output document.
    #[arg(long = "output-path", default_value = "")]
    output_path: String,

    /// Pretty-print JSON output.
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,

    /// Comment character for tabular and line-oriented input.
    #[arg(long)]
    comment: Option<char>,

    /// Accept tabular records whose field count differs from the header.
    #[arg(long, action = ArgAction::SetTrue)]
    flexible: bool,

    /// Raw lines dropped from the input before parsing.
    #[arg(long = "skip-lines", default_value_t = 0)]
    skip_lines: usize,

    /// Maximum number of records to read.
    #[arg(long)]
    limit: Option<usize>,

    /// Column names for tabular input without a header record.
    #[arg(long, value_delimiter = ',')]
    header: Option<Vec<String>>,

    /// Column selection and order for tabular output.
    #[arg(long, value_delimiter = ',')]
    columns: Option<Vec<String>>,

    /// Maximum number of rows to write.
    #[arg(long = "output-limit")]
    output_limit: Option<usize>,

    /// List the supported format names and exit.
    #[arg(long = "list-formats", action = ArgAction::SetTrue)]
    list_formats: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_formats {
        for name in supported_formats() {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(to) = cli.to.clone() else {
        bail!("missing --to output format (use --list-formats to see the known names)");
    };

    let mut input = String::new();
    if let Some(path) = &cli.input {
        input = fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?;
    } else {
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read from STDIN")?;
    }

    let from = cli.resolve_input_format(&input);
    let output = convert_str(&input, &cli.build_options(from, to)).context("conversion failed")?;
    cli.emit(&output)?;
    Ok(())
}

impl Cli {
    fn build_options(&self, from: String, to: String) -> ConvertOptions {
        ConvertOptions {
            input_format: from,
            output_format: to,
            input_path: self.input_path.clone(),
            output_path: self.output_path.clone(),
            base_document: None,
            decode: DecodeOptions {
                header: self.header.clone(),
                comment: self.comment,
                flexible: self.flexible,
                skip_lines: self.skip_lines,
                limit: self.limit,
            },
            encode: EncodeOptions {
                columns: self.columns.clone(),
                limit: self.output_limit,
                pretty: self.pretty,
            },
        }
    }

    fn resolve_input_format(&self, sample: &str) -> String {
        if let Some(from) = &self.from {
            return from.clone();
        }
        detect_from_path(self.input.as_deref())
            .or_else(|| detect_from_content(sample))
            .unwrap_or("json")
            .to_string()
    }

    fn emit(&self, data: &str) -> Result<()> {
        if let Some(path) = &self.output {
            fs::write(path, data)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
        } else {
            println!("{data}");
        }
        Ok(())
    }
}

fn detect_from_path(path: Option<&Path>) -> Option<&'static str> {
    let ext = path?.extension()?.to_string_lossy().to_ascii_lowercase();
    match ext.as_str() {
        "json" => Some("json"),
        "jsonl" | "ndjson" => Some("jsonl"),
        "yaml" | "yml" => Some("yaml"),
        "toml" => Some("toml"),
        "csv" => Some("csv"),
        "tsv" => Some("tsv"),
        "properties" => Some("properties"),
        _ => None,
    }
}

fn detect_from_content(sample: &str) -> Option<&'static str> {
    let trimmed = sample.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        Some("json")
    } else if trimmed.starts_with("---") || trimmed.starts_with("- ") {
        Some("yaml")
    } else {
        None
    }
}
