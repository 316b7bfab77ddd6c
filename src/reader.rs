// Table decoding for uploaded files

use serde_json::Value;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::data::{Cell, Row, Table};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unsupported file type '{0}': only .csv and .json files can be read")]
    UnsupportedFormat(String),
    #[error("Error parsing CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Error parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid table data: {0}")]
    InvalidData(String),
    #[error("Error reading file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceFormat {
    Csv,
    Json,
}

impl SourceFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, SourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "json" => Ok(SourceFormat::Json),
            _ => Err(SourceError::UnsupportedFormat(ext)),
        }
    }
}

/// Read a whole table from a file on disk.
pub fn read_path(path: &Path) -> Result<Table, SourceError> {
    let format = SourceFormat::from_path(path)?;
    let file = std::fs::File::open(path)?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    read_table(file, format, label)
}

pub fn read_table<R: Read>(
    mut reader: R,
    format: SourceFormat,
    label: impl Into<String>,
) -> Result<Table, SourceError> {
    match format {
        SourceFormat::Csv => read_csv(reader, label),
        SourceFormat::Json => {
            let mut text = String::new();
            reader.read_to_string(&mut text)?;
            let value: Value = serde_json::from_str(&text)?;
            table_from_json(&value, label)
        }
    }
}

/// Read CSV with a header row. Every field is kept as text.
pub fn read_csv<R: Read>(reader: R, label: impl Into<String>) -> Result<Table, SourceError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();

    let mut records = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            log::warn!(
                "row {} has {} fields but the header has {}; extra fields ignored",
                line + 1,
                record.len(),
                headers.len()
            );
        }
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table::from_records(headers, records, label))
}

/// Build a table from a JSON array of flat objects.
///
/// Columns come from the keys of the first object, in document order.
pub fn table_from_json(value: &Value, label: impl Into<String>) -> Result<Table, SourceError> {
    let array = value
        .as_array()
        .ok_or_else(|| invalid("input must be a JSON array of objects"))?;

    let columns: Vec<String> = match array.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        Some(_) => return Err(invalid("items in array must be objects")),
        None => Vec::new(),
    };

    let mut rows = Vec::with_capacity(array.len());
    for item in array {
        let obj = item
            .as_object()
            .ok_or_else(|| invalid("items in array must be objects"))?;

        let mut row = Row::with_capacity(obj.len());
        for (key, val) in obj {
            let cell = match val {
                Value::Null => Cell::Null,
                Value::Bool(b) => Cell::Bool(*b),
                Value::Number(n) => Cell::Number(n.as_f64().unwrap_or(f64::NAN)),
                Value::String(s) => Cell::Text(s.clone()),
                _ => {
                    return Err(SourceError::InvalidData(format!(
                        "unsupported value type for field '{}'",
                        key
                    )))
                }
            };
            row.insert(key.clone(), cell);
        }
        rows.push(row);
    }

    Ok(Table::new(columns, rows, label))
}

fn invalid(msg: &str) -> SourceError {
    SourceError::InvalidData(msg.to_string())
}
