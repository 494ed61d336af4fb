//! Delimited file loader.

use crate::config::DEFAULT_SEPARATOR;
use crate::error::{CleaningError, Result};
use crate::types::Table;
use polars::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// Field values read as missing, in addition to empty fields.
pub const MISSING_MARKERS: [&str; 13] = [
    "NA", "N/A", "n/a", "#N/A", "#NA", "<NA>", "NaN", "nan", "-NaN", "-nan", "null", "NULL",
    "None",
];

/// Loads a delimited file with a header row into a [`Table`].
#[derive(Debug, Clone)]
pub struct TableLoader {
    separator: u8,
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl TableLoader {
    pub fn new(separator: u8) -> Self {
        Self { separator }
    }

    /// Read and parse `path`.
    ///
    /// # Errors
    ///
    /// - [`CleaningError::DataAccess`] if the file is missing or unreadable.
    /// - [`CleaningError::Format`] if the content is not a rectangular
    ///   delimited table with a header row.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        info!("Loading data from {}", path.display());

        let bytes = fs::read(path).map_err(|e| CleaningError::data_access(path, e))?;
        let content = String::from_utf8(bytes)
            .map_err(|e| CleaningError::format(path, format!("not valid UTF-8: {}", e)))?;

        let records = scan_records(&content, self.separator)
            .map_err(|reason| CleaningError::format(path, reason))?;
        debug!("Header has {} fields", records.header.len());

        if let Some(name) = first_duplicate(&records.header) {
            return Err(CleaningError::format(
                path,
                format!("duplicate column name '{}' in header", name),
            ));
        }

        let df = self
            .parse(records.content)
            .map_err(|e| CleaningError::format(path, e.to_string()))?;

        let table = Table::from_dataframe(df);
        info!("Loaded data with shape: {:?}", table.shape());
        Ok(table)
    }

    fn parse(&self, content: String) -> PolarsResult<DataFrame> {
        let null_values = NullValues::AllColumns(
            MISSING_MARKERS.iter().map(|marker| (*marker).into()).collect(),
        );

        // Infer over every row so a late non-numeric value still makes the
        // column categorical.
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(self.separator)
                    .with_quote_char(Some(b'"'))
                    .with_missing_is_null(true)
                    .with_null_values(Some(null_values)),
            )
            .into_reader_with_file_handle(Cursor::new(content))
            .finish()
    }
}

/// Header names and the input with blank lines removed.
#[derive(Debug, PartialEq)]
struct Records {
    header: Vec<String>,
    content: String,
}

/// Verify every record has as many fields as the header and drop blank lines.
///
/// A field is quoted only when its first byte is `"`; inside it, separators
/// and newlines are data and `""` is a literal quote. A `"` elsewhere in a
/// field is an ordinary character. Errors name the first offending line
/// (1-based).
fn scan_records(content: &str, separator: u8) -> std::result::Result<Records, String> {
    let bytes = content.as_bytes();
    let mut header: Option<Vec<String>> = None;
    let mut fields: Vec<&str> = Vec::new();
    let mut kept = String::with_capacity(content.len());

    let mut in_quotes = false;
    let mut just_closed = false;
    let mut field_start = 0;
    let mut record_start = 0;
    let mut has_content = false;
    let mut line = 1;
    let mut record_line = 1;

    for (i, &b) in bytes.iter().enumerate() {
        if in_quotes {
            if b == b'"' {
                in_quotes = false;
                just_closed = true;
            } else if b == b'\n' {
                line += 1;
            }
            continue;
        }

        if b == b'"' && (i == field_start || just_closed) {
            in_quotes = true;
            just_closed = false;
            has_content = true;
            continue;
        }
        just_closed = false;

        if b == separator {
            fields.push(&content[field_start..i]);
            field_start = i + 1;
            has_content = true;
        } else if b == b'\n' {
            fields.push(&content[field_start..i]);
            if has_content {
                finish_record(&mut header, &fields, record_line)?;
                kept.push_str(&content[record_start..=i]);
            }
            fields.clear();
            line += 1;
            record_line = line;
            record_start = i + 1;
            field_start = i + 1;
            has_content = false;
        } else if b != b'\r' {
            has_content = true;
        }
    }

    if in_quotes {
        return Err(format!("unterminated quoted field starting on line {}", record_line));
    }
    if has_content {
        fields.push(&content[field_start..]);
        finish_record(&mut header, &fields, record_line)?;
        kept.push_str(&content[record_start..]);
        kept.push('\n');
    }

    match header {
        Some(header) => Ok(Records {
            header,
            content: kept,
        }),
        None => Err("file is empty, expected a header row".to_string()),
    }
}

fn finish_record(
    header: &mut Option<Vec<String>>,
    fields: &[&str],
    record_line: usize,
) -> std::result::Result<(), String> {
    match header.as_ref().map(Vec::len) {
        None => *header = Some(fields.iter().map(|f| unquote(f)).collect()),
        Some(expected) if expected != fields.len() => {
            return Err(format!(
                "line {} has {} fields, expected {}",
                record_line,
                fields.len(),
                expected
            ));
        }
        Some(_) => {}
    }
    Ok(())
}

/// Field text as the parser sees it: trailing `\r` dropped, surrounding
/// quotes removed and `""` collapsed.
fn unquote(field: &str) -> String {
    let field = field.strip_suffix('\r').unwrap_or(field);
    match field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => field.to_string(),
    }
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}
