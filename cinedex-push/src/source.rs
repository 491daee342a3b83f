//! Readers for the on-disk inputs: field definition arrays and JSONL records.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::document::{FieldDefinition, Record};
use crate::error::{PushError, Result};

/// Read a JSON array of field definitions.
pub fn read_field_definitions(path: impl AsRef<Path>) -> Result<Vec<FieldDefinition>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PushError::io(path, e))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Read one [`Record`] per non-blank line.
///
/// # Errors
///
/// Returns [`PushError::JsonLine`] naming the first line that does not parse.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PushError::io(path, e))?;

    let mut records = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| PushError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| PushError::JsonLine {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
