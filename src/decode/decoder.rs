//! Response decoder
//!
//! Status check, JSON parsing and row-to-record conversion.

use super::types::ColumnDescriptor;
use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue, OutputMode, Record};
use serde::Deserialize;
use tracing::{debug, warn};

/// Decodes polled responses into records
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseDecoder {
    mode: OutputMode,
}

impl ResponseDecoder {
    /// Create a decoder for the given output mode
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    /// Decoder producing one typed record per row
    pub fn pretty() -> Self {
        Self::new(OutputMode::Pretty)
    }

    /// Decoder passing the whole body through
    pub fn raw() -> Self {
        Self::new(OutputMode::Raw)
    }

    /// Output mode this decoder was built with
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Decode a response body.
    ///
    /// A status other than 200 is logged but does not stop decoding, so
    /// whatever the body carries is still surfaced.
    pub fn decode(&self, status: u16, body: &str) -> Result<Vec<Record>> {
        if status != 200 {
            warn!(status, "unexpected status returned while polling");
        }

        let value: JsonValue = serde_json::from_str(body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))?;
        self.decode_value(value)
    }

    /// Decode an already parsed body. The body must be a JSON object.
    pub fn decode_value(&self, value: JsonValue) -> Result<Vec<Record>> {
        let results = match value {
            JsonValue::Object(results) => results,
            other => {
                return Err(Error::malformed(format!(
                    "expected a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        match self.mode {
            OutputMode::Raw => Ok(vec![results]),
            OutputMode::Pretty => decode_rows(&results),
        }
    }
}

/// Pretty conversion. A body missing either `columnHeaders` or `rows` has
/// nothing to convert and yields no records.
fn decode_rows(results: &JsonObject) -> Result<Vec<Record>> {
    let Some(columns) = column_headers(results)? else {
        return Ok(Vec::new());
    };
    debug!(
        columns = ?columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        "building records from columns"
    );

    let rows = match results.get("rows") {
        None => return Ok(Vec::new()),
        Some(JsonValue::Array(rows)) => rows,
        Some(other) => {
            return Err(Error::malformed(format!(
                "'rows' must be an array, got {}",
                json_kind(other)
            )))
        }
    };

    rows.iter()
        .enumerate()
        .map(|(index, row)| build_record(&columns, index, row))
        .collect()
}

fn column_headers(results: &JsonObject) -> Result<Option<Vec<ColumnDescriptor>>> {
    results
        .get("columnHeaders")
        .map(|headers| {
            Vec::<ColumnDescriptor>::deserialize(headers)
                .map_err(|e| Error::malformed(format!("invalid 'columnHeaders': {e}")))
        })
        .transpose()
}

/// Zip one row against the columns by position.
///
/// A row whose width differs from the column count is rejected rather than
/// truncated or padded.
fn build_record(columns: &[ColumnDescriptor], index: usize, row: &JsonValue) -> Result<Record> {
    let cells = row.as_array().ok_or_else(|| {
        Error::malformed(format!("row {index} must be an array, got {}", json_kind(row)))
    })?;

    if cells.len() != columns.len() {
        return Err(Error::malformed(format!(
            "row {index} has {} cells but {} columns are described",
            cells.len(),
            columns.len()
        )));
    }

    let mut record = Record::new();
    for (column, cell) in columns.iter().zip(cells) {
        let value = if column.is_integer() {
            integer_cell(column, index, cell)?
        } else {
            cell.clone()
        };
        record.insert(column.name.clone(), value);
    }
    Ok(record)
}

fn integer_cell(column: &ColumnDescriptor, index: usize, cell: &JsonValue) -> Result<JsonValue> {
    match cell {
        JsonValue::String(s) => parse_integer(s.trim()).map_err(|e| {
            Error::malformed(format!(
                "row {index}, column '{}': '{s}' is not an integer: {e}",
                column.name
            ))
        }),
        JsonValue::Number(n) if n.is_i64() || n.is_u64() => Ok(cell.clone()),
        other => Err(Error::malformed(format!(
            "row {index}, column '{}': expected an integer, got {}",
            column.name,
            json_kind(other)
        ))),
    }
}

/// Signed first, unsigned for values above `i64::MAX`
fn parse_integer(s: &str) -> std::result::Result<JsonValue, std::num::ParseIntError> {
    s.parse::<i64>()
        .map(JsonValue::from)
        .or_else(|_| s.parse::<u64>().map(JsonValue::from))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
