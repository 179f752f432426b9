//! File input/output for the command-line workflows.
//!
//! Scraped readings are appended to CSV; measurements for training and
//! prediction are read back from CSV or JSON.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::types::{MeasurementRow, Reading};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends readings as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_readings(path: &Path, readings: &[Reading]) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, rows = readings.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for reading in readings {
        writer.serialize(reading)?;
    }
    writer.flush()?;

    Ok(())
}

/// Reads time-ordered measurements from `path`.
///
/// `.json` files hold an array of rows (or a `{"measurements_payload": [...]}`
/// request body); anything else is parsed as CSV with a header line.
pub fn load_measurements(path: &Path) -> Result<Vec<MeasurementRow>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        let rows = match value {
            serde_json::Value::Object(mut obj) => obj
                .remove("measurements_payload")
                .context("JSON object has no measurements_payload")?,
            other => other,
        };
        return Ok(serde_json::from_value(rows)?);
    }

    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: MeasurementRow = result?;
        rows.push(record);
    }
    Ok(rows)
}
