//! Reads the rental dataset from a delimited file.
//!
//! The whole file is validated before anything is returned: a missing column,
//! an unparseable timestamp or a malformed cell fails the load outright.

use crate::error::{LoadError, SchemaError};
use crate::types::RentalRecord;
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Columns that must be present in the header row, in the order they are
/// reported when missing.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "datetime",
    "season",
    "weather",
    "holiday",
    "workingday",
    "temp",
    "atemp",
    "count",
];

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// A row as it appears in the file, before the timestamp is parsed.
#[derive(Debug, Deserialize)]
struct RawRow {
    datetime: String,
    season: i64,
    weather: i64,
    holiday: u8,
    workingday: u8,
    temp: f64,
    atemp: f64,
    count: u64,
}

/// Loads every record from `path`. Paths ending in `.gz` are decompressed on
/// the fly.
///
/// # Errors
///
/// [`LoadError::DataSourceMissing`] if nothing exists at `path`, and
/// [`LoadError::Schema`] if the contents do not match the expected layout.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Vec<RentalRecord>, LoadError> {
    if !path.exists() {
        return Err(LoadError::DataSourceMissing {
            path: path.to_path_buf(),
        });
    }

    let file = BufReader::new(File::open(path)?);
    let gzipped = path.extension().and_then(|e| e.to_str()) == Some("gz");
    debug!(gzipped, "Opening data file");

    let records = if gzipped {
        load_from_reader(GzDecoder::new(file))?
    } else {
        load_from_reader(file)?
    };

    info!(rows = records.len(), "Dataset loaded");
    Ok(records)
}

/// Parses CSV text from any reader. The first row must be a header.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<RentalRecord>, LoadError> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = rdr.headers()?.clone();
    check_columns(&headers)?;

    let mut records = Vec::new();
    let mut row = StringRecord::new();

    while rdr.read_record(&mut row)? {
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let raw: RawRow = row
            .deserialize(Some(&headers))
            .map_err(|e| SchemaError::MalformedRow {
                line,
                reason: e.to_string(),
            })?;

        let datetime =
            parse_timestamp(&raw.datetime).ok_or_else(|| SchemaError::InvalidTimestamp {
                line,
                value: raw.datetime.clone(),
            })?;

        records.push(RentalRecord {
            datetime,
            season: raw.season,
            weather: raw.weather,
            holiday: raw.holiday,
            workingday: raw.workingday,
            temp: raw.temp,
            atemp: raw.atemp,
            count: raw.count,
        });
    }

    Ok(records)
}

fn check_columns(headers: &StringRecord) -> Result<(), SchemaError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns { missing })
    }
}

/// Parses `YYYY-MM-DD HH:MM:SS` and its common variants. A bare date is taken
/// as midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
