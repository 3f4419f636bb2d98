//! CSV ingest and normalization.
//!
//! This module turns a row-oriented station CSV into a clean `TimeSeries`.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Fail fast** on malformed rows, with 1-based line numbers
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no climatology/trend logic here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Attributes, Sample, TimeSeries};
use crate::error::ClimError;

/// Fixed historical window applied to CSV-sourced data (inclusive).
pub const CSV_WINDOW: (&str, &str) = ("1922-01-01", "2021-12-31");

/// Load a station CSV with `time` and `t` columns (values already in °C).
///
/// Output is restricted to the fixed historical window; values pass through
/// unchanged.
pub fn load_csv(path: &Path) -> Result<TimeSeries, ClimError> {
    let file = File::open(path)
        .map_err(|e| ClimError::Io(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| ClimError::Parse(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    let time_idx = *header_map
        .get("time")
        .ok_or_else(|| ClimError::Schema("Missing required column: `time`".to_string()))?;
    let t_idx = *header_map
        .get("t")
        .ok_or_else(|| ClimError::Schema("Missing required column: `t`".to_string()))?;

    let window_start = parse_date(CSV_WINDOW.0).map_err(ClimError::Parse)?;
    let window_end = parse_date(CSV_WINDOW.1).map_err(ClimError::Parse)?;

    let mut samples = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;

        let record =
            result.map_err(|e| ClimError::Parse(format!("CSV parse error at line {line}: {e}")))?;

        let sample = parse_row(&record, time_idx, t_idx)
            .map_err(|msg| ClimError::Parse(format!("Line {line}: {msg}")))?;

        if sample.date < window_start || sample.date > window_end {
            continue;
        }
        samples.push(sample);
    }

    let mut attrs = Attributes::new();
    attrs.insert("unit".to_string(), "°C".to_string());
    attrs.insert(
        "source".to_string(),
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
    );

    TimeSeries::new(samples, attrs)
}

fn parse_row(record: &StringRecord, time_idx: usize, t_idx: usize) -> Result<Sample, String> {
    let time = record
        .get(time_idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing required value: `time`".to_string())?;
    let t = record
        .get(t_idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing required value: `t`".to_string())?;

    let date = parse_date(time)?;
    let value = t
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid temperature value '{t}'."))?;

    Ok(Sample::new(date, value))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿time"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // We recommend ISO dates (`YYYY-MM-DD`), but station exports sometimes
    // use `DD.MM.YYYY` or slashed variants. We accept a small set of common
    // formats to reduce friction while keeping parsing deterministic.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD.MM.YYYY, DD/MM/YYYY, YYYY/MM/DD."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("clim-trends-{}-{name}", std::process::id()));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_time_and_t_columns() {
        let path = write_temp_csv(
            "basic.csv",
            "time,t\n2000-01-01,1.5\n2000-02-01,2.5\n",
        );
        let ts = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ts.len(), 2);
        assert_eq!(ts.samples()[0].value, 1.5);
        assert_eq!(ts.attrs().get("unit").map(String::as_str), Some("°C"));
    }

    #[test]
    fn restricts_to_historical_window() {
        let path = write_temp_csv(
            "window.csv",
            "time,t\n1900-01-01,0.0\n1950-01-01,1.0\n2023-01-01,2.0\n",
        );
        let ts = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ts.len(), 1);
        assert_eq!(ts.samples()[0].value, 1.0);
    }

    #[test]
    fn missing_t_column_is_a_schema_error() {
        let path = write_temp_csv("noschema.csv", "time,temperature\n2000-01-01,1.0\n");
        let err = load_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, ClimError::Schema(_)));
        assert!(err.to_string().contains("`t`"));
    }

    #[test]
    fn malformed_date_is_a_parse_error_with_line_number() {
        let path = write_temp_csv(
            "baddate.csv",
            "time,t\n2000-01-01,1.0\nnot-a-date,2.0\n",
        );
        let err = load_csv(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, ClimError::Parse(_)));
        assert!(err.to_string().contains("line 3") || err.to_string().contains("Line 3"));
    }

    #[test]
    fn extra_columns_and_bom_are_tolerated() {
        let path = write_temp_csv(
            "bom.csv",
            "\u{feff}time,station,t\n2000-01-01,wien,1.0\n",
        );
        let ts = load_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ts.len(), 1);
    }

    #[test]
    fn accepts_dotted_date_format() {
        assert_eq!(
            parse_date("15.06.2000").unwrap(),
            NaiveDate::from_ymd_opt(2000, 6, 15).unwrap()
        );
    }
}
