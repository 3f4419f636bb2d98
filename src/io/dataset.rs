//! Read/write dataset JSON files.
//!
//! Dataset JSON is the "portable" representation of a pipeline product:
//! - the (yearly) series values with their time axis
//! - all accumulated metadata attributes
//! - optionally the fitted trend with `p` / `p_err`
//!
//! The schema is defined by `DatasetFile`.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Attributes, Sample, TimeSeries, TrendResult};
use crate::error::ClimError;

/// Canonical extension of the dataset format.
pub const DATASET_EXTENSION: &str = "json";

/// On-disk schema of a saved dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub tool: String,
    pub time: Vec<NaiveDate>,
    pub t: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_err: Option<[f64; 2]>,
    pub attrs: Attributes,
}

impl DatasetFile {
    /// Assemble a dataset from a series and an optional trend fit.
    ///
    /// The top-level `unit` attribute is set to `"°C"` at save time,
    /// overwriting any prior unit.
    pub fn from_series(series: &TimeSeries, trend: Option<&TrendResult>) -> Self {
        let mut attrs = match trend {
            Some(t) => t.attrs.clone(),
            None => series.attrs().clone(),
        };
        attrs.insert("unit".to_string(), "°C".to_string());

        Self {
            tool: "climt".to_string(),
            time: series.dates(),
            t: series.values(),
            trend: trend.map(|t| t.trend.clone()),
            p: trend.map(|t| t.p),
            p_err: trend.map(|t| t.p_err),
            attrs,
        }
    }

    /// Rebuild the stored series (values + attributes).
    pub fn to_series(&self) -> Result<TimeSeries, ClimError> {
        if self.time.len() != self.t.len() {
            return Err(ClimError::Schema(format!(
                "Dataset has {} time stamps but {} values.",
                self.time.len(),
                self.t.len()
            )));
        }
        let samples = self
            .time
            .iter()
            .zip(self.t.iter())
            .map(|(&date, &value)| Sample::new(date, value))
            .collect();
        TimeSeries::new(samples, self.attrs.clone())
    }
}

/// Write a dataset JSON file.
///
/// `path` must carry the canonical `.json` extension. No partial-write
/// recovery; a failed write surfaces as `ClimError::Io`.
pub fn save_dataset(dataset: &DatasetFile, path: &Path) -> Result<(), ClimError> {
    ensure_dataset_extension(path)?;

    let file = File::create(path).map_err(|e| {
        ClimError::Io(format!("Failed to create dataset '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, dataset)
        .map_err(|e| ClimError::Io(format!("Failed to write dataset '{}': {e}", path.display())))?;

    Ok(())
}

/// Read a dataset JSON file.
pub fn load_dataset(path: &Path) -> Result<DatasetFile, ClimError> {
    let file = File::open(path)
        .map_err(|e| ClimError::Io(format!("Failed to open dataset '{}': {e}", path.display())))?;
    let dataset: DatasetFile = serde_json::from_reader(file)
        .map_err(|e| ClimError::Parse(format!("Invalid dataset '{}': {e}", path.display())))?;
    Ok(dataset)
}

fn ensure_dataset_extension(path: &Path) -> Result<(), ClimError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(DATASET_EXTENSION) => Ok(()),
        _ => Err(ClimError::Schema(format!(
            "Dataset file '{}' must end with .{DATASET_EXTENSION}.",
            path.display()
        ))),
    }
}
