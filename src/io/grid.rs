//! Gridded ingest: time x latitude x longitude temperature fields.
//!
//! The grid file is a self-describing JSON document:
//!
//! ```json
//! {
//!   "time": ["1990-01-16", "..."],
//!   "latitude": [-87.5, "..."],
//!   "longitude": [0.0, "..."],
//!   "temperature": [[[...]]],
//!   "attrs": { "source": "..." }
//! }
//! ```
//!
//! `temperature` is in Kelvin, shaped `time x latitude x longitude`. Loading
//! applies a latitude-band selection, averages over the full longitude range
//! and the selected band, and converts the resulting scalar series to °C.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Attributes, Sample, TimeSeries};
use crate::error::ClimError;

pub const KELVIN_OFFSET: f64 = 273.15;

/// On-disk schema of a gridded temperature file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridFile {
    pub time: Vec<NaiveDate>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    /// Kelvin, shaped `time x latitude x longitude`.
    pub temperature: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    pub attrs: Attributes,
}

impl GridFile {
    /// Validate that the temperature field matches the declared axes.
    fn validate_shape(&self) -> Result<(), ClimError> {
        if self.temperature.len() != self.time.len() {
            return Err(ClimError::Schema(format!(
                "Temperature field has {} time steps but the time axis has {}.",
                self.temperature.len(),
                self.time.len()
            )));
        }
        for (ti, lat_plane) in self.temperature.iter().enumerate() {
            if lat_plane.len() != self.latitude.len() {
                return Err(ClimError::Schema(format!(
                    "Time step {ti}: {} latitude rows, expected {}.",
                    lat_plane.len(),
                    self.latitude.len()
                )));
            }
            for (li, lon_row) in lat_plane.iter().enumerate() {
                if lon_row.len() != self.longitude.len() {
                    return Err(ClimError::Schema(format!(
                        "Time step {ti}, latitude row {li}: {} longitude values, expected {}.",
                        lon_row.len(),
                        self.longitude.len()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Read a grid file from disk.
pub fn read_grid(path: &Path) -> Result<GridFile, ClimError> {
    let file = File::open(path)
        .map_err(|e| ClimError::Io(format!("Failed to open grid file '{}': {e}", path.display())))?;
    let grid: GridFile = serde_json::from_reader(file)
        .map_err(|e| ClimError::Parse(format!("Invalid grid file '{}': {e}", path.display())))?;
    grid.validate_shape()?;
    Ok(grid)
}

/// Load a gridded file and reduce it to a scalar °C series.
///
/// Latitudes within `[lat_min, lat_max]` (inclusive) are selected; the
/// spatial mean runs over the selected band and the full longitude range,
/// and the Kelvin result is converted to Celsius. `lat_min <= lat_max` is a
/// caller contract enforced by the argument layer.
pub fn load_grid(path: &Path, lat_min: f64, lat_max: f64) -> Result<TimeSeries, ClimError> {
    let grid = read_grid(path)?;
    spatial_mean(&grid, lat_min, lat_max)
}

/// Spatial mean over a latitude band, Kelvin -> Celsius.
pub fn spatial_mean(grid: &GridFile, lat_min: f64, lat_max: f64) -> Result<TimeSeries, ClimError> {
    let lat_indices: Vec<usize> = grid
        .latitude
        .iter()
        .enumerate()
        .filter(|&(_, &lat)| lat >= lat_min && lat <= lat_max)
        .map(|(idx, _)| idx)
        .collect();

    if lat_indices.is_empty() {
        return Err(ClimError::Schema(format!(
            "No grid latitudes fall within [{lat_min}, {lat_max}]."
        )));
    }
    if grid.longitude.is_empty() {
        return Err(ClimError::Schema("Grid has an empty longitude axis.".to_string()));
    }

    let cells = (lat_indices.len() * grid.longitude.len()) as f64;

    let mut samples = Vec::with_capacity(grid.time.len());
    for (ti, &date) in grid.time.iter().enumerate() {
        let mut sum = 0.0;
        for &li in &lat_indices {
            sum += grid.temperature[ti][li].iter().sum::<f64>();
        }
        samples.push(Sample::new(date, sum / cells - KELVIN_OFFSET));
    }

    let mut attrs = grid.attrs.clone();
    attrs.insert("unit".to_string(), "°C".to_string());
    attrs.insert(
        "latitude_range".to_string(),
        format!("{lat_min} to {lat_max}"),
    );

    TimeSeries::new(samples, attrs)
}
