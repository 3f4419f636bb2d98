//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the pipeline
//! - exported to the dataset JSON format
//! - reloaded later for plotting or comparisons

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ClimError;

/// One observation: a calendar date and a temperature value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub date: NaiveDate,
    pub value: f64,
}

impl Sample {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month, `1..=12`.
    pub fn month(&self) -> u32 {
        self.date.month()
    }
}

/// String metadata attached to a series (units, source info).
///
/// A `BTreeMap` keeps export output deterministic.
pub type Attributes = BTreeMap<String, String>;

/// An ordered temperature time series with metadata attributes.
///
/// Invariants (validated at construction):
/// - dates strictly increasing
/// - no duplicate dates
///
/// Each pipeline stage consumes a `TimeSeries` and returns a new one;
/// attributes are copied across stage boundaries, never shared.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    samples: Vec<Sample>,
    attrs: Attributes,
}

impl TimeSeries {
    /// Build a series, validating the ordering invariant.
    pub fn new(samples: Vec<Sample>, attrs: Attributes) -> Result<Self, ClimError> {
        for pair in samples.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(ClimError::Schema(format!(
                    "Time axis is not strictly increasing at {} -> {}.",
                    pair[0].date, pair[1].date
                )));
            }
        }
        Ok(Self { samples, attrs })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.samples.iter().map(|s| s.date).collect()
    }

    /// Samples with date in `[start, end]` inclusive.
    pub fn select_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Sample> {
        self.samples
            .iter()
            .copied()
            .filter(|s| s.date >= start && s.date <= end)
            .collect()
    }

    /// Copy of this series with one attribute set (overwriting).
    pub fn with_attr(&self, key: &str, value: &str) -> Self {
        let mut attrs = self.attrs.clone();
        attrs.insert(key.to_string(), value.to_string());
        Self {
            samples: self.samples.clone(),
            attrs,
        }
    }
}

/// Per-calendar-month mean values over a fixed reference window.
///
/// Months with no observations in the window are absent; callers decide how
/// to treat gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyClimatology {
    means: [Option<f64>; 12],
}

impl MonthlyClimatology {
    pub fn from_means(means: [Option<f64>; 12]) -> Self {
        Self { means }
    }

    /// Mean for calendar month `1..=12`, if the month was observed.
    pub fn get(&self, month: u32) -> Option<f64> {
        debug_assert!((1..=12).contains(&month));
        self.means[(month - 1) as usize]
    }

    /// Number of months with a defined mean.
    pub fn months_present(&self) -> usize {
        self.means.iter().filter(|m| m.is_some()).count()
    }
}

/// Output of the trend estimator: a yearly series plus the fitted line.
///
/// Read-only after construction. `p` and `p_err` follow the
/// `[slope, intercept]` convention.
#[derive(Debug, Clone)]
pub struct TrendResult {
    /// The yearly-resampled input series.
    pub series: TimeSeries,
    /// Fitted value per year, aligned with `series.samples()`.
    pub trend: Vec<f64>,
    /// `[slope, intercept]` in °C per year and °C.
    pub p: [f64; 2],
    /// Marginal standard errors of `p` (not confidence-interval bounds).
    pub p_err: [f64; 2],
    /// Attributes inherited from the input plus description tags.
    pub attrs: Attributes,
}

impl TrendResult {
    pub fn slope(&self) -> f64 {
        self.p[0]
    }

    pub fn intercept(&self) -> f64 {
        self.p[1]
    }
}

/// Which product the pipeline derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// Yearly-averaged absolute values.
    Absolute,
    /// Yearly-averaged anomalies relative to the reference window.
    Anomaly,
}

impl PipelineMode {
    pub fn display_name(self) -> &'static str {
        match self {
            PipelineMode::Absolute => "absolute timeseries",
            PipelineMode::Anomaly => "anomalies",
        }
    }
}

/// Input source kind, resolved from the file extension by the argument layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Row-oriented CSV with `time` and `t` columns (°C).
    Csv,
    /// Gridded JSON with time x latitude x longitude temperatures (Kelvin).
    Grid,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is resolved once from CLI flags (plus defaults) by the argument
/// layer; the core never inspects raw flags.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub input_path: PathBuf,
    pub input_kind: InputKind,
    pub mode: PipelineMode,
    pub fit_trend: bool,

    /// Latitude band for gridded inputs (degrees, inclusive).
    pub lat_min: f64,
    pub lat_max: f64,

    /// Climatology reference window (inclusive).
    pub ref_start: NaiveDate,
    pub ref_end: NaiveDate,

    pub output_path: Option<PathBuf>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}

/// Default climatology reference window: 1991-01-01 to 2020-12-31.
pub fn default_reference_window() -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(1991, 1, 1).expect("valid date"),
        NaiveDate::from_ymd_opt(2020, 12, 31).expect("valid date"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn series_rejects_unordered_dates() {
        let samples = vec![
            Sample::new(d(2000, 2, 1), 1.0),
            Sample::new(d(2000, 1, 1), 2.0),
        ];
        assert!(TimeSeries::new(samples, Attributes::new()).is_err());
    }

    #[test]
    fn series_rejects_duplicate_dates() {
        let samples = vec![
            Sample::new(d(2000, 1, 1), 1.0),
            Sample::new(d(2000, 1, 1), 2.0),
        ];
        assert!(TimeSeries::new(samples, Attributes::new()).is_err());
    }

    #[test]
    fn select_range_is_inclusive() {
        let samples = vec![
            Sample::new(d(2000, 1, 1), 1.0),
            Sample::new(d(2000, 2, 1), 2.0),
            Sample::new(d(2000, 3, 1), 3.0),
        ];
        let ts = TimeSeries::new(samples, Attributes::new()).unwrap();
        let sel = ts.select_range(d(2000, 1, 1), d(2000, 2, 1));
        assert_eq!(sel.len(), 2);
        assert_eq!(sel[1].value, 2.0);
    }

    #[test]
    fn with_attr_copies_rather_than_mutates() {
        let ts = TimeSeries::new(vec![], Attributes::new()).unwrap();
        let tagged = ts.with_attr("unit", "°C");
        assert!(ts.attrs().is_empty());
        assert_eq!(tagged.attrs().get("unit").map(String::as_str), Some("°C"));
    }
}
