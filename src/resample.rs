//! Yearly-mean resampling.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Sample, TimeSeries};
use crate::error::ClimError;

/// Aggregate a series to one arithmetic mean per calendar year.
///
/// Single pass: accumulate `(sum, count)` per year, then divide. Each output
/// sample is stamped December 31 of its year, so downstream year extraction
/// is unambiguous. Years with no entries are simply absent (no
/// interpolation). Attributes pass through unchanged. Idempotent.
pub fn resample_yearly(series: &TimeSeries) -> Result<TimeSeries, ClimError> {
    let mut buckets: BTreeMap<i32, (f64, usize)> = BTreeMap::new();

    for sample in series.samples() {
        let entry = buckets.entry(sample.year()).or_insert((0.0, 0));
        entry.0 += sample.value;
        entry.1 += 1;
    }

    let mut out = Vec::with_capacity(buckets.len());
    for (year, (sum, count)) in buckets {
        let date = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| {
            ClimError::Numeric(format!("Year {year} is out of calendar range."))
        })?;
        out.push(Sample::new(date, sum / count as f64));
    }

    TimeSeries::new(out, series.attrs().clone())
}
