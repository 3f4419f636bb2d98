//! Monthly climatology and anomaly computation.
//!
//! An anomaly is an observed value minus the long-term mean for the same
//! calendar month, where the long-term mean (the climatology) is computed
//! over a fixed reference window.
//!
//! Gap policy: a calendar month that appears in the full series but has no
//! observations inside the reference window makes the anomaly undefined for
//! every entry of that month. We fail fast with `ClimError::ClimatologyGap`
//! instead of propagating a missing-value marker; the caller can widen the
//! reference window and re-run.

use chrono::NaiveDate;

use crate::domain::{MonthlyClimatology, Sample, TimeSeries};
use crate::error::ClimError;

/// Compute the monthly climatology of `series` over `[ref_start, ref_end]`
/// inclusive.
///
/// Single pass: accumulate `(sum, count)` per calendar month, then divide.
/// Months without observations in the window are left undefined.
pub fn monthly_climatology(
    series: &TimeSeries,
    ref_start: NaiveDate,
    ref_end: NaiveDate,
) -> MonthlyClimatology {
    let mut sums = [0.0f64; 12];
    let mut counts = [0usize; 12];

    for sample in series.select_range(ref_start, ref_end) {
        let idx = (sample.month() - 1) as usize;
        sums[idx] += sample.value;
        counts[idx] += 1;
    }

    let mut means = [None; 12];
    for idx in 0..12 {
        if counts[idx] > 0 {
            means[idx] = Some(sums[idx] / counts[idx] as f64);
        }
    }

    MonthlyClimatology::from_means(means)
}

/// Subtract the reference-window climatology from the full series.
///
/// The output has exactly the timestamps of the input, with each value
/// replaced by its anomaly. Attributes pass through unchanged (an anomaly is
/// a difference of same-unit quantities).
pub fn anomalies(
    series: &TimeSeries,
    ref_start: NaiveDate,
    ref_end: NaiveDate,
) -> Result<TimeSeries, ClimError> {
    let clim = monthly_climatology(series, ref_start, ref_end);

    let mut out = Vec::with_capacity(series.len());
    for sample in series.samples() {
        let month = sample.month();
        let baseline = clim
            .get(month)
            .ok_or(ClimError::ClimatologyGap { month })?;
        out.push(Sample::new(sample.date, sample.value - baseline));
    }

    TimeSeries::new(out, series.attrs().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Attributes;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Three years of monthly data with a fixed seasonal cycle plus a
    /// per-year offset.
    fn seasonal_series() -> TimeSeries {
        let mut samples = Vec::new();
        for year in 2000..2003 {
            for month in 1..=12 {
                let seasonal = (month as f64) * 0.5;
                let offset = (year - 2000) as f64;
                samples.push(Sample::new(d(year, month, 15), seasonal + offset));
            }
        }
        let mut attrs = Attributes::new();
        attrs.insert("unit".to_string(), "°C".to_string());
        TimeSeries::new(samples, attrs).unwrap()
    }

    #[test]
    fn climatology_is_per_month_mean_over_window() {
        let ts = seasonal_series();
        let clim = monthly_climatology(&ts, d(2000, 1, 1), d(2002, 12, 31));
        assert_eq!(clim.months_present(), 12);
        // Mean over offsets 0, 1, 2 is 1.0 for every month.
        for month in 1..=12 {
            let expected = (month as f64) * 0.5 + 1.0;
            assert!((clim.get(month).unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn climatology_tolerates_partial_windows() {
        let ts = seasonal_series();
        // Window covering only January-March of one year.
        let clim = monthly_climatology(&ts, d(2001, 1, 1), d(2001, 3, 31));
        assert_eq!(clim.months_present(), 3);
        assert!(clim.get(1).is_some());
        assert!(clim.get(7).is_none());
    }

    #[test]
    fn anomalies_keep_timestamps_and_attrs() {
        let ts = seasonal_series();
        let anom = anomalies(&ts, d(2000, 1, 1), d(2002, 12, 31)).unwrap();
        assert_eq!(anom.dates(), ts.dates());
        assert_eq!(anom.attrs(), ts.attrs());
    }

    #[test]
    fn anomalies_self_cancel_on_reference_window() {
        let ts = seasonal_series();
        let (a, b) = (d(2000, 1, 1), d(2002, 12, 31));
        let anom = anomalies(&ts, a, b).unwrap();

        // Per-month means of anomalies restricted to the window are ~0.
        let mut sums = [0.0f64; 12];
        let mut counts = [0usize; 12];
        for s in anom.select_range(a, b) {
            sums[(s.month() - 1) as usize] += s.value;
            counts[(s.month() - 1) as usize] += 1;
        }
        for idx in 0..12 {
            assert!(counts[idx] > 0);
            assert!((sums[idx] / counts[idx] as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn month_missing_from_window_is_a_gap_error() {
        let ts = seasonal_series();
        // Reference window only covers January of 2001; the February entries
        // of the full series then have no baseline.
        let err = anomalies(&ts, d(2001, 1, 1), d(2001, 1, 31)).unwrap_err();
        match err {
            ClimError::ClimatologyGap { month } => assert_eq!(month, 2),
            other => panic!("expected ClimatologyGap, got {other:?}"),
        }
    }
}
