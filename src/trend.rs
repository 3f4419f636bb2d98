//! Linear trend estimation on yearly means.

use crate::domain::{TimeSeries, TrendResult};
use crate::error::ClimError;
use crate::math::fit_line;
use crate::resample::resample_yearly;

/// Fit `y = slope·year + intercept` to the yearly means of `series`.
///
/// The input is resampled to yearly means first (a no-op if it already is
/// yearly), then regressed against the integer calendar year. `p_err` holds
/// the marginal standard errors of slope and intercept derived from the
/// coefficient covariance matrix; these are not confidence-interval bounds.
///
/// Fewer than 2 distinct years leaves the fit underdetermined and fails with
/// `ClimError::InsufficientData`.
pub fn linear_trend(series: &TimeSeries) -> Result<TrendResult, ClimError> {
    let yearly = resample_yearly(series)?;

    if yearly.len() < 2 {
        return Err(ClimError::InsufficientData(format!(
            "Trend fitting needs at least 2 distinct years, got {}.",
            yearly.len()
        )));
    }

    let x: Vec<f64> = yearly.samples().iter().map(|s| s.year() as f64).collect();
    let y = yearly.values();

    let fit = fit_line(&x, &y)?;
    let trend = x.iter().map(|&xi| fit.predict(xi)).collect();

    let mut attrs = yearly.attrs().clone();
    attrs.insert("p".to_string(), "coefficients of linear trend".to_string());
    attrs.insert(
        "p_err".to_string(),
        "coefficient uncertainties of linear trend".to_string(),
    );

    Ok(TrendResult {
        series: yearly,
        trend,
        p: fit.coeffs,
        p_err: fit.std_errs,
        attrs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::domain::{Attributes, Sample};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn recovers_perfect_linear_yearly_series() {
        // y = 2·year + 1, already yearly.
        let samples: Vec<Sample> = (2000..2010)
            .map(|year| Sample::new(d(year, 12, 31), 2.0 * year as f64 + 1.0))
            .collect();
        let ts = TimeSeries::new(samples, Attributes::new()).unwrap();

        let result = linear_trend(&ts).unwrap();
        assert!((result.slope() - 2.0).abs() < 1e-6);
        assert!((result.intercept() - 1.0).abs() < 1e-3);
        assert!(result.p_err[0] < 1e-6);
        assert!(result.p_err[1] < 1e-2);

        for (sample, fitted) in result.series.samples().iter().zip(&result.trend) {
            assert!((fitted - sample.value).abs() < 1e-6);
        }
    }

    #[test]
    fn resamples_monthly_input_before_fitting() {
        // 3 years of monthly values; each year's mean increases by 1.
        let mut samples = Vec::new();
        for year in 2000..2003 {
            for month in 1..=12 {
                samples.push(Sample::new(d(year, month, 15), (year - 2000) as f64));
            }
        }
        let ts = TimeSeries::new(samples, Attributes::new()).unwrap();

        let result = linear_trend(&ts).unwrap();
        assert_eq!(result.series.len(), 3);
        assert!((result.slope() - 1.0).abs() < 1e-6);

        // Fitted values must agree with an independent OLS on the 3 yearly means.
        let x: Vec<f64> = result.series.samples().iter().map(|s| s.year() as f64).collect();
        let y = result.series.values();
        let check = crate::math::fit_line(&x, &y).unwrap();
        for (i, &xi) in x.iter().enumerate() {
            assert!((result.trend[i] - check.predict(xi)).abs() < 1e-9);
        }
    }

    #[test]
    fn single_year_is_insufficient() {
        let mut samples = Vec::new();
        for month in 1..=12 {
            samples.push(Sample::new(d(2000, month, 1), month as f64));
        }
        let ts = TimeSeries::new(samples, Attributes::new()).unwrap();

        let err = linear_trend(&ts).unwrap_err();
        assert!(matches!(err, ClimError::InsufficientData(_)));
    }

    #[test]
    fn description_tags_are_attached() {
        let samples: Vec<Sample> = (2000..2005)
            .map(|year| Sample::new(d(year, 12, 31), year as f64))
            .collect();
        let ts = TimeSeries::new(samples, Attributes::new()).unwrap();

        let result = linear_trend(&ts).unwrap();
        assert_eq!(
            result.attrs.get("p").map(String::as_str),
            Some("coefficients of linear trend")
        );
        assert_eq!(
            result.attrs.get("p_err").map(String::as_str),
            Some("coefficient uncertainties of linear trend")
        );
    }
}
