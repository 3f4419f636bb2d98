//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline/math code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{PipelineRequest, TrendResult};

/// Format the full run summary (source, product, yearly stats, trend block).
pub fn format_run_summary(request: &PipelineRequest, output: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== climt - yearly temperature products ===\n");
    out.push_str(&format!("Input: {}\n", request.input_path.display()));
    out.push_str(&format!("Product: {}\n", request.mode.display_name()));
    out.push_str(&format!(
        "Samples: {} -> {} yearly means\n",
        output.source_samples,
        output.yearly.len()
    ));

    if let (Some(first), Some(last)) = (
        output.yearly.samples().first(),
        output.yearly.samples().last(),
    ) {
        out.push_str(&format!("Years: {} to {}\n", first.year(), last.year()));
    }
    if let Some(unit) = output.yearly.attrs().get("unit") {
        out.push_str(&format!("Unit: {unit}\n"));
    }

    if let Some(trend) = &output.trend {
        out.push_str("\nLinear trend:\n");
        out.push_str(&format!(
            "- slope    : {:.3} ± {:.3} °C/y\n",
            trend.p[0], trend.p_err[0]
        ));
        out.push_str(&format!(
            "- intercept: {:.3} ± {:.3} °C\n",
            trend.p[1], trend.p_err[1]
        ));
    }

    out
}

/// Legend label for a fitted trend, coefficients to 3 decimal places.
pub fn format_trend_label(trend: &TrendResult) -> String {
    format!(
        "trend: T (°C) = ({:.3}±{:.3})·t + ({:.3}±{:.3})",
        trend.p[0], trend.p_err[0], trend.p[1], trend.p_err[1]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{Attributes, Sample, TimeSeries};

    #[test]
    fn trend_label_uses_three_decimals() {
        let samples: Vec<Sample> = (2000..2005)
            .map(|year| {
                Sample::new(
                    NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
                    0.5 * (year - 2000) as f64,
                )
            })
            .collect();
        let ts = TimeSeries::new(samples, Attributes::new()).unwrap();
        let trend = crate::trend::linear_trend(&ts).unwrap();

        let label = format_trend_label(&trend);
        assert!(label.starts_with("trend: T (°C) = (0.500±"));
        assert!(label.contains(")·t + ("));
    }

    #[test]
    fn summary_names_product_and_trend() {
        use crate::app::pipeline::RunOutput;
        use crate::domain::{InputKind, PipelineMode, PipelineRequest, default_reference_window};

        let samples: Vec<Sample> = (2000..2003)
            .map(|year| {
                Sample::new(
                    NaiveDate::from_ymd_opt(year, 12, 31).unwrap(),
                    (year - 2000) as f64,
                )
            })
            .collect();
        let yearly = TimeSeries::new(samples, Attributes::new()).unwrap();
        let trend = crate::trend::linear_trend(&yearly).unwrap();

        let (ref_start, ref_end) = default_reference_window();
        let request = PipelineRequest {
            input_path: "station.csv".into(),
            input_kind: InputKind::Csv,
            mode: PipelineMode::Anomaly,
            fit_trend: true,
            lat_min: -90.0,
            lat_max: 90.0,
            ref_start,
            ref_end,
            output_path: None,
            plot: false,
            plot_width: 80,
            plot_height: 20,
        };
        let output = RunOutput {
            yearly,
            trend: Some(trend),
            source_samples: 36,
        };

        let summary = format_run_summary(&request, &output);
        assert!(summary.contains("anomalies"));
        assert!(summary.contains("Years: 2000 to 2002"));
        assert!(summary.contains("slope"));
    }
}
