//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves them into a `PipelineRequest`
//! - runs the pipeline (load -> anomalies -> resample -> trend)
//! - prints the summary/plot
//! - writes the optional dataset export

use clap::Parser;

use crate::cli::Cli;
use crate::domain::{InputKind, PipelineMode, PipelineRequest};
use crate::error::ClimError;
use crate::io::dataset::{DatasetFile, save_dataset};
use crate::progress::{ConsoleObserver, StageEvent, StageObserver};

pub mod pipeline;

/// Entry point for the `climt` binary.
pub fn run() -> Result<(), ClimError> {
    let cli = Cli::parse();
    let request = request_from_args(&cli)?;

    let observer = ConsoleObserver;
    let output = pipeline::run(&request, &observer)?;

    println!("{}", crate::report::format_run_summary(&request, &output));

    if request.plot {
        let plot = crate::plot::render_series_plot(
            &output.yearly,
            output.trend.as_ref(),
            request.plot_width,
            request.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &request.output_path {
        let dataset = DatasetFile::from_series(&output.yearly, output.trend.as_ref());
        save_dataset(&dataset, path)?;
        observer.on_stage(StageEvent::DatasetSaved { path });
    }

    Ok(())
}

/// Resolve raw flags into a validated `PipelineRequest`.
///
/// All flag-compatibility rules live here so the pipeline itself never
/// inspects arguments: file existence, extensions, latitude-range rules, and
/// reference-window ordering.
pub fn request_from_args(cli: &Cli) -> Result<PipelineRequest, ClimError> {
    if !cli.input_file.exists() {
        return Err(ClimError::Io(format!(
            "Input file '{}' does not exist.",
            cli.input_file.display()
        )));
    }

    let input_kind = match cli
        .input_file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("csv") => InputKind::Csv,
        Some("json") => InputKind::Grid,
        _ => {
            return Err(ClimError::Schema(format!(
                "Input file '{}' is neither a .csv station file nor a .json grid file.",
                cli.input_file.display()
            )));
        }
    };

    if cli.latitude_range.is_some() && input_kind != InputKind::Grid {
        return Err(ClimError::Schema(
            "Only gridded (.json) inputs support a latitude range.".to_string(),
        ));
    }

    let (lat_min, lat_max) = match &cli.latitude_range {
        Some(range) => {
            // clap enforces num_args = 2.
            let (lat_min, lat_max) = (range[0], range[1]);
            if lat_min > lat_max {
                return Err(ClimError::Schema(format!(
                    "Latitude range is inverted: {lat_min} > {lat_max}."
                )));
            }
            (lat_min, lat_max)
        }
        None => (-90.0, 90.0),
    };

    if cli.ref_start > cli.ref_end {
        return Err(ClimError::Schema(format!(
            "Reference period is inverted: {} > {}.",
            cli.ref_start, cli.ref_end
        )));
    }

    if let Some(output) = &cli.output_file {
        let ok = output
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if !ok {
            return Err(ClimError::Schema(format!(
                "Output file '{}' must end with .json.",
                output.display()
            )));
        }
    }

    let mode = if cli.anomalies {
        PipelineMode::Anomaly
    } else {
        PipelineMode::Absolute
    };

    Ok(PipelineRequest {
        input_path: cli.input_file.clone(),
        input_kind,
        mode,
        fit_trend: cli.trend,
        lat_min,
        lat_max,
        ref_start: cli.ref_start,
        ref_end: cli.ref_end,
        output_path: cli.output_file.clone(),
        plot: cli.plot && !cli.no_plot,
        plot_width: cli.width,
        plot_height: cli.height,
    })
}
