//! Shared pipeline logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> (anomalies) -> yearly resample -> (trend)
//!
//! The front-end then focuses on presentation (summary, plot, export). The
//! pipeline is purely sequential and stateless between runs; each stage
//! fully consumes its input and produces a new series.

use crate::anomaly::anomalies;
use crate::domain::{InputKind, PipelineMode, PipelineRequest, TimeSeries, TrendResult};
use crate::error::ClimError;
use crate::progress::{StageEvent, StageObserver};
use crate::resample::resample_yearly;
use crate::trend::linear_trend;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The yearly product (absolute values or anomalies).
    pub yearly: TimeSeries,
    /// Present when the request asked for a trend fit.
    pub trend: Option<TrendResult>,
    /// Number of samples in the loaded source series.
    pub source_samples: usize,
}

/// Execute the full pipeline for a resolved request.
pub fn run(request: &PipelineRequest, observer: &dyn StageObserver) -> Result<RunOutput, ClimError> {
    let loaded = load_series(request)?;
    let source = request.input_path.display().to_string();
    observer.on_stage(StageEvent::LoadComplete {
        source: &source,
        samples: loaded.len(),
    });
    let source_samples = loaded.len();

    let series = match request.mode {
        PipelineMode::Absolute => loaded,
        PipelineMode::Anomaly => {
            let anom = anomalies(&loaded, request.ref_start, request.ref_end)?;
            observer.on_stage(StageEvent::AnomaliesComputed {
                ref_start: request.ref_start,
                ref_end: request.ref_end,
            });
            anom
        }
    };

    let yearly = resample_yearly(&series)?;
    observer.on_stage(StageEvent::Resampled { years: yearly.len() });

    let trend = if request.fit_trend {
        let fit = linear_trend(&yearly)?;
        observer.on_stage(StageEvent::TrendFitted { slope: fit.slope() });
        Some(fit)
    } else {
        None
    };

    Ok(RunOutput {
        yearly,
        trend,
        source_samples,
    })
}

fn load_series(request: &PipelineRequest) -> Result<TimeSeries, ClimError> {
    match request.input_kind {
        InputKind::Csv => crate::io::ingest::load_csv(&request.input_path),
        InputKind::Grid => {
            crate::io::grid::load_grid(&request.input_path, request.lat_min, request.lat_max)
        }
    }
}
