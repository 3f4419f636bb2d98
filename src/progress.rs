//! Stage-boundary progress reporting.
//!
//! The pipeline never prints on its own; it emits events through an
//! injectable observer. The binary installs `ConsoleObserver`, tests use
//! `NullObserver`. Correctness never depends on the observer.

use std::path::Path;

use chrono::NaiveDate;

/// One pipeline stage has completed.
#[derive(Debug, Clone, Copy)]
pub enum StageEvent<'a> {
    LoadComplete {
        source: &'a str,
        samples: usize,
    },
    AnomaliesComputed {
        ref_start: NaiveDate,
        ref_end: NaiveDate,
    },
    Resampled {
        years: usize,
    },
    TrendFitted {
        slope: f64,
    },
    DatasetSaved {
        path: &'a Path,
    },
}

pub trait StageObserver {
    fn on_stage(&self, event: StageEvent<'_>);
}

/// Prints one human-readable line per stage to stdout.
pub struct ConsoleObserver;

impl StageObserver for ConsoleObserver {
    fn on_stage(&self, event: StageEvent<'_>) {
        match event {
            StageEvent::LoadComplete { source, samples } => {
                println!("Loaded {samples} samples from \"{source}\".");
            }
            StageEvent::AnomaliesComputed { ref_start, ref_end } => {
                println!("Computed anomalies relative to {ref_start}..{ref_end}.");
            }
            StageEvent::Resampled { years } => {
                println!("Resampled to {years} yearly means.");
            }
            StageEvent::TrendFitted { slope } => {
                println!("Fitted linear trend ({slope:+.4} °C/y).");
            }
            StageEvent::DatasetSaved { path } => {
                println!("Saved data to \"{}\".", path.display());
            }
        }
    }
}

/// Discards all events.
pub struct NullObserver;

impl StageObserver for NullObserver {
    fn on_stage(&self, _event: StageEvent<'_>) {}
}
