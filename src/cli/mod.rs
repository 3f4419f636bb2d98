//! Command-line parsing for the temperature timeseries tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline/math code: flags are resolved once into a `PipelineRequest` by
//! the application layer, and the core never sees them.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgGroup, Parser};

/// Top-level CLI.
///
/// Exactly one of `--timeseries` / `--anomalies` selects the product; the
/// latitude range only applies to gridded inputs.
#[derive(Debug, Parser)]
#[command(
    name = "climt",
    version,
    about = "Plot yearly surface-temperature timeseries or anomalies, optionally with a linear trend."
)]
#[command(group(ArgGroup::new("product").required(true).args(["timeseries", "anomalies"])))]
pub struct Cli {
    /// Filepath of input data (.csv station file or .json grid file).
    #[arg(long = "input-file", value_name = "FILE")]
    pub input_file: PathBuf,

    /// Latitude range for gridded inputs, e.g. --latitude-range -90 90 (default).
    #[arg(
        long = "latitude-range",
        num_args = 2,
        value_names = ["LAT_MIN", "LAT_MAX"],
        allow_negative_numbers = true
    )]
    pub latitude_range: Option<Vec<f64>>,

    /// Derive the yearly absolute values.
    #[arg(long)]
    pub timeseries: bool,

    /// Derive the yearly anomalies relative to the reference period.
    #[arg(long)]
    pub anomalies: bool,

    /// Fit and draw a linear trend, optionally.
    #[arg(long)]
    pub trend: bool,

    /// Save the derived data to a dataset JSON file, optionally.
    #[arg(long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Start of the climatology reference period.
    #[arg(long = "ref-start", default_value = "1991-01-01")]
    pub ref_start: NaiveDate,

    /// End of the climatology reference period.
    #[arg(long = "ref-end", default_value = "2020-12-31")]
    pub ref_end: NaiveDate,

    /// Render a terminal plot (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
