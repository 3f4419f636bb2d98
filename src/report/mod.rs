//! Reporting utilities: run summaries and trend labels.

pub mod format;

pub use format::*;
