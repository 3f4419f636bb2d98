//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - gridded JSON ingest with spatial averaging (`grid`)
//! - dataset JSON read/write (`dataset`)

pub mod dataset;
pub mod grid;
pub mod ingest;

pub use dataset::*;
pub use grid::*;
pub use ingest::*;
