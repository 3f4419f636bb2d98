//! Crate-wide error type.
//!
//! Every failure in the pipeline is one of a small set of categories, each
//! mapped to a stable process exit code:
//!
//! - `Io` / `Parse` / `Schema`: bad input at the file boundary (exit code 2)
//! - `ClimatologyGap` / `InsufficientData`: the data cannot support the
//!   requested product (exit code 3)
//! - `Numeric`: an internal numeric failure such as a singular system
//!   (exit code 4)
//!
//! Messages name the stage and condition so the user can tell which part of
//! the pipeline rejected the run.

#[derive(Clone)]
pub enum ClimError {
    /// Read/write failure at the loader or persister boundary.
    Io(String),
    /// Malformed source data (dates, numbers).
    Parse(String),
    /// Missing required column/field or a malformed file layout.
    Schema(String),
    /// A calendar month of the full series has no observations in the
    /// climatology reference window.
    ClimatologyGap { month: u32 },
    /// Fewer than 2 distinct years available for trend fitting.
    InsufficientData(String),
    /// Internal numeric failure (ill-conditioned regression, non-finite result).
    Numeric(String),
}

impl ClimError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ClimError::Io(_) | ClimError::Parse(_) | ClimError::Schema(_) => 2,
            ClimError::ClimatologyGap { .. } | ClimError::InsufficientData(_) => 3,
            ClimError::Numeric(_) => 4,
        }
    }
}

impl std::fmt::Display for ClimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClimError::Io(msg) => write!(f, "I/O error: {msg}"),
            ClimError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ClimError::Schema(msg) => write!(f, "Schema error: {msg}"),
            ClimError::ClimatologyGap { month } => write!(
                f,
                "Climatology gap: month {month} has no observations in the \
                 reference window, cannot compute anomalies for it."
            ),
            ClimError::InsufficientData(msg) => write!(f, "Insufficient data: {msg}"),
            ClimError::Numeric(msg) => write!(f, "Numeric error: {msg}"),
        }
    }
}

impl std::fmt::Debug for ClimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self} (exit code {})", self.exit_code())
    }
}

impl std::error::Error for ClimError {}
