//! Error Types Module
//!
//! Structured error type shared across the crate. `thiserror` provides the
//! automatic conversions and message formatting.

use thiserror::Error;

/// Error type used throughout the hwpxgen crate.
///
/// Two classes of failure exist:
///
/// - recoverable, per-file conditions ([`HwpxGenError::UnsupportedRowCount`]):
///   the batch records the file and keeps going;
/// - everything else is fatal and stops the batch immediately. Outputs already
///   written for earlier files stay on disk.
///
/// # Examples
///
/// ```rust,no_run
/// use hwpxgen::HwpxGenError;
/// use std::fs::File;
///
/// fn open_source(path: &str) -> Result<(), HwpxGenError> {
///     let _file = File::open(path)?; // io::Error converts automatically
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum HwpxGenError {
    /// I/O failure (file read/write, directory traversal).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container failure while extracting or repacking a template.
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Invalid generator or field-mapping configuration, detected at load or
    /// build time (e.g. a mapped column outside A..L).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A source table could not be decoded or parsed. Fatal for the run.
    #[error("Cannot read source '{path}': {reason}")]
    MalformedSource {
        /// Path of the offending source file.
        path: String,
        /// Decoder or parser detail.
        reason: String,
    },

    /// A monetary cell was not representable as a non-negative integer.
    /// Fatal; names the configured key so the user can find the column.
    #[error("Value for '{key}' at row {row} is not a non-negative amount: '{value}'")]
    InvalidAmount {
        /// Semantic key configured for the offending column.
        key: String,
        /// 1-based physical row of the offending cell.
        row: usize,
        /// Raw cell content as read.
        value: String,
    },

    /// Template text could not be populated: no substitutable placeholders,
    /// or a token addressed a row beyond the available data.
    #[error("Template error: {0}")]
    Template(String),

    /// The source holds more tax items than any template variant supports.
    /// Recoverable: the file is skipped and reported at the end of the run.
    #[error("'{path}' has {rows} rows, more than the supported maximum of {max}")]
    UnsupportedRowCount {
        /// Path of the skipped source file.
        path: String,
        /// Effective row count of the source.
        rows: usize,
        /// The row-count ceiling of the template family.
        max: usize,
    },

    /// A previously generated output artifact could not be removed, typically
    /// because it is open in a viewer. Fatal with the locked path named.
    #[error("Cannot replace existing output '{path}': {reason}. Close the file and run again")]
    OutputConflict {
        /// Path of the artifact that could not be replaced.
        path: String,
        /// Underlying OS error.
        reason: String,
    },
}

impl HwpxGenError {
    /// Whether the batch may continue after this error (skip + record) or
    /// must stop immediately.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HwpxGenError::UnsupportedRowCount { .. })
    }
}
