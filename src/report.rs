//! Report Module
//!
//! Result value of a batch run. The batch never mutates shared state while
//! it works; per-file outcomes fold into this report, and the caller decides
//! how to present it.

use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    /// Documents written, in source order.
    pub generated: Vec<GeneratedFile>,

    /// Sources rejected because their row count exceeds the template family,
    /// in source order.
    pub skipped: Vec<SkippedFile>,

    /// Whether the run was cancelled before every file was visited.
    pub cancelled: bool,
}

/// One successfully generated document.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    /// Source table the document was generated from.
    pub source: PathBuf,

    /// The written document artifact.
    pub output: PathBuf,

    /// Effective data-row count of the source.
    pub rows: usize,
}

/// One source file skipped as unsupported.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    /// The rejected source table.
    pub source: PathBuf,

    /// Its effective row count, above the supported ceiling.
    pub rows: usize,
}

impl BatchReport {
    /// A run that generated everything it saw and skipped nothing.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && !self.cancelled
    }
}
