//! Builder Module
//!
//! Fluent builder for the batch generator, plus the batch loop itself.
//! Source files are independent of each other, so the batch runs them on a
//! rayon pool by default; `sequential(true)` restores one-at-a-time
//! processing. A fatal error from any file stops the whole batch; documents
//! already written stay on disk.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::archive::{TemplateStore, ROW_COUNT_CEILING};
use crate::error::HwpxGenError;
use crate::mapping::FieldMapping;
use crate::parser::SourceTable;
use crate::report::{BatchReport, GeneratedFile, SkippedFile};
use crate::template;
use crate::types::ColumnIndex;

/// Generator settings under construction.
#[derive(Debug, Clone)]
pub(crate) struct GeneratorConfig {
    /// Directory holding the `template-tax-{N}.hwpx` family.
    pub templates_dir: PathBuf,

    /// Column whose last non-empty cell fixes the row count.
    pub count_column: ColumnIndex,

    /// Process files one at a time instead of on the rayon pool.
    pub sequential: bool,

    /// Cooperative cancellation flag, checked between files only.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("."),
            count_column: ColumnIndex::COUNT_DEFAULT,
            sequential: false,
            cancel: None,
        }
    }
}

/// Fluent builder for [`Generator`].
///
/// # Examples
///
/// ```rust,no_run
/// use hwpxgen::{FieldMapping, GeneratorBuilder};
/// use std::path::Path;
///
/// # fn main() -> Result<(), hwpxgen::HwpxGenError> {
/// let mapping = FieldMapping::load(Path::new("config.ini"))?;
/// let generator = GeneratorBuilder::new()
///     .with_templates_dir(Path::new("templates"))
///     .build()?;
/// let report = generator.run(Path::new("sources"), &mapping)?;
/// println!("{} generated, {} skipped", report.generated.len(), report.skipped.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct GeneratorBuilder {
    config: GeneratorConfig,
}

impl GeneratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory the `template-tax-{N}.hwpx` variants are read from.
    pub fn with_templates_dir(mut self, dir: &Path) -> Self {
        self.config.templates_dir = dir.to_path_buf();
        self
    }

    /// Column determining the effective row count (default: G).
    pub fn with_count_column(mut self, column: ColumnIndex) -> Self {
        self.config.count_column = column;
        self
    }

    /// Process files strictly one at a time.
    pub fn sequential(mut self, sequential: bool) -> Self {
        self.config.sequential = sequential;
        self
    }

    /// Cooperative cancellation flag; set it to stop after the file in
    /// flight. Never interrupts mid-file.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.config.cancel = Some(flag);
        self
    }

    /// Validate the configuration and build the generator.
    ///
    /// # Errors
    ///
    /// `HwpxGenError::Config` when the templates directory does not exist.
    pub fn build(self) -> Result<Generator, HwpxGenError> {
        if !self.config.templates_dir.is_dir() {
            return Err(HwpxGenError::Config(format!(
                "templates directory '{}' does not exist",
                self.config.templates_dir.display()
            )));
        }
        Ok(Generator {
            config: self.config,
        })
    }
}

/// Per-file outcome folded into the [`BatchReport`].
enum FileOutcome {
    Generated(GeneratedFile),
    Skipped(SkippedFile),
    Cancelled,
}

/// The batch generator facade.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Generate one document per supported source file in `source_dir`.
    ///
    /// Recoverable conditions (row count over the ceiling) are folded into
    /// the report; any other error stops the batch and is returned. An empty
    /// directory yields an empty report, not an error.
    pub fn run(
        &self,
        source_dir: &Path,
        mapping: &FieldMapping,
    ) -> Result<BatchReport, HwpxGenError> {
        let sources = find_source_files(source_dir)?;
        log::info!(
            "{} source file(s) in {}",
            sources.len(),
            source_dir.display()
        );

        let store = TemplateStore::new(&self.config.templates_dir)?;

        let outcomes: Result<Vec<FileOutcome>, HwpxGenError> = if self.config.sequential {
            sources
                .iter()
                .map(|path| self.process_file(path, mapping, &store))
                .collect()
        } else {
            sources
                .par_iter()
                .map(|path| self.process_file(path, mapping, &store))
                .collect()
        };

        let mut report = BatchReport::default();
        for outcome in outcomes? {
            match outcome {
                FileOutcome::Generated(generated) => report.generated.push(generated),
                FileOutcome::Skipped(skipped) => report.skipped.push(skipped),
                FileOutcome::Cancelled => report.cancelled = true,
            }
        }
        Ok(report)
    }

    fn process_file(
        &self,
        path: &Path,
        mapping: &FieldMapping,
        store: &TemplateStore,
    ) -> Result<FileOutcome, HwpxGenError> {
        if let Some(cancel) = &self.config.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Ok(FileOutcome::Cancelled);
            }
        }

        let table = SourceTable::open(path)?;
        let rows = table.row_count(self.config.count_column);
        if rows > ROW_COUNT_CEILING {
            let err = HwpxGenError::UnsupportedRowCount {
                path: path.display().to_string(),
                rows,
                max: ROW_COUNT_CEILING,
            };
            log::warn!("{err}");
            return Ok(FileOutcome::Skipped(SkippedFile {
                source: table.path().to_path_buf(),
                rows,
            }));
        }

        let template_xml = store.section_text(rows)?;
        let section = template::resolve(&template_xml, mapping, &table, self.config.count_column)?;

        let output = path.with_extension("hwpx");
        store.render(rows, &section, &output)?;
        log::info!("generated {} ({rows} row(s))", output.display());

        Ok(FileOutcome::Generated(GeneratedFile {
            source: path.to_path_buf(),
            output,
            rows,
        }))
    }
}

/// Supported source files in a directory, sorted for a stable batch order.
fn find_source_files(dir: &Path) -> Result<Vec<PathBuf>, HwpxGenError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if matches!(ext.as_str(), "csv" | "xlsx") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
