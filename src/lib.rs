//! hwpxgen - batch generator for HWPX tax-notice documents
//!
//! This crate fills `%TOKEN%` placeholders inside the section XML of an HWPX
//! template with values from tabular sources (CSV or XLSX, one row per tax
//! item), then repacks the zip container. Templates come as a family
//! `template-tax-{N}.hwpx` selected by the effective row count of each
//! source; sources with more rows than any variant supports are skipped and
//! reported, never fatal.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hwpxgen::{FieldMapping, GeneratorBuilder};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Field names used by the templates, mapped to source columns
//!     let mapping = FieldMapping::load(Path::new("config.ini"))?;
//!
//!     let generator = GeneratorBuilder::new()
//!         .with_templates_dir(Path::new("templates"))
//!         .build()?;
//!
//!     // One .hwpx per supported source file, written next to the source
//!     let report = generator.run(Path::new("sources"), &mapping)?;
//!
//!     for skipped in &report.skipped {
//!         eprintln!("skipped: {} ({} rows)", skipped.source.display(), skipped.rows);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Cancellation
//!
//! ```rust,no_run
//! use hwpxgen::GeneratorBuilder;
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), hwpxgen::HwpxGenError> {
//! let cancel = Arc::new(AtomicBool::new(false));
//! let generator = GeneratorBuilder::new()
//!     .with_cancel_flag(cancel.clone())
//!     .build()?;
//! // store `cancel` somewhere a signal handler or UI can set it;
//! // the batch stops after the file currently in flight
//! # Ok(())
//! # }
//! ```

mod archive;
mod builder;
mod error;
mod formatter;
mod mapping;
mod parser;
mod report;
mod template;
mod types;

pub use builder::{Generator, GeneratorBuilder};
pub use error::HwpxGenError;
pub use formatter::{to_grouped_numeral, to_korean_words};
pub use mapping::FieldMapping;
pub use report::{BatchReport, GeneratedFile, SkippedFile};
pub use types::ColumnIndex;
