//! Command-line entry point.

use clap::Parser;
use hwpxgen::{BatchReport, ColumnIndex, FieldMapping, GeneratorBuilder};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "hwpxgen",
    version,
    about = "Generates HWPX tax-notice documents from CSV/XLSX records"
)]
struct Cli {
    /// Directory containing the source .csv/.xlsx files; outputs are written
    /// next to their sources
    source_dir: PathBuf,

    /// Field-mapping configuration file
    #[arg(long, default_value = "config.ini")]
    config: PathBuf,

    /// Directory holding the template-tax-{N}.hwpx family
    #[arg(long, default_value = ".")]
    templates_dir: PathBuf,

    /// Column whose last non-empty cell determines the row count
    #[arg(long, default_value = "G")]
    count_column: String,

    /// Process files one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Also write the run report as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<BatchReport, Box<dyn std::error::Error>> {
    let mapping = FieldMapping::load(&cli.config)?;
    if mapping.is_empty() {
        log::warn!("no field mappings in {}", cli.config.display());
    }

    let generator = GeneratorBuilder::new()
        .with_templates_dir(&cli.templates_dir)
        .with_count_column(ColumnIndex::parse(&cli.count_column)?)
        .sequential(cli.sequential)
        .build()?;

    let report = generator.run(&cli.source_dir, &mapping)?;

    if let Some(path) = &cli.report_json {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }
    Ok(report)
}

fn print_summary(report: &BatchReport) {
    if report.generated.is_empty() && report.skipped.is_empty() {
        println!("no source files found, nothing to do");
        return;
    }

    if report.is_clean() {
        println!("conversion completed: {} document(s) generated", report.generated.len());
        return;
    }

    println!(
        "conversion completed: {} document(s) generated, {} file(s) skipped",
        report.generated.len(),
        report.skipped.len()
    );
    for skipped in &report.skipped {
        println!(
            "  skipped {}: {} rows exceed the supported maximum",
            skipped.source.display(),
            skipped.rows
        );
    }
    if report.cancelled {
        println!("  run was cancelled before all files were processed");
    }
}
