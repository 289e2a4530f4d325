//! Command implementations for the CBF metadata CLI
//!
//! Each subcommand lives in its own module; this module sets up logging and
//! the importer once and dispatches.

pub mod extract;
pub mod scan;
pub mod schema;
pub mod shared;
pub mod validate;

pub use shared::ProcessingStats;

use crate::app::services::importer::CbfImporter;
use crate::cli::args::{Args, Commands};
use anyhow::{Context, Result};
use tracing::debug;

/// Main command runner
///
/// Returns an error only for failures that stop the whole command; per-file
/// problems are counted in the returned statistics.
pub fn run(args: Args) -> Result<ProcessingStats> {
    shared::setup_logging(&args);

    let config = args.load_config().context("Failed to load configuration")?;
    let importer = CbfImporter::new(config).context("Invalid importer configuration")?;
    debug!(
        "Importer configuration: {:?} (messages: {})",
        importer.config(),
        importer.messages().locale()
    );
    let show_progress = args.show_progress();

    let stats = match &args.command {
        Some(Commands::Schema(schema_args)) => schema::run_schema(&importer, schema_args)?,
        Some(Commands::Validate(validate_args)) => {
            validate::run_validate(&importer, validate_args)?
        }
        Some(Commands::Extract(extract_args)) => extract::run_extract(&importer, extract_args)
            .with_context(|| format!("Failed to extract {}", extract_args.file.display()))?,
        Some(Commands::Scan(scan_args)) => scan::run_scan(&importer, scan_args, show_progress)
            .with_context(|| format!("Failed to scan {}", scan_args.directory.display()))?,
        None => ProcessingStats::default(),
    };

    Ok(stats)
}
