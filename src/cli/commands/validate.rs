//! Validate command: sniff files for the CBF format marker
//!
//! Runs the importer's validation step on each file without parsing any
//! header content, the same check the import framework performs before
//! asking for metadata.

use super::shared::{ProcessingStats, render_validation};
use crate::Result;
use crate::app::models::ValidationOutcome;
use crate::app::services::importer::{CbfImporter, MetadataImporter, SubmittedInputs};
use crate::cli::args::{OutputFormat, ValidateArgs};
use serde::Serialize;
use std::time::Instant;
use tracing::{info, warn};

/// Validation result for one file, as emitted in JSON output
#[derive(Debug, Serialize)]
pub struct FileValidation {
    pub file: String,
    pub valid: bool,
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
}

pub fn run_validate(importer: &CbfImporter, args: &ValidateArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();
    let mut stats = ProcessingStats::default();
    let results = validate_files(importer, args);

    for result in &results {
        stats.files_processed += 1;
        if !result.valid {
            stats.files_rejected += 1;
            warn!("Rejected {}", result.file);
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Text => {
            for result in &results {
                println!("{}", render_validation(&result.file, &result.outcome));
            }
        }
    }

    stats.processing_time = start_time.elapsed();
    info!(
        "Validated {} files, {} rejected in {:.2?}",
        stats.files_processed, stats.files_rejected, stats.processing_time
    );

    Ok(stats)
}

/// Validate every file named in the arguments, in order
pub fn validate_files(importer: &CbfImporter, args: &ValidateArgs) -> Vec<FileValidation> {
    args.files
        .iter()
        .map(|path| {
            let outcome = importer.validate(&SubmittedInputs::from_file(path));
            FileValidation {
                file: path.display().to_string(),
                valid: outcome.is_valid(),
                outcome,
            }
        })
        .collect()
}
