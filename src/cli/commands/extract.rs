//! Extract command: print the metadata of a single CBF image

use super::shared::{ProcessingStats, render_fields, render_parse_stats};
use crate::app::services::cbf_header::{ExtractionResult, count_leaves};
use crate::app::services::importer::{CbfImporter, MetadataImporter, SubmittedInputs};
use crate::cli::args::{ExtractArgs, OutputFormat};
use crate::{Error, Result};
use std::time::Instant;
use tracing::{debug, info};

pub fn run_extract(importer: &CbfImporter, args: &ExtractArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();
    let result = extract_file(importer, args)?;

    match args.format {
        OutputFormat::Json => {
            if args.stats {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&result.fields)?);
            }
        }
        OutputFormat::Text => {
            print!("{}", render_fields(&result.fields));
            if args.stats {
                println!("{}", render_parse_stats(&result.stats));
            }
        }
    }

    let stats = ProcessingStats {
        files_processed: 1,
        fields_extracted: count_leaves(&result.fields),
        processing_time: start_time.elapsed(),
        ..Default::default()
    };
    info!(
        "Extracted {} fields in {:.2?}",
        stats.fields_extracted, stats.processing_time
    );

    Ok(stats)
}

/// Validate (unless skipped) and parse one file
pub fn extract_file(importer: &CbfImporter, args: &ExtractArgs) -> Result<ExtractionResult> {
    let inputs = SubmittedInputs::from_file(&args.file);

    if args.skip_validation {
        debug!("Skipping format check for {}", args.file.display());
    } else {
        let outcome = importer.validate(&inputs);
        if let Some((_, message)) = outcome.errors().iter().next() {
            return Err(Error::invalid_format(
                args.file.display().to_string(),
                message.clone(),
            ));
        }
    }

    importer.fetch_with_report(&inputs)
}
