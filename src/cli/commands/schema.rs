//! Schema command: print the importer form descriptor

use super::shared::{ProcessingStats, render_schema};
use crate::Result;
use crate::app::services::importer::{CbfImporter, MetadataImporter};
use crate::cli::args::{OutputFormat, SchemaArgs};

pub fn run_schema(importer: &CbfImporter, args: &SchemaArgs) -> Result<ProcessingStats> {
    let schema = importer.form_schema();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schema)?),
        OutputFormat::Text => print!("{}", render_schema(&schema)),
    }

    Ok(ProcessingStats::default())
}
