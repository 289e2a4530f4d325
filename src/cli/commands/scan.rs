//! Scan command: extract metadata from every matching file in a directory tree
//!
//! Files that fail validation or parsing are reported and counted; they do
//! not stop the scan.

use super::shared::{ProcessingStats, create_progress_bar, render_fields};
use crate::Result;
use crate::app::models::ResultField;
use crate::app::services::cbf_header::count_leaves;
use crate::app::services::importer::{CbfImporter, MetadataImporter, SubmittedInputs};
use crate::cli::args::{OutputFormat, ScanArgs};
use colored::Colorize;
use glob::Pattern;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of scanning one file
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScanEntry {
    Extracted {
        file: String,
        fields: Vec<ResultField>,
    },
    Rejected {
        file: String,
        reason: String,
    },
    Failed {
        file: String,
        error: String,
    },
}

pub fn run_scan(
    importer: &CbfImporter,
    args: &ScanArgs,
    show_progress: bool,
) -> Result<ProcessingStats> {
    let start_time = Instant::now();
    args.validate()?;

    let files = find_files(&args.directory, &args.pattern, args.max_depth)?;
    info!(
        "Found {} files matching '{}' in {}",
        files.len(),
        args.pattern,
        args.directory.display()
    );

    let progress = create_progress_bar(files.len() as u64, show_progress);
    let mut stats = ProcessingStats::default();
    let mut entries = Vec::with_capacity(files.len());

    for path in &files {
        if let Some(pb) = &progress {
            pb.set_message(
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }

        let entry = scan_file(importer, path);
        match &entry {
            ScanEntry::Extracted { fields, .. } => stats.fields_extracted += count_leaves(fields),
            ScanEntry::Rejected { .. } => stats.files_rejected += 1,
            ScanEntry::Failed { .. } => stats.files_failed += 1,
        }
        stats.files_processed += 1;
        entries.push(entry);

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => print_entries(&entries),
    }

    stats.processing_time = start_time.elapsed();
    info!(
        "Scanned {} files: {} rejected, {} failed, {} fields in {:.2?}",
        stats.files_processed,
        stats.files_rejected,
        stats.files_failed,
        stats.fields_extracted,
        stats.processing_time
    );

    Ok(stats)
}

/// Collect files below `directory` whose name matches `pattern`, sorted by path
pub fn find_files(
    directory: &Path,
    pattern: &str,
    max_depth: Option<usize>,
) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern).map_err(|e| {
        crate::Error::configuration(format!("Invalid file pattern '{}': {}", pattern, e))
    })?;

    let mut walker = WalkDir::new(directory).sort_by_file_name();
    if let Some(depth) = max_depth {
        walker = walker.max_depth(depth);
    }

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => {
                let path = entry.path();
                if entry.file_type().is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| pattern.matches(name))
                {
                    files.push(path.to_path_buf());
                }
            }
            Err(e) => {
                warn!("Error walking directory {}: {}", directory.display(), e);
            }
        }
    }

    Ok(files)
}

/// Validate and parse one file, capturing any failure in the entry
pub fn scan_file(importer: &CbfImporter, path: &Path) -> ScanEntry {
    let file = path.display().to_string();
    let inputs = SubmittedInputs::from_file(path);

    let outcome = importer.validate(&inputs);
    if let Some((_, reason)) = outcome.errors().iter().next() {
        debug!("Skipping {}: {}", file, reason);
        return ScanEntry::Rejected {
            file,
            reason: reason.clone(),
        };
    }

    match importer.fetch_metadata(&inputs) {
        Ok(fields) => ScanEntry::Extracted { file, fields },
        Err(e) => {
            warn!("Failed to extract {}: {}", file, e);
            ScanEntry::Failed {
                file,
                error: e.to_string(),
            }
        }
    }
}

fn print_entries(entries: &[ScanEntry]) {
    for entry in entries {
        match entry {
            ScanEntry::Extracted { file, fields } => {
                println!("{}", file.bold());
                for line in render_fields(fields).lines() {
                    println!("  {}", line);
                }
            }
            ScanEntry::Rejected { file, reason } => {
                println!("{} {} ({})", "skipped".yellow(), file, reason);
            }
            ScanEntry::Failed { file, error } => {
                println!("{} {} ({})", "failed".red(), file, error);
            }
        }
    }
}
