//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::app::models::{FormField, ResultField, ValidationOutcome};
use crate::app::services::cbf_header::ParseStats;
use crate::cli::args::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;
use tracing::debug;

/// Processing statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct ProcessingStats {
    /// Number of files examined
    pub files_processed: usize,
    /// Number of files rejected by validation
    pub files_rejected: usize,
    /// Number of files that failed to parse
    pub files_failed: usize,
    /// Number of leaf fields extracted across all files
    pub fields_extracted: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
}

impl ProcessingStats {
    /// True when any file was rejected or failed
    pub fn has_failures(&self) -> bool {
        self.files_rejected > 0 || self.files_failed > 0
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cbf_metadata={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Create a progress bar for a known number of files
pub fn create_progress_bar(total: u64, show: bool) -> Option<ProgressBar> {
    if !show {
        return None;
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    Some(pb)
}

/// Render result fields as an indented tree
pub fn render_fields(fields: &[ResultField]) -> String {
    let mut output = String::new();
    render_level(&mut output, fields, 0);
    output
}

fn render_level(output: &mut String, fields: &[ResultField], depth: usize) {
    let indent = "  ".repeat(depth);

    for field in fields {
        if field.is_group() {
            let _ = writeln!(output, "{}{}:", indent, field.name.bold());
            render_level(output, &field.children, depth + 1);
        } else {
            let _ = writeln!(output, "{}{}: {}", indent, field.name.cyan(), field.value);
        }
    }
}

/// Render a validation outcome for one file
pub fn render_validation(file: &str, outcome: &ValidationOutcome) -> String {
    if outcome.is_valid() {
        format!("{} {}", "valid".green(), file)
    } else {
        let reasons: Vec<String> = outcome
            .errors()
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        format!("{} {} ({})", "invalid".red(), file, reasons.join("; "))
    }
}

/// Render the importer form schema
pub fn render_schema(schema: &[FormField]) -> String {
    let mut output = String::new();
    for field in schema {
        let required = if field.required { "required" } else { "optional" };
        let _ = writeln!(
            output,
            "{} ({:?}, {}): {}",
            field.key.bold(),
            field.kind,
            required,
            field.label
        );
        let _ = writeln!(output, "  {}", field.description);
    }
    output
}

/// Render header parsing statistics
pub fn render_parse_stats(stats: &ParseStats) -> String {
    let mut output = format!(
        "{} lines read, {} entries, {} fields extracted, {} unknown keys, {} duplicates",
        stats.lines_read,
        stats.entries_seen,
        stats.fields_extracted,
        stats.unknown_keys,
        stats.duplicate_keys
    );

    for failure in &stats.parse_failures {
        let _ = write!(output, "\n  {} {}", "dropped".yellow(), failure);
    }

    output
}
