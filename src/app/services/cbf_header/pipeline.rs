//! Extraction pipeline for one CBF file
//!
//! Runs tokenizer, dictionary lookup, normalizer and assembler in sequence.
//! The file handle lives inside the tokenizer and is released when this
//! module's functions return, on success and on failure alike.

use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, trace, warn};

use super::assembler::{assemble, count_leaves};
use super::dictionary::FieldDictionary;
use super::normalizer::normalize;
use super::stats::{ExtractionResult, ParseStats};
use super::tokenizer::HeaderTokenizer;
use crate::Result;
use crate::config::ImporterConfig;

/// Extract metadata from the header of a CBF file
pub fn extract_header(path: &Path, config: &ImporterConfig) -> Result<ExtractionResult> {
    debug!("Extracting header metadata from {}", path.display());

    let mut tokenizer = HeaderTokenizer::open(path, config.max_header_bytes)?
        .with_magic_window(config.sniff_bytes);
    let result = collect_fields(&mut tokenizer, FieldDictionary::global())?;

    debug!(
        "Extracted {} fields from {} ({} lines, {} unknown keys, {} dropped)",
        result.stats.fields_extracted,
        path.display(),
        result.stats.lines_read,
        result.stats.unknown_keys,
        result.stats.parse_failures.len()
    );

    Ok(result)
}

/// Extract metadata from any buffered reader holding CBF content
pub fn extract_from_reader<R: BufRead>(
    reader: R,
    config: &ImporterConfig,
) -> Result<ExtractionResult> {
    let mut tokenizer =
        HeaderTokenizer::new(reader, config.max_header_bytes).with_magic_window(config.sniff_bytes);
    collect_fields(&mut tokenizer, FieldDictionary::global())
}

fn collect_fields<R: BufRead>(
    tokenizer: &mut HeaderTokenizer<R>,
    dictionary: &FieldDictionary,
) -> Result<ExtractionResult> {
    let mut stats = ParseStats::new();
    let mut seen = HashSet::new();
    let mut values = Vec::new();

    for entry in tokenizer.by_ref() {
        let entry = entry?;
        stats.entries_seen += 1;

        let Some(spec) = dictionary.lookup(&entry.key) else {
            stats.unknown_keys += 1;
            trace!("Ignoring unknown key '{}' at line {}", entry.key, entry.line_number);
            continue;
        };

        // First occurrence wins, even when it fails to parse
        if !seen.insert(spec.header_key) {
            stats.duplicate_keys += 1;
            debug!("Ignoring duplicate key '{}' at line {}", entry.key, entry.line_number);
            continue;
        }

        match normalize(&entry.raw_value, spec) {
            Ok(value) => values.push((spec, value)),
            Err(e) => {
                warn!("Dropping field at line {}: {}", entry.line_number, e);
                stats
                    .parse_failures
                    .push(format!("Line {}: {}", entry.line_number, e));
            }
        }
    }

    stats.lines_read = tokenizer.lines_read();

    let fields = assemble(dictionary, values);
    stats.fields_extracted = count_leaves(&fields);

    Ok(ExtractionResult { fields, stats })
}
