//! Tests for header tokenizing

use super::super::tokenizer::HeaderTokenizer;
use super::{PILATUS_HEADER_LINES, cbf_with_header, create_temp_file, pilatus_cbf};
use crate::app::models::RawHeaderEntry;
use crate::constants::DEFAULT_MAX_HEADER_BYTES;
use std::io::{self, BufRead, Cursor, Read};

fn tokenize_bytes(bytes: &[u8]) -> Vec<RawHeaderEntry> {
    HeaderTokenizer::new(Cursor::new(bytes.to_vec()), DEFAULT_MAX_HEADER_BYTES)
        .collect::<crate::Result<Vec<_>>>()
        .unwrap()
}

#[test]
fn test_tokenize_full_header() {
    let entries = tokenize_bytes(&pilatus_cbf());

    assert_eq!(entries.len(), PILATUS_HEADER_LINES.len());

    assert_eq!(entries[0].key, "Detector");
    assert_eq!(entries[0].raw_value, "PILATUS 6M-F, S/N 60-0108-F, SLS");
    assert_eq!(entries[0].line_number, 8);

    assert_eq!(entries[1].key, "Timestamp");
    assert_eq!(entries[3].key, "Sensor_thickness");
    assert_eq!(entries[3].raw_value, "0.000450 m");

    let last = entries.last().unwrap();
    assert_eq!(last.key, "N_oscillations");
    assert_eq!(last.raw_value, "1");
    assert_eq!(last.line_number, 30);
}

#[test]
fn test_emission_follows_file_order() {
    let entries = tokenize_bytes(&cbf_with_header(&[
        "# Wavelength 1.0 A",
        "# Detector: PILATUS 2M",
        "# Wavelength 2.0 A",
    ]));

    let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["Wavelength", "Detector", "Wavelength"]);
    assert_eq!(entries[2].raw_value, "2.0 A");
}

#[test]
fn test_stops_at_closing_delimiter() {
    let mut tokenizer =
        HeaderTokenizer::new(Cursor::new(pilatus_cbf()), DEFAULT_MAX_HEADER_BYTES);
    let count = tokenizer.by_ref().count();

    assert_eq!(count, PILATUS_HEADER_LINES.len());
    assert!(tokenizer.is_finished());
    // 6 preamble lines, opening ';', 23 header lines, closing ';'
    assert_eq!(tokenizer.lines_read(), 31);
}

#[test]
fn test_lines_after_header_are_ignored() {
    let content = "###CBF: VERSION 1.5\n;\n# Wavelength 1.0 A\n;\n# Detector: LATE\n";
    let entries = tokenize_bytes(content.as_bytes());

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "Wavelength");
}

#[test]
fn test_binary_section_ends_header() {
    let content = "###CBF: VERSION 1.5\n;\n# Wavelength 1.0 A\n--CIF-BINARY-FORMAT-SECTION--\n# Detector: LATE\n";
    let entries = tokenize_bytes(content.as_bytes());

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "Wavelength");
}

#[test]
fn test_preamble_lines_are_not_entries() {
    let content = "###CBF: VERSION 1.5\n# Detector: PREAMBLE COMMENT\n_array_data.header_contents\n;\n# Detector: PILATUS 2M\n;\n";
    let entries = tokenize_bytes(content.as_bytes());

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].raw_value, "PILATUS 2M");
}

#[test]
fn test_no_text_field_yields_nothing() {
    let content = "###CBF: VERSION 1.5\n# Wavelength 1.0 A\n--CIF-BINARY-FORMAT-SECTION--\n";
    assert!(tokenize_bytes(content.as_bytes()).is_empty());
}

#[test]
fn test_magic_must_fall_inside_window() {
    let mut content = vec![b'\n'; 100];
    content.extend_from_slice(&pilatus_cbf());

    let late = HeaderTokenizer::new(Cursor::new(content.clone()), DEFAULT_MAX_HEADER_BYTES)
        .with_magic_window(64);
    assert_eq!(late.count(), 0);

    let inside = HeaderTokenizer::new(Cursor::new(content), DEFAULT_MAX_HEADER_BYTES)
        .with_magic_window(120);
    assert_eq!(inside.count(), PILATUS_HEADER_LINES.len());
}

#[test]
fn test_magic_straddling_window_edge_is_rejected() {
    // Marker starts at byte 0 but ends after a 4 byte window
    let tokenizer = HeaderTokenizer::new(Cursor::new(pilatus_cbf()), DEFAULT_MAX_HEADER_BYTES)
        .with_magic_window(4);
    assert_eq!(tokenizer.count(), 0);
}

#[test]
fn test_nothing_emitted_without_magic() {
    let content = "# Detector: PILATUS 6M-F\n# Wavelength 1.0 A\n";
    assert!(tokenize_bytes(content.as_bytes()).is_empty());
}

#[test]
fn test_non_matching_lines_skipped() {
    let entries = tokenize_bytes(&cbf_with_header(&[
        "#",
        "## operator note",
        "free text without prefix",
        "# Image_path:",
        "# Wavelength 0.97780 A",
    ]));

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].key, "Wavelength");
}

#[test]
fn test_unix_line_endings() {
    let content = "###CBF: VERSION 1.5\n;\n# Detector: PILATUS 300K\n# N_oscillations 1\n;\n";
    let entries = tokenize_bytes(content.as_bytes());

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].raw_value, "PILATUS 300K");
    assert_eq!(entries[1].line_number, 4);
}

#[test]
fn test_invalid_utf8_is_decoded_lossily() {
    let mut content = b"###CBF: VERSION 1.5\n;\n# Gain_setting: high \xFF gain\n".to_vec();
    content.extend_from_slice(b"# Wavelength 1.0 A\n;\n");

    let entries = tokenize_bytes(&content);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].key, "Gain_setting");
    assert!(entries[0].raw_value.starts_with("high "));
}

#[test]
fn test_byte_budget_bounds_the_scan() {
    let bytes = pilatus_cbf();
    // Enough for the preamble and a few header lines only
    let tokenizer = HeaderTokenizer::new(Cursor::new(bytes), 300);
    let entries: Vec<_> = tokenizer.map(|e| e.unwrap()).collect();

    assert!(!entries.is_empty());
    assert!(entries.len() < PILATUS_HEADER_LINES.len());
    assert_eq!(entries[0].key, "Detector");
    // The line cut by the budget is discarded rather than emitted truncated
    assert!(entries.iter().all(|e| e.key != "Sensor_thickness"));
}

#[test]
fn test_open_reads_file() {
    let temp_file = create_temp_file(&pilatus_cbf());
    let tokenizer = HeaderTokenizer::open(temp_file.path(), DEFAULT_MAX_HEADER_BYTES).unwrap();

    assert_eq!(tokenizer.count(), PILATUS_HEADER_LINES.len());
}

#[test]
fn test_open_missing_file_is_io_error() {
    let result = HeaderTokenizer::open(
        std::path::Path::new("/nonexistent/image.cbf"),
        DEFAULT_MAX_HEADER_BYTES,
    );
    assert!(result.unwrap_err().is_io());
}

/// Reader that fails after the first line
struct FailingReader {
    served: bool,
}

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("device gone"))
    }
}

impl BufRead for FailingReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.served {
            Err(io::Error::other("device gone"))
        } else {
            Ok(b"###CBF: VERSION 1.5\n")
        }
    }

    fn consume(&mut self, _amt: usize) {
        self.served = true;
    }
}

#[test]
fn test_read_failure_surfaces_once() {
    let mut tokenizer =
        HeaderTokenizer::new(FailingReader { served: false }, DEFAULT_MAX_HEADER_BYTES);

    let first = tokenizer.next().unwrap();
    assert!(first.unwrap_err().is_io());
    assert!(tokenizer.next().is_none());
}
