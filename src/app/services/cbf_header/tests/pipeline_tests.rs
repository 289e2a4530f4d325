//! Tests for the extraction pipeline

use super::super::pipeline::{extract_from_reader, extract_header};
use super::{PILATUS_HEADER_LINES, cbf_with_header, create_temp_file, pilatus_cbf};
use crate::app::models::ResultField;
use crate::config::ImporterConfig;
use std::io::Cursor;

fn extract_bytes(bytes: Vec<u8>) -> super::super::ExtractionResult {
    extract_from_reader(Cursor::new(bytes), &ImporterConfig::default()).unwrap()
}

fn expected_pilatus_fields() -> Vec<ResultField> {
    vec![
        ResultField::leaf("detectorType", "PILATUS 6M-F"),
        ResultField::leaf("collectionDate", "2011-06-22T11:58:09.478"),
        ResultField::leaf("sensorThickness", "0.45"),
        ResultField::leaf("pixelSize", "0.172"),
        ResultField::leaf("thresholdEnergy", "6343"),
        ResultField::leaf("gainSetting", "mid gain (vrf = -0.200)"),
        ResultField::leaf("countCutoff", "1048575"),
        ResultField::leaf("excludedPixels", "1178"),
        ResultField::group(
            "dataCollection",
            vec![
                ResultField::leaf("wavelength", "0.97780"),
                ResultField::leaf("detectorDistance", "190.5"),
                ResultField::leaf("exposureTime", "0.1000"),
                ResultField::leaf("exposurePeriod", "0.1000"),
                ResultField::leaf("startAngle", "0.0000"),
                ResultField::leaf("angleIncrement", "0.1000"),
                ResultField::leaf("oscillationAxis", "X.CW"),
                ResultField::leaf("numberOfOscillations", "1"),
            ],
        ),
    ]
}

#[test]
fn test_full_pilatus_header() {
    let result = extract_bytes(pilatus_cbf());

    assert_eq!(result.fields, expected_pilatus_fields());
    assert_eq!(result.stats.entries_seen, 23);
    assert_eq!(result.stats.unknown_keys, 7);
    assert_eq!(result.stats.duplicate_keys, 0);
    assert_eq!(result.stats.fields_extracted, 16);
    assert_eq!(result.stats.recognised(), 16);
    assert_eq!(result.stats.lines_read, 31);
    assert!(result.stats.is_clean());
}

#[test]
fn test_extract_from_file() {
    let temp_file = create_temp_file(&pilatus_cbf());
    let result = extract_header(temp_file.path(), &ImporterConfig::default()).unwrap();

    assert_eq!(result.fields, expected_pilatus_fields());
}

#[test]
fn test_output_invariant_under_line_permutation() {
    let expected = expected_pilatus_fields();

    let mut reversed: Vec<&str> = PILATUS_HEADER_LINES.to_vec();
    reversed.reverse();
    assert_eq!(extract_bytes(cbf_with_header(&reversed)).fields, expected);

    for shift in [1, 5, 11, 17] {
        let mut rotated: Vec<&str> = PILATUS_HEADER_LINES.to_vec();
        rotated.rotate_left(shift);
        assert_eq!(
            extract_bytes(cbf_with_header(&rotated)).fields,
            expected,
            "rotation by {}",
            shift
        );
    }
}

#[test]
fn test_parsing_is_idempotent() {
    let temp_file = create_temp_file(&pilatus_cbf());
    let config = ImporterConfig::default();

    let first = extract_header(temp_file.path(), &config).unwrap();
    let second = extract_header(temp_file.path(), &config).unwrap();

    assert_eq!(first.fields, second.fields);
    assert_eq!(
        serde_json::to_vec(&first.fields).unwrap(),
        serde_json::to_vec(&second.fields).unwrap()
    );
}

#[test]
fn test_unknown_keys_never_appear() {
    let result = extract_bytes(pilatus_cbf());
    let json = serde_json::to_string(&result.fields).unwrap().to_lowercase();

    for unknown in ["tau", "phi", "beam", "flat", "trim", "image_path", "excluded_pixels\""] {
        assert!(!json.contains(unknown), "{} leaked into output", unknown);
    }
}

#[test]
fn test_at_most_one_entry_per_name() {
    let mut lines: Vec<&str> = PILATUS_HEADER_LINES.to_vec();
    lines.extend_from_slice(PILATUS_HEADER_LINES);
    let result = extract_bytes(cbf_with_header(&lines));

    assert_eq!(result.fields, expected_pilatus_fields());
    assert_eq!(result.stats.duplicate_keys, 16);
}

#[test]
fn test_first_duplicate_wins_even_when_unparseable() {
    let result = extract_bytes(cbf_with_header(&[
        "# Detector_distance far m",
        "# Detector_distance 0.19050 m",
        "# Wavelength 0.97780 A",
    ]));

    assert_eq!(
        result.fields,
        vec![ResultField::group(
            "dataCollection",
            vec![ResultField::leaf("wavelength", "0.97780")]
        )]
    );
    assert_eq!(result.stats.parse_failures.len(), 1);
    assert_eq!(result.stats.duplicate_keys, 1);
}

#[test]
fn test_malformed_field_dropped_others_kept() {
    let result = extract_bytes(cbf_with_header(&[
        "# Detector: PILATUS 2M",
        "# Count_cutoff lots counts",
        "# N_excluded_pixels = 12",
    ]));

    assert_eq!(
        result.fields,
        vec![
            ResultField::leaf("detectorType", "PILATUS 2M"),
            ResultField::leaf("excludedPixels", "12"),
        ]
    );
    assert!(!result.stats.is_clean());
    assert!(result.stats.parse_failures[0].contains("Count_cutoff"));
}

#[test]
fn test_group_omitted_when_no_children_present() {
    let result = extract_bytes(cbf_with_header(&["# Detector: PILATUS 300K"]));

    assert_eq!(
        result.fields,
        vec![ResultField::leaf("detectorType", "PILATUS 300K")]
    );
}

#[test]
fn test_missing_marker_yields_no_fields() {
    let mut content = String::new();
    for line in PILATUS_HEADER_LINES {
        content.push_str(line);
        content.push('\n');
    }

    let result = extract_bytes(content.into_bytes());
    assert!(result.fields.is_empty());
    assert_eq!(result.stats.entries_seen, 0);
}

#[test]
fn test_marker_past_sniff_window_yields_no_fields() {
    let mut content = Vec::new();
    for i in 0..100 {
        content.extend_from_slice(format!("padding line {:04} before the image\r\n", i).as_bytes());
    }
    content.extend_from_slice(&pilatus_cbf());
    let config = ImporterConfig::default();
    assert!(content.len() > config.sniff_bytes + 2000);

    let result = extract_from_reader(Cursor::new(content.clone()), &config).unwrap();
    assert!(result.fields.is_empty());
    assert_eq!(result.stats.entries_seen, 0);

    // A wider window admits the same file
    let wide = config.with_sniff_bytes(8192);
    let result = extract_from_reader(Cursor::new(content), &wide).unwrap();
    assert_eq!(result.fields, expected_pilatus_fields());
}

#[test]
fn test_preamble_comment_does_not_shadow_header_value() {
    let mut content = b"###CBF: VERSION 1.5\r\n# Detector: from a CIF comment\r\n".to_vec();
    content.extend_from_slice(&pilatus_cbf());

    let result = extract_bytes(content);
    assert_eq!(result.fields[0], ResultField::leaf("detectorType", "PILATUS 6M-F"));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = extract_header(
        std::path::Path::new("/nonexistent/image.cbf"),
        &ImporterConfig::default(),
    );
    assert!(result.unwrap_err().is_io());
}
