//! Test utilities and fixtures for CBF header parser testing
//!
//! This module provides synthetic PILATUS headers and helpers for writing
//! them to temporary files.

use std::io::Write;
use tempfile::NamedTempFile;

// Test modules
mod assembler_tests;
mod pipeline_tests;
mod tokenizer_tests;

/// Lines before the header text field
pub const PREAMBLE: &[&str] = &[
    "###CBF: VERSION 1.5, CBFlib v0.7.8 - SLS/DECTRIS PILATUS detectors",
    "",
    "data_test_1_00001",
    "",
    "_array_data.header_convention \"SLS_1.0\"",
    "_array_data.header_contents",
];

/// Header contents of a PILATUS 6M-F image
pub const PILATUS_HEADER_LINES: &[&str] = &[
    "# Detector: PILATUS 6M-F, S/N 60-0108-F, SLS",
    "# 2011-06-22T11:58:09.478",
    "# Pixel_size 172e-6 m x 172e-6 m",
    "# Silicon sensor, thickness 0.000450 m",
    "# Exposure_time 0.1000000 s",
    "# Exposure_period 0.1000000 s",
    "# Tau = 124.0e-09 s",
    "# Count_cutoff 1048575 counts",
    "# Threshold_setting: 6343 eV",
    "# Gain_setting: mid gain (vrf = -0.200)",
    "# N_excluded_pixels = 1178",
    "# Excluded_pixels: badpix_mask.tif",
    "# Flat_field: FF_p60-0108-F_E12686_T6343_vrf_m0p20.tif",
    "# Trim_file: p6m0108_E12686_T6343_vrf_m0p20.bin",
    "# Image_path: /ramdisk/",
    "# Wavelength 0.97780 A",
    "# Detector_distance 0.19050 m",
    "# Beam_xy (1231.00, 1253.00) pixels",
    "# Start_angle 0.0000 deg.",
    "# Angle_increment 0.1000 deg.",
    "# Phi 0.0000 deg.",
    "# Oscillation_axis X.CW",
    "# N_oscillations 1",
];

/// Build a CBF file around the given header lines, with a binary tail
pub fn cbf_with_header(header_lines: &[&str]) -> Vec<u8> {
    let mut content = String::new();
    for line in PREAMBLE {
        content.push_str(line);
        content.push_str("\r\n");
    }
    content.push_str(";\r\n");
    for line in header_lines {
        content.push_str(line);
        content.push_str("\r\n");
    }
    content.push_str(";\r\n\r\n_array_data.data\r\n;\r\n--CIF-BINARY-FORMAT-SECTION--\r\n");
    content.push_str("Content-Type: application/octet-stream;\r\n\r\n");

    let mut bytes = content.into_bytes();
    bytes.extend_from_slice(&[0x0C, 0x1A, 0x04, 0xD5, 0xFF, 0xFE, 0x80, 0x00, 0x23, 0x20]);
    bytes
}

/// The complete PILATUS fixture as bytes
pub fn pilatus_cbf() -> Vec<u8> {
    cbf_with_header(PILATUS_HEADER_LINES)
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content).unwrap();
    temp_file.flush().unwrap();
    temp_file
}
