//! Application constants for the CBF metadata extractor
//!
//! This module contains format markers, default limits, importer field keys
//! and message keys used throughout the crate.

// =============================================================================
// CBF Format Markers
// =============================================================================

/// Magic token opening every CBF file (`###CBF: VERSION 1.5, ...`)
pub const CBF_MAGIC: &str = "###CBF:";

/// Line that opens and closes the CIF text field holding the header
pub const TEXT_FIELD_DELIMITER: &str = ";";

/// MIME boundary that precedes the binary image section
pub const BINARY_SECTION_MARKER: &str = "--CIF-BINARY-FORMAT-SECTION--";

/// CIF item that introduces the image array
pub const ARRAY_DATA_ITEM: &str = "_array_data.data";

/// Prefix of a header key/value line inside the text field
pub const HEADER_LINE_PREFIX: char = '#';

/// Synthetic key for the sensor material/thickness line
pub const SENSOR_THICKNESS_KEY: &str = "Sensor_thickness";

/// Synthetic key for the bare acquisition timestamp line
pub const TIMESTAMP_KEY: &str = "Timestamp";

// =============================================================================
// Default Limits
// =============================================================================

/// Bytes read from the start of a file when sniffing for the format marker
pub const DEFAULT_SNIFF_BYTES: usize = 1024;

/// Upper bound on bytes scanned for the header region
pub const DEFAULT_MAX_HEADER_BYTES: usize = 64 * 1024;

// =============================================================================
// Importer Contract
// =============================================================================

/// Key of the single file-upload input in the importer form
pub const FILE_INPUT_KEY: &str = "file";

/// Locale used when none is configured
pub const DEFAULT_LOCALE: &str = "en";

/// Message keys resolved through the message catalog
pub mod message_keys {
    pub const WRONG_FILE_TYPE: &str = "validation.wrong_file_type";
    pub const MISSING_FILE: &str = "validation.missing_file";
    pub const FILE_LABEL: &str = "form.file.label";
    pub const FILE_DESCRIPTION: &str = "form.file.description";
}

// =============================================================================
// CLI Defaults
// =============================================================================

/// Directory name under the user config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "cbf-metadata";

/// Config file name looked up when `--config` is not given
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default file pattern for the `scan` command
pub const DEFAULT_SCAN_PATTERN: &str = "*.cbf";
