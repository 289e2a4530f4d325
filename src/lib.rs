//! CBF Metadata Library
//!
//! A Rust library for extracting experiment metadata from the text header of
//! crystallography detector images written in the CBF format (DECTRIS PILATUS,
//! `SLS_1.0` header convention) and handing it to a catalogue import pipeline.
//!
//! This library provides tools for:
//! - Sniffing files for the CBF format marker before any parsing happens
//! - Tokenizing the bounded header region into key/value entries
//! - Looking up recognised keys in a static field dictionary
//! - Normalizing raw values into canonical units with fixed precision
//! - Assembling a two-level result tree for the importer framework
//! - Localized validation and form-schema messages

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod cbf_header;
        pub mod importer;
        pub mod messages;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FieldSpec, RawHeaderEntry, ResultField, ValidationOutcome, ValueKind};
pub use app::services::importer::{CbfImporter, MetadataImporter, SubmittedInputs};
pub use config::ImporterConfig;

/// Result type alias for the CBF metadata extractor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for header extraction and import operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed (file missing or unreadable)
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File is not a CBF image
    #[error("Invalid CBF format in file '{file}': {message}")]
    InvalidFormat { file: String, message: String },

    /// A recognised header value could not be parsed for its declared kind
    #[error("Cannot parse header field '{key}' from '{value}': {reason}")]
    FieldParse {
        key: String,
        value: String,
        reason: String,
    },

    /// A required importer input was not submitted
    #[error("Missing importer input: {field}")]
    MissingInput { field: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Result could not be serialized for output
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a field parse error
    pub fn field_parse(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::FieldParse {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing input error
    pub fn missing_input(field: impl Into<String>) -> Self {
        Self::MissingInput {
            field: field.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True when the failure came from the filesystem rather than file content
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Failed to parse TOML configuration: {}", error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("Failed to serialize JSON: {}", error),
        }
    }
}
