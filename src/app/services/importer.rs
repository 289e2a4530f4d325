//! Importer facade consumed by the metadata import framework
//!
//! The framework collects the inputs declared by [`MetadataImporter::form_schema`],
//! validates them, and then asks for the metadata fields. [`CbfImporter`]
//! implements that contract for PILATUS CBF images.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::cbf_header::{ExtractionResult, extract_header, validate_file};
use super::messages::MessageCatalog;
use crate::app::models::{FormField, FormFieldKind, ResultField, ValidationOutcome};
use crate::config::ImporterConfig;
use crate::constants::{FILE_INPUT_KEY, message_keys};
use crate::{Error, Result};

/// Contract between a file-format importer and the import framework
pub trait MetadataImporter {
    /// Inputs the framework must collect from the user
    fn form_schema(&self) -> Vec<FormField>;

    /// Check submitted inputs; an empty outcome means they are acceptable
    fn validate(&self, inputs: &SubmittedInputs) -> ValidationOutcome;

    /// Extract metadata fields; assumes `validate` passed
    fn fetch_metadata(&self, inputs: &SubmittedInputs) -> Result<Vec<ResultField>>;
}

/// Files submitted through the importer form, keyed by input field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmittedInputs {
    files: BTreeMap<String, PathBuf>,
}

impl SubmittedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inputs holding a single upload under the standard file key
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new().with_file(FILE_INPUT_KEY, path)
    }

    pub fn with_file(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.files.insert(key.into(), path.into());
        self
    }

    pub fn file(&self, key: &str) -> Option<&Path> {
        self.files.get(key).map(PathBuf::as_path)
    }
}

/// Importer for PILATUS CBF detector images
#[derive(Debug, Clone)]
pub struct CbfImporter {
    config: ImporterConfig,
    messages: MessageCatalog,
}

impl CbfImporter {
    /// Create an importer from a validated configuration
    pub fn new(config: ImporterConfig) -> Result<Self> {
        config.validate()?;
        let messages = MessageCatalog::from_config(&config);
        Ok(Self { config, messages })
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    /// Like `fetch_metadata`, but also returns parsing statistics
    pub fn fetch_with_report(&self, inputs: &SubmittedInputs) -> Result<ExtractionResult> {
        let path = inputs
            .file(FILE_INPUT_KEY)
            .ok_or_else(|| Error::missing_input(FILE_INPUT_KEY))?;

        let result = extract_header(path, &self.config)?;
        info!(
            "Extracted {} metadata fields from {}",
            result.stats.fields_extracted,
            path.display()
        );
        Ok(result)
    }
}

impl Default for CbfImporter {
    fn default() -> Self {
        let config = ImporterConfig::default();
        let messages = MessageCatalog::from_config(&config);
        Self { config, messages }
    }
}

impl MetadataImporter for CbfImporter {
    fn form_schema(&self) -> Vec<FormField> {
        vec![FormField {
            key: FILE_INPUT_KEY.to_string(),
            kind: FormFieldKind::File,
            label: self.messages.get(message_keys::FILE_LABEL),
            description: self.messages.get(message_keys::FILE_DESCRIPTION),
            required: true,
        }]
    }

    fn validate(&self, inputs: &SubmittedInputs) -> ValidationOutcome {
        match inputs.file(FILE_INPUT_KEY) {
            Some(path) => validate_file(path, self.config.sniff_bytes, &self.messages),
            None => {
                debug!("Validation failed: no '{}' input submitted", FILE_INPUT_KEY);
                ValidationOutcome::invalid(
                    FILE_INPUT_KEY,
                    self.messages.get(message_keys::MISSING_FILE),
                )
            }
        }
    }

    fn fetch_metadata(&self, inputs: &SubmittedInputs) -> Result<Vec<ResultField>> {
        self.fetch_with_report(inputs).map(|result| result.fields)
    }
}
