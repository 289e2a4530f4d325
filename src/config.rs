//! Configuration management and validation.
//!
//! Provides the importer configuration: sniffing and header scan limits,
//! the active locale, and per-locale message overrides. Configuration can be
//! built in code or loaded from a TOML file:
//!
//! ```toml
//! sniff_bytes = 2048
//! max_header_bytes = 131072
//! locale = "de"
//!
//! [messages.de]
//! "validation.wrong_file_type" = "Bitte eine CBF-Datei hochladen."
//! ```

use crate::constants::{DEFAULT_LOCALE, DEFAULT_MAX_HEADER_BYTES, DEFAULT_SNIFF_BYTES};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Importer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Bytes read from the file start when sniffing for the CBF marker
    pub sniff_bytes: usize,

    /// Upper bound on bytes scanned for the header region
    pub max_header_bytes: usize,

    /// Locale used for validation and form messages
    pub locale: String,

    /// Message overrides keyed by locale, then by message key
    pub messages: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            sniff_bytes: DEFAULT_SNIFF_BYTES,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
            locale: DEFAULT_LOCALE.to_string(),
            messages: BTreeMap::new(),
        }
    }
}

impl ImporterConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        let config = Self::from_toml_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from a TOML string and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check limits for consistency
    pub fn validate(&self) -> Result<()> {
        if self.sniff_bytes == 0 {
            return Err(Error::configuration("sniff_bytes must be greater than 0"));
        }

        if self.max_header_bytes < self.sniff_bytes {
            return Err(Error::configuration(format!(
                "max_header_bytes ({}) must not be smaller than sniff_bytes ({})",
                self.max_header_bytes, self.sniff_bytes
            )));
        }

        if self.locale.trim().is_empty() {
            return Err(Error::configuration("locale must not be empty"));
        }

        Ok(())
    }

    /// Set the sniff window size
    pub fn with_sniff_bytes(mut self, sniff_bytes: usize) -> Self {
        self.sniff_bytes = sniff_bytes;
        self
    }

    /// Set the header scan limit
    pub fn with_max_header_bytes(mut self, max_header_bytes: usize) -> Self {
        self.max_header_bytes = max_header_bytes;
        self
    }

    /// Set the active locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Override a single message for a locale
    pub fn with_message(
        mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.messages
            .entry(locale.into())
            .or_default()
            .insert(key.into(), text.into());
        self
    }
}
