//! Locale-keyed message catalog
//!
//! Resolves user-facing strings of the importer (validation errors, form
//! labels) by message key. Built-in bundles cover English and German;
//! configuration can override or add messages per locale.
//!
//! Lookup falls back from the full locale (`de-CH`) to its language (`de`),
//! then to English, and finally to the key itself.

use crate::config::ImporterConfig;
use crate::constants::{DEFAULT_LOCALE, message_keys};
use std::collections::HashMap;

const EN_MESSAGES: &[(&str, &str)] = &[
    (
        message_keys::WRONG_FILE_TYPE,
        "The selected file is not a CBF image. Please upload a file written by a PILATUS detector.",
    ),
    (message_keys::MISSING_FILE, "Please select a file to upload."),
    (message_keys::FILE_LABEL, "Diffraction image"),
    (
        message_keys::FILE_DESCRIPTION,
        "A single CBF image file; experiment metadata is read from its header.",
    ),
];

const DE_MESSAGES: &[(&str, &str)] = &[
    (
        message_keys::WRONG_FILE_TYPE,
        "Die ausgewählte Datei ist kein CBF-Bild. Bitte eine von einem PILATUS-Detektor geschriebene Datei hochladen.",
    ),
    (message_keys::MISSING_FILE, "Bitte eine Datei zum Hochladen auswählen."),
    (message_keys::FILE_LABEL, "Beugungsbild"),
    (
        message_keys::FILE_DESCRIPTION,
        "Eine einzelne CBF-Bilddatei; die Metadaten werden aus ihrem Header gelesen.",
    ),
];

#[derive(Debug, Clone)]
pub struct MessageCatalog {
    locale: String,
    bundles: HashMap<String, HashMap<String, String>>,
}

impl MessageCatalog {
    /// Catalog with the built-in bundles only
    pub fn builtin(locale: impl Into<String>) -> Self {
        let mut bundles = HashMap::new();
        bundles.insert("en".to_string(), bundle(EN_MESSAGES));
        bundles.insert("de".to_string(), bundle(DE_MESSAGES));

        Self {
            locale: locale.into(),
            bundles,
        }
    }

    /// Built-in bundles plus the overrides and locale from configuration
    pub fn from_config(config: &ImporterConfig) -> Self {
        let mut catalog = Self::builtin(config.locale.clone());

        for (locale, messages) in &config.messages {
            let bundle = catalog.bundles.entry(locale.clone()).or_default();
            for (key, text) in messages {
                bundle.insert(key.clone(), text.clone());
            }
        }

        catalog
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Resolve a message in the catalog's locale
    pub fn get(&self, key: &str) -> String {
        self.get_in(&self.locale, key)
    }

    /// Resolve a message in an explicit locale
    pub fn get_in(&self, locale: &str, key: &str) -> String {
        fallback_chain(locale)
            .iter()
            .find_map(|candidate| self.bundles.get(candidate.as_str())?.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::builtin(DEFAULT_LOCALE)
    }
}

fn bundle(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(key, text)| (key.to_string(), text.to_string()))
        .collect()
}

fn fallback_chain(locale: &str) -> Vec<String> {
    let mut chain = vec![locale.to_string()];

    if let Some((language, _)) = locale.split_once(['-', '_']) {
        chain.push(language.to_string());
    }

    if !chain.iter().any(|candidate| candidate == DEFAULT_LOCALE) {
        chain.push(DEFAULT_LOCALE.to_string());
    }

    chain
}
