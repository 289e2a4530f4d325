//! Command-line argument definitions for the CBF metadata extractor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::ImporterConfig;
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_SCAN_PATTERN};
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

/// CLI arguments for the CBF metadata extractor
///
/// Reads experiment metadata from the headers of PILATUS CBF detector images
/// and prints it the way a catalogue importer would receive it.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cbf-meta",
    version,
    about = "Extract experiment metadata from PILATUS CBF image headers",
    long_about = "Reads the text header of crystallography detector images in CBF format, \
                  recognises instrument and data-collection fields, normalizes their units \
                  and prints the result as a text tree or JSON."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors and hide progress bars
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a TOML configuration file
    ///
    /// If not specified, <config dir>/cbf-metadata/config.toml is used when it exists.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Locale for validation and form messages (overrides the config file)
    #[arg(long = "locale", value_name = "LOCALE", global = true)]
    pub locale: Option<String>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Print the importer form schema
    Schema(SchemaArgs),
    /// Check whether files are CBF images
    Validate(ValidateArgs),
    /// Extract metadata from one CBF file
    Extract(ExtractArgs),
    /// Extract metadata from every matching file below a directory
    Scan(ScanArgs),
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tree
    Text,
    /// JSON document
    Json,
}

#[derive(Debug, Clone, Parser)]
pub struct SchemaArgs {
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Files to check
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
    /// CBF file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Parse even if the format sniff fails
    #[arg(long = "skip-validation")]
    pub skip_validation: bool,

    /// Print parsing statistics after the fields
    #[arg(long = "stats")]
    pub stats: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Directory to walk
    #[arg(value_name = "DIR")]
    pub directory: PathBuf,

    /// File name pattern to match
    #[arg(long = "pattern", value_name = "GLOB", default_value = DEFAULT_SCAN_PATTERN)]
    pub pattern: String,

    /// Maximum directory depth to descend
    #[arg(long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,

    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl Args {
    /// Get the log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Resolve the configuration file to load, if any
    pub fn config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config {
            return Some(path.clone());
        }

        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Build the importer configuration from file and flags
    pub fn load_config(&self) -> Result<ImporterConfig> {
        let mut config = match self.config_path() {
            Some(path) => {
                debug!("Using configuration file {}", path.display());
                ImporterConfig::from_file(&path)?
            }
            None => ImporterConfig::default(),
        };

        if let Some(locale) = &self.locale {
            config = config.with_locale(locale.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

impl ScanArgs {
    /// Validate the scan arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.directory.exists() {
            return Err(Error::configuration(format!(
                "Scan directory does not exist: {}",
                self.directory.display()
            )));
        }

        if !self.directory.is_dir() {
            return Err(Error::configuration(format!(
                "Scan path is not a directory: {}",
                self.directory.display()
            )));
        }

        glob::Pattern::new(&self.pattern).map_err(|e| {
            Error::configuration(format!("Invalid file pattern '{}': {}", self.pattern, e))
        })?;

        Ok(())
    }
}
