//! Format sniffing before full parsing
//!
//! A file is accepted when the first `window` bytes contain the CBF magic
//! token. Unreadable and missing files are rejected the same way as files of
//! the wrong type.

use crate::app::models::ValidationOutcome;
use crate::app::services::messages::MessageCatalog;
use crate::constants::{CBF_MAGIC, FILE_INPUT_KEY, message_keys};
use crate::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Check that the file starts like a CBF image
pub fn sniff(path: &Path, window: usize) -> Result<()> {
    let file = File::open(path)
        .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;

    let mut head = Vec::with_capacity(window);
    file.take(window as u64)
        .read_to_end(&mut head)
        .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))?;

    if contains_magic(&head) {
        Ok(())
    } else {
        Err(Error::invalid_format(
            path.display().to_string(),
            format!("no '{}' marker in the first {} bytes", CBF_MAGIC, window),
        ))
    }
}

/// True when `bytes` contains the CBF magic token
pub fn contains_magic(bytes: &[u8]) -> bool {
    let magic = CBF_MAGIC.as_bytes();
    bytes.windows(magic.len()).any(|candidate| candidate == magic)
}

/// Validate a file for the importer form
pub fn validate_file(path: &Path, window: usize, messages: &MessageCatalog) -> ValidationOutcome {
    match sniff(path, window) {
        Ok(()) => {
            debug!("Accepted {} as CBF", path.display());
            ValidationOutcome::valid()
        }
        Err(e) => {
            debug!("Rejected {}: {}", path.display(), e);
            ValidationOutcome::invalid(FILE_INPUT_KEY, messages.get(message_keys::WRONG_FILE_TYPE))
        }
    }
}
